use backoff::{future::retry, ExponentialBackoff};
use std::future::Future;
use std::time::Duration;

use crate::utils::error::AppError;

/// 일시적 장애와 요청 한도 초과만 재시도합니다.
fn is_retryable_error(error: &AppError) -> bool {
    matches!(error, AppError::AiTemporaryError | AppError::AiRateLimitError)
}

/// 지수 백오프 설정 생성
fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        max_elapsed_time: Some(Duration::from_secs(30)),
        multiplier: 2.0,
        ..Default::default()
    }
}

/// 재시도 로직을 적용한 비동기 작업 실행
///
/// 일시적 오류 시 지수 백오프로 재시도하고,
/// 영구적 오류 시 즉시 실패를 반환합니다.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    retry(create_backoff(), || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if is_retryable_error(&e) => {
                tracing::warn!(error = %e, "Retryable LLM error, will retry");
                Err(backoff::Error::transient(e))
            }
            Err(e) => {
                tracing::error!(error = %e, "Permanent LLM error, not retrying");
                Err(backoff::Error::permanent(e))
            }
        }
    })
    .await
}
