//! Rate Limiting 모듈
//!
//! LLM 호출 비용이 드는 프롬프트 개선 엔드포인트를 IP 단위로 제한합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::utils::ErrorResponse;

/// 초당 보충되는 요청 수
const REQUESTS_PER_SECOND: u64 = 1;
/// 순간 최대 요청 수
const BURST_SIZE: u32 = 5;

pub type AiRateLimitLayer = GovernorLayer<SmartIpKeyExtractor, governor::middleware::NoOpMiddleware>;

/// 프롬프트 개선 API용 Rate Limiter 레이어 생성
///
/// X-Forwarded-For, X-Real-IP 헤더를 먼저 보고 없으면 소켓 주소를 사용합니다.
pub fn create_ai_rate_limiter() -> AiRateLimitLayer {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REQUESTS_PER_SECOND)
            .burst_size(BURST_SIZE)
            .key_extractor(SmartIpKeyExtractor)
            .error_handler(|err| RateLimitResponse::from(err).into_response())
            .finish()
            .expect("rate limiter constants must be non-zero"),
    );

    GovernorLayer { config }
}

#[derive(Debug)]
enum RateLimitResponse {
    TooManyRequests { retry_after: u64 },
    KeyUnavailable,
}

impl From<GovernorError> for RateLimitResponse {
    fn from(err: GovernorError) -> Self {
        match err {
            GovernorError::TooManyRequests { wait_time, .. } => Self::TooManyRequests {
                retry_after: wait_time,
            },
            _ => Self::KeyUnavailable,
        }
    }
}

impl IntoResponse for RateLimitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::TooManyRequests { retry_after } => {
                tracing::warn!(retry_after_secs = retry_after, "Rate limit exceeded");

                let body = ErrorResponse::new(
                    "RATE_LIMIT",
                    "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.",
                );
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                if let Ok(value) = retry_after.to_string().parse() {
                    response.headers_mut().insert("Retry-After", value);
                }
                response
            }
            Self::KeyUnavailable => {
                tracing::error!("Rate limiter could not determine client address");

                let body = ErrorResponse::new("COMMON500", "서버 에러, 관리자에게 문의 바랍니다.");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
