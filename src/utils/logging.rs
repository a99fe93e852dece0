//! 로깅 초기화 모듈
//!
//! JSON 형식의 구조화된 로그를 stdout과 일별 로그 파일에 동시 출력합니다.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,prompt_pocket=debug,tower_http=debug";

/// 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG`로 로그 레벨을 설정하며, 파일은 `{log_dir}/server.log.YYYY-MM-DD` 형식으로 남습니다.
/// 반환되는 `WorkerGuard`를 main에서 유지해야 종료 시 버퍼링된 로그가 손실되지 않습니다.
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    let file_appender = rolling::daily(log_dir, "server.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
    {
        // 이미 초기화된 경우(테스트 등)에는 기존 subscriber를 그대로 사용
        eprintln!("Tracing already initialized or failed: {}", err);
    }

    guard
}
