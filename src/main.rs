use std::net::SocketAddr;
use std::sync::Arc;

use prompt_pocket::{
    config::{establish_connection, AppConfig},
    create_router,
    domain::ai::client::OpenAiClient,
    shutdown::shutdown_signal,
    utils::logging::init_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 main 종료까지 유지)
    let _log_guard = init_logging(&AppConfig::log_dir_from_env());

    // 3. 설정 로드
    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.server_port,
        model = %config.improvement_model,
        rate_limit = config.rate_limit_enabled,
        "Configuration loaded"
    );

    // 4. DB 연결
    let db = establish_connection(&config.database_url, config.db_schema_update).await?;

    // 5. LLM 클라이언트
    let ai_client = Arc::new(OpenAiClient::new(
        &config.llm_api_key,
        &config.llm_api_base,
        &config.improvement_model,
        config.llm_timeout_secs,
    ));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = create_router(AppState::new(db, config, ai_client));

    // 6. 서버 실행
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
