use axum::{extract::State, http::StatusCode, Json};

use super::dto::{HealthState, HealthStatus};
use crate::state::AppState;

/// 헬스체크 API
///
/// 서버 상태, 버전, 가동 시간, DB와 LLM 상태를 반환합니다.
/// DB에 접근할 수 없으면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "정상 또는 부분 장애", body = HealthStatus),
        (status = 503, description = "데이터베이스 장애", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = state.health.check(&state.db, &state.ai_client).await;

    let code = match status.status {
        HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (code, Json(status))
}
