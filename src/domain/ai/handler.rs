use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

#[allow(unused_imports)]
use super::dto::{ImprovePromptRequest, ImprovePromptResponse, SuccessImprovePromptResponse};
use super::service::AiService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;

/// 프롬프트 개선 API
///
/// LLM으로 프롬프트를 다듬고, 개선된 본문에서 찾은 파라미터 이름을 함께 반환합니다.
/// 결과는 저장하지 않습니다. IP 단위 요청 제한이 적용됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/improve",
    request_body = ImprovePromptRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "개선 성공", body = SuccessImprovePromptResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 422, description = "유해한 프롬프트로 판단되어 거부됨", body = ErrorResponse),
        (status = 429, description = "요청 한도 초과", body = ErrorResponse),
        (status = 502, description = "AI 응답 형식 오류", body = ErrorResponse),
        (status = 503, description = "AI 서비스 사용 불가", body = ErrorResponse)
    ),
    tag = "AI"
)]
pub async fn improve_prompt(
    State(state): State<AppState>,
    _user: AuthUser,
    req: Result<Json<ImprovePromptRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<ImprovePromptResponse>>, AppError> {
    let Json(req) = req?;
    req.validate()?;

    let result = AiService::improve_prompt(state.ai_client.clone(), req).await?;

    Ok(Json(BaseResponse::success(result)))
}
