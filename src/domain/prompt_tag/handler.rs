use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

#[allow(unused_imports)]
use super::dto::{PromptTagRequest, PromptTagResponse, SuccessPromptTagResponse};
use super::service::PromptTagService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;

/// 프롬프트-태그 연결 API
#[utoipa::path(
    post,
    path = "/api/v1/prompt-tags",
    request_body = PromptTagRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "연결 성공", body = SuccessPromptTagResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "소유자가 다른 프롬프트와 태그", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트 또는 태그", body = ErrorResponse),
        (status = 409, description = "이미 연결됨", body = ErrorResponse)
    ),
    tag = "PromptTag"
)]
pub async fn assign_tag(
    State(state): State<AppState>,
    user: AuthUser,
    req: Result<Json<PromptTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<PromptTagResponse>>), AppError> {
    let Json(req) = req?;

    let user_id = user.user_id()?;
    let result = PromptTagService::assign_tag(state, user_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 프롬프트-태그 연결 해제 API
#[utoipa::path(
    delete,
    path = "/api/v1/prompt-tags",
    request_body = PromptTagRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "해제 성공"),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "소유자가 다른 프롬프트와 태그", body = ErrorResponse),
        (status = 404, description = "연결 또는 대상이 존재하지 않음", body = ErrorResponse)
    ),
    tag = "PromptTag"
)]
pub async fn remove_tag(
    State(state): State<AppState>,
    user: AuthUser,
    req: Result<Json<PromptTagRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = req?;

    let user_id = user.user_id()?;
    PromptTagService::remove_tag(state, user_id, req).await?;

    Ok(StatusCode::NO_CONTENT)
}
