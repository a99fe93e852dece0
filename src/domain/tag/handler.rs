use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

#[allow(unused_imports)]
use super::dto::{
    CreateTagRequest, SuccessTagListResponse, SuccessTagResponse, TagResponse, UpdateTagRequest,
};
use super::service::TagService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;

/// 태그 목록 조회 API
///
/// 이름순으로 정렬하며 태그별 프롬프트 수를 함께 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "조회 성공", body = SuccessTagListResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Tag"
)]
pub async fn list_tags(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BaseResponse<Vec<TagResponse>>>, AppError> {
    let user_id = user.user_id()?;
    let result = TagService::list_tags(state, user_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 태그 생성 API
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = CreateTagRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "태그 생성 성공", body = SuccessTagResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 409, description = "태그 이름 중복", body = ErrorResponse)
    ),
    tag = "Tag"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    user: AuthUser,
    req: Result<Json<CreateTagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<TagResponse>>), AppError> {
    let Json(req) = req?;
    req.validate()?;

    let user_id = user.user_id()?;
    let result = TagService::create_tag(state, user_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 태그 이름 변경 API
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "태그 ID")
    ),
    request_body = UpdateTagRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "변경 성공", body = SuccessTagResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 태그", body = ErrorResponse),
        (status = 409, description = "태그 이름 중복", body = ErrorResponse)
    ),
    tag = "Tag"
)]
pub async fn update_tag(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    req: Result<Json<UpdateTagRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TagResponse>>, AppError> {
    let Path(tag_id) = path?;
    let Json(req) = req?;
    req.validate()?;

    let user_id = user.user_id()?;
    let result = TagService::update_tag(state, user_id, tag_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 태그 삭제 API
///
/// 태그가 붙어 있던 프롬프트에서도 연결이 제거됩니다.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "태그 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 태그", body = ErrorResponse)
    ),
    tag = "Tag"
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(tag_id) = path?;

    let user_id = user.user_id()?;
    TagService::delete_tag(state, user_id, tag_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
