use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

#[allow(unused_imports)]
use super::dto::{
    CreatePromptRequest, FillPromptRequest, FillPromptResponse, PreviewPromptResponse,
    PromptListQuery, PromptListResponse, PromptResponse, SuccessFillPromptResponse,
    SuccessPreviewPromptResponse, SuccessPromptListResponse, SuccessPromptResponse,
    SuccessSyncParametersResponse, SyncParametersRequest, SyncParametersResponse,
    UpdatePromptRequest,
};
use super::service::PromptService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
#[allow(unused_imports)]
use crate::utils::ErrorResponse;
use crate::utils::BaseResponse;

/// 프롬프트 생성 API
///
/// 본문의 모든 `{{name}}` 토큰에 파라미터 정의가 있어야 저장됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/prompts",
    request_body = CreatePromptRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "프롬프트 생성 성공", body = SuccessPromptResponse),
        (status = 400, description = "잘못된 요청 또는 파라미터 정의 누락", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 태그", body = ErrorResponse),
        (status = 409, description = "프롬프트 이름 중복", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn create_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    req: Result<Json<CreatePromptRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BaseResponse<PromptResponse>>), AppError> {
    let Json(req) = req?;
    req.validate()?;

    let user_id = user.user_id()?;
    let result = PromptService::create_prompt(state, user_id, req).await?;

    Ok((StatusCode::CREATED, Json(BaseResponse::created(result))))
}

/// 프롬프트 목록 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/prompts",
    params(PromptListQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "목록 조회 성공", body = SuccessPromptListResponse),
        (status = 400, description = "잘못된 쿼리 파라미터", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<PromptListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<PromptListResponse>>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let user_id = user.user_id()?;
    let result = PromptService::list_prompts(state, user_id, query).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 프롬프트 단건 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "프롬프트 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "조회 성공", body = SuccessPromptResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn get_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BaseResponse<PromptResponse>>, AppError> {
    let Path(prompt_id) = path?;

    let user_id = user.user_id()?;
    let result = PromptService::get_prompt(state, user_id, prompt_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 프롬프트 수정 API
///
/// 이름, 설명, 본문, 파라미터를 교체합니다. `tags`를 보내면 태그 연결도 교체합니다.
#[utoipa::path(
    put,
    path = "/api/v1/prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "프롬프트 ID")
    ),
    request_body = UpdatePromptRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "수정 성공", body = SuccessPromptResponse),
        (status = 400, description = "잘못된 요청 또는 파라미터 정의 누락", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트 또는 태그", body = ErrorResponse),
        (status = 409, description = "프롬프트 이름 중복", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn update_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    req: Result<Json<UpdatePromptRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<PromptResponse>>, AppError> {
    let Path(prompt_id) = path?;
    let Json(req) = req?;
    req.validate()?;

    let user_id = user.user_id()?;
    let result = PromptService::update_prompt(state, user_id, prompt_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 프롬프트 삭제 API
#[utoipa::path(
    delete,
    path = "/api/v1/prompts/{id}",
    params(
        ("id" = Uuid, Path, description = "프롬프트 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn delete_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(prompt_id) = path?;

    let user_id = user.user_id()?;
    PromptService::delete_prompt(state, user_id, prompt_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 파라미터 동기화 API
///
/// 작성 중인 본문 기준으로 파라미터 목록을 정리합니다. 저장하지 않습니다.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/parameters",
    request_body = SyncParametersRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "동기화 성공", body = SuccessSyncParametersResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn sync_parameters(
    _user: AuthUser,
    req: Result<Json<SyncParametersRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SyncParametersResponse>>, AppError> {
    let Json(req) = req?;

    Ok(Json(BaseResponse::success(
        PromptService::sync_draft_parameters(req),
    )))
}

/// 파라미터 채우기 API
///
/// 모든 파라미터에 값이 있어야 하며, 하나라도 비어 있으면 PROMPT4003을 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/{id}/fill",
    params(
        ("id" = Uuid, Path, description = "프롬프트 ID")
    ),
    request_body = FillPromptRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "채우기 성공", body = SuccessFillPromptResponse),
        (status = 400, description = "값이 없는 파라미터", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn fill_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    req: Result<Json<FillPromptRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<FillPromptResponse>>, AppError> {
    let Path(prompt_id) = path?;
    let Json(req) = req?;

    let user_id = user.user_id()?;
    let result = PromptService::fill_prompt(state, user_id, prompt_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 미리보기 API
///
/// 값이 없는 파라미터는 `{{name}}`으로 남기고 누락 목록을 함께 반환합니다.
#[utoipa::path(
    post,
    path = "/api/v1/prompts/{id}/preview",
    params(
        ("id" = Uuid, Path, description = "프롬프트 ID")
    ),
    request_body = FillPromptRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "미리보기 성공", body = SuccessPreviewPromptResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 프롬프트", body = ErrorResponse)
    ),
    tag = "Prompt"
)]
pub async fn preview_prompt(
    State(state): State<AppState>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    req: Result<Json<FillPromptRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<PreviewPromptResponse>>, AppError> {
    let Path(prompt_id) = path?;
    let Json(req) = req?;

    let user_id = user.user_id()?;
    let result = PromptService::preview_prompt(state, user_id, prompt_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}
