use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use tracing::{error, warn};

use super::response::ErrorResponse;
use crate::domain::prompt::template::TemplateError;

/// 애플리케이션 전역 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// PROMPT4001: 본문에 토큰이 있으나 파라미터 정의가 없음
    #[error("본문에 파라미터가 있지만 파라미터 정의가 없습니다.")]
    MissingParameterDefinitions(Vec<String>),

    /// PROMPT4002: 정의되지 않은 파라미터가 있음
    #[error("정의되지 않은 파라미터가 있습니다.")]
    UndefinedParameters(Vec<String>),

    /// PROMPT4003: 채우지 않은 파라미터 값이 있음
    #[error("모든 파라미터 값을 입력해야 합니다.")]
    RequiredValueMissing(Vec<String>),

    /// PROMPT4041
    #[error("{0}")]
    PromptNotFound(String),

    /// PROMPT4091
    #[error("같은 이름의 프롬프트가 이미 존재합니다.")]
    PromptNameConflict,

    /// TAG4041
    #[error("{0}")]
    TagNotFound(String),

    /// TAG4091
    #[error("{0}")]
    TagAlreadyExists(String),

    /// PROMPT_TAG4091
    #[error("이미 연결된 태그입니다.")]
    DuplicateAssociation,

    /// PROMPT_TAG4041
    #[error("프롬프트와 태그의 연결이 존재하지 않습니다.")]
    AssociationNotFound,

    /// PROMPT_TAG4031
    #[error("해당 프롬프트와 태그를 연결할 권한이 없습니다.")]
    UnauthorizedAssociation,

    /// AI4221: 모델이 유해한 프롬프트로 판단해 처리를 거부함
    #[error("{0}")]
    AiPromptRejected(String),

    /// AI4291
    #[error("AI 요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.")]
    AiRateLimitError,

    /// AI5021
    #[error("AI 응답 형식이 올바르지 않습니다: {0}")]
    AiInvalidResponse(String),

    /// AI5031: 인증 실패 (API 키 문제)
    #[error("AI 서비스 인증에 실패했습니다.")]
    AiAuthError,

    /// AI5031: 타임아웃, 연결 실패, 5xx
    #[error("AI 서비스가 일시적으로 응답하지 않습니다.")]
    AiTemporaryError,

    /// AI5031: 분류되지 않은 AI 에러
    #[error("AI 서비스 오류: {0}")]
    AiError(String),

    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// 에러 메시지 반환
    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(_) => "서버 에러, 관리자에게 문의 바랍니다.".to_string(),
            AppError::AiError(_) => "AI 서비스 호출에 실패했습니다.".to_string(),
            _ => self.to_string(),
        }
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::BadRequest(_) => "COMMON400",
            AppError::ValidationError(_) => "COMMON400",
            AppError::JsonParseFailed(_) => "COMMON400",
            AppError::Unauthorized(_) => "AUTH4011",
            AppError::Forbidden(_) => "COMMON403",
            AppError::NotFound(_) => "COMMON404",
            AppError::MissingParameterDefinitions(_) => "PROMPT4001",
            AppError::UndefinedParameters(_) => "PROMPT4002",
            AppError::RequiredValueMissing(_) => "PROMPT4003",
            AppError::PromptNotFound(_) => "PROMPT4041",
            AppError::PromptNameConflict => "PROMPT4091",
            AppError::TagNotFound(_) => "TAG4041",
            AppError::TagAlreadyExists(_) => "TAG4091",
            AppError::DuplicateAssociation => "PROMPT_TAG4091",
            AppError::AssociationNotFound => "PROMPT_TAG4041",
            AppError::UnauthorizedAssociation => "PROMPT_TAG4031",
            AppError::AiPromptRejected(_) => "AI4221",
            AppError::AiRateLimitError => "AI4291",
            AppError::AiInvalidResponse(_) => "AI5021",
            AppError::AiAuthError => "AI5031",
            AppError::AiTemporaryError => "AI5031",
            AppError::AiError(_) => "AI5031",
            AppError::InternalError(_) => "COMMON500",
        }
        .to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::JsonParseFailed(_)
            | AppError::MissingParameterDefinitions(_)
            | AppError::UndefinedParameters(_)
            | AppError::RequiredValueMissing(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::UnauthorizedAssociation => StatusCode::FORBIDDEN,
            AppError::NotFound(_)
            | AppError::PromptNotFound(_)
            | AppError::TagNotFound(_)
            | AppError::AssociationNotFound => StatusCode::NOT_FOUND,
            AppError::PromptNameConflict
            | AppError::TagAlreadyExists(_)
            | AppError::DuplicateAssociation => StatusCode::CONFLICT,
            AppError::AiPromptRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AiRateLimitError => StatusCode::TOO_MANY_REQUESTS,
            AppError::AiInvalidResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::AiAuthError | AppError::AiTemporaryError | AppError::AiError(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러 상세 정보 (누락된 파라미터 이름 목록 등)
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::MissingParameterDefinitions(names) => Some(json!({ "parameters": names })),
            AppError::UndefinedParameters(names) | AppError::RequiredValueMissing(names) => {
                Some(json!({ "missingParameters": names }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.message();

        // 에러 로깅
        if status.is_server_error() {
            error!(code = %error_code, "Server error: {}", self);
        } else {
            warn!(code = %error_code, "Client error: {}", self);
        }

        let error_response = ErrorResponse::new(error_code, message).with_result(self.details());

        (status, Json(error_response)).into_response()
    }
}

impl From<TemplateError> for AppError {
    fn from(error: TemplateError) -> Self {
        match error {
            TemplateError::MissingParameterDefinitions(names) => {
                AppError::MissingParameterDefinitions(names)
            }
            TemplateError::UndefinedParameters(names) => AppError::UndefinedParameters(names),
            TemplateError::RequiredValueMissing(names) => AppError::RequiredValueMissing(names),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("잘못된 쿼리 파라미터입니다: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("잘못된 경로 파라미터입니다: {}", rejection.body_text()))
    }
}

/// 유니크 제약 위반은 `conflict`로, 그 외 DB 에러는 내부 에러로 변환합니다.
pub fn map_unique_violation(error: DbErr, conflict: AppError) -> AppError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => AppError::InternalError(error.to_string()),
    }
}

/// 편의 함수들
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }
}
