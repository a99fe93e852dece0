use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_token, Claims};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 인증된 사용자 정보를 담는 Extractor
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// JWT Claims에서 사용자 ID를 추출합니다.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자 ID입니다.".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Authorization 헤더에서 토큰 추출 시도
        let token = if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
            let auth_header_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

            auth_header_str
                .strip_prefix("Bearer ")
                .filter(|token| !token.is_empty())
                .ok_or_else(|| AppError::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string()))?
                .to_string()
        } else {
            // 2. 쿠키에서 토큰 추출 시도
            extract_token_from_cookie(parts)?
        };

        let claims = decode_token(
            &token,
            &state.config.jwt_secret,
            state.config.jwt_audience.as_deref(),
        )?;

        Ok(AuthUser(claims))
    }
}

fn extract_token_from_cookie(parts: &Parts) -> Result<String, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);

    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))
}
