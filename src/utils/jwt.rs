use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// 외부 인증 서비스가 발급한 액세스 토큰의 Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (User UUID)
    pub sub: String,
    /// Expiration
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// HS256 액세스 토큰 생성
///
/// 서버는 토큰을 발급하지 않으므로 테스트와 로컬 개발 용도로만 쓰입니다.
pub fn encode_token(
    sub: String,
    secret: &str,
    audience: Option<&str>,
    expiration_seconds: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(expiration_seconds))
        .ok_or_else(|| AppError::InternalError("Invalid token expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub,
        exp: expiration,
        iat: Some(now.timestamp() as usize),
        aud: audience.map(str::to_string),
        email: None,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Token creation failed: {}", e)))
}

/// JWT 토큰 검증
///
/// `audience`가 없으면 aud 클레임은 검사하지 않습니다.
pub fn decode_token(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("토큰이 만료되었습니다.".into())
        }
        _ => AppError::Unauthorized("유효하지 않은 토큰입니다.".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_token_it_encoded() {
        // Arrange
        let secret = "test_secret";
        let sub = "3f1c2a4e-9a43-4a8e-9b1d-2f0c6a1d7e11".to_string();

        // Act
        let token = encode_token(sub.clone(), secret, None, 3600).unwrap();
        let claims = decode_token(&token, secret, None).unwrap();

        // Assert
        assert_eq!(claims.sub, sub);
    }

    #[test]
    fn should_reject_malformed_token() {
        let result = decode_token("invalid_token", "test_secret", None);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let token = encode_token("user".to_string(), "secret-a", None, 3600).unwrap();

        let result = decode_token(&token, "secret-b", None);

        assert!(result.is_err());
    }

    #[test]
    fn should_reject_expired_token() {
        let token = encode_token("user".to_string(), "test_secret", None, -3600).unwrap();

        let result = decode_token(&token, "test_secret", None);

        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "토큰이 만료되었습니다."),
            other => panic!("expected expired error, got {:?}", other),
        }
    }

    #[test]
    fn should_check_audience_when_configured() {
        let token =
            encode_token("user".to_string(), "test_secret", Some("authenticated"), 3600).unwrap();

        assert!(decode_token(&token, "test_secret", Some("authenticated")).is_ok());
        assert!(decode_token(&token, "test_secret", Some("other")).is_err());
        assert!(decode_token(&token, "test_secret", None).is_ok());
    }
}
