use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 요청마다 부여되는 추적용 ID
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// 요청 ID를 부여하고 요청 단위 span 안에서 처리 시간과 상태 코드를 기록합니다.
///
/// 클라이언트가 `x-request-id`를 보내면 그대로 사용하고, 응답 헤더로 되돌려줍니다.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %path,
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(request).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let status = response.status();

        if status.is_server_error() {
            warn!(duration_ms, status = status.as_u16(), "request failed");
        } else {
            info!(duration_ms, status = status.as_u16(), "request completed");
        }

        let header_value = HeaderValue::from_str(&request_id)
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), header_value);
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn should_echo_incoming_request_id() {
        // Arrange
        let request = Request::builder()
            .uri("/")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app().oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn should_generate_request_id_when_absent() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();

        let id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
