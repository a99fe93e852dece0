//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite와 고정 응답 AI 클라이언트로 전체 라우터를 구성합니다.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_openai::types::ChatCompletionRequestMessage;
use axum_test::TestServer;
use prompt_pocket::{
    config::{establish_connection, AppConfig},
    create_router,
    domain::ai::client::AiClientTrait,
    utils::{error::AppError, jwt::encode_token},
    AppState,
};
use serde_json::{json, Value};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// 고정 응답을 돌려주는 AI 클라이언트
pub struct StubAiClient {
    reply: fn() -> Result<String, AppError>,
    calls: AtomicUsize,
}

impl StubAiClient {
    pub fn new(reply: fn() -> Result<String, AppError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AiClientTrait for StubAiClient {
    async fn complete(
        &self,
        _messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }

    async fn health_check(&self) -> Result<String, AppError> {
        Ok("ok".to_string())
    }
}

fn default_reply() -> Result<String, AppError> {
    Ok(r#"{"improved_content":"ok","explanation":"ok"}"#.to_string())
}

pub async fn test_server() -> TestServer {
    test_server_with_ai(Arc::new(StubAiClient::new(default_reply))).await
}

pub async fn test_server_with_ai(ai_client: Arc<dyn AiClientTrait>) -> TestServer {
    let config = AppConfig::for_test("sqlite::memory:", TEST_SECRET);
    let db = establish_connection(&config.database_url, true)
        .await
        .expect("in-memory database");

    let app = create_router(AppState::new(db, config, ai_client));
    TestServer::new(app).expect("test server")
}

pub fn token_for(user_id: Uuid) -> String {
    encode_token(user_id.to_string(), TEST_SECRET, None, 3600).expect("token")
}

/// 프롬프트 생성 후 응답의 result를 반환
pub async fn create_prompt(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(token)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["result"].clone()
}

pub async fn create_tag(server: &TestServer, token: &str, name: &str) -> Value {
    let response = server
        .post("/api/v1/tags")
        .authorization_bearer(token)
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["result"].clone()
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_string()
}
