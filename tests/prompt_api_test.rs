//! 프롬프트 API 통합 테스트
//!
//! - POST/GET/PUT/DELETE /api/v1/prompts
//! - POST /api/v1/prompts/parameters
//! - POST /api/v1/prompts/{id}/fill, /preview

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use common::{create_prompt, create_tag, id_of, test_server, token_for};
use serde_json::{json, Value};
use uuid::Uuid;

fn greeting_prompt() -> Value {
    json!({
        "name": "Greeting",
        "description": "주문 안내",
        "content": "Hello {{name}}, your order {{order_id}} is ready.",
        "parameters": [
            { "name": "name", "type": "short-text" },
            { "name": "order_id", "type": "short-text" }
        ]
    })
}

// ============== 인증 ==============

#[tokio::test]
async fn should_return_401_without_token() {
    // Arrange
    let server = test_server().await;

    // Act
    let response = server.get("/api/v1/prompts").await;

    // Assert
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["code"], "AUTH4011");
}

#[tokio::test]
async fn should_return_401_with_token_signed_by_other_secret() {
    // Arrange
    let server = test_server().await;
    let forged =
        prompt_pocket::utils::jwt::encode_token(Uuid::new_v4().to_string(), "other", None, 3600)
            .unwrap();

    // Act
    let response = server
        .get("/api/v1/prompts")
        .authorization_bearer(&forged)
        .await;

    // Assert
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_accept_token_from_cookie() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let response = server
        .get("/api/v1/prompts")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("access_token={}", token)).unwrap(),
        )
        .await;

    // Assert
    response.assert_status_ok();
}

// ============== 생성 ==============

#[tokio::test]
async fn should_create_prompt_with_tags() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let tag = create_tag(&server, &token, "work").await;
    let mut body = greeting_prompt();
    body["tags"] = json!([id_of(&tag)]);

    // Act
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&body)
        .await;

    // Assert
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["code"], "COMMON201");
    assert_eq!(body["result"]["name"], "Greeting");
    assert_eq!(body["result"]["parameters"][1]["name"], "order_id");
    assert_eq!(body["result"]["tags"][0]["name"], "work");
}

#[tokio::test]
async fn should_reject_prompt_without_parameter_definitions() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&json!({ "name": "p", "content": "Hi {{a}} and {{b}}" }))
        .await;

    // Assert
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "PROMPT4001");
    assert_eq!(body["result"]["parameters"], json!(["a", "b"]));
}

#[tokio::test]
async fn should_reject_prompt_with_blank_token() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&json!({ "name": "p", "content": "Hi {{   }} there" }))
        .await;

    // Assert
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "PROMPT4001");
    assert_eq!(body["result"]["parameters"], json!([""]));
}

#[tokio::test]
async fn should_reject_prompt_with_undefined_parameters() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&json!({
            "name": "p",
            "content": "Hi {{a}} and {{b}}",
            "parameters": [{ "name": "a", "type": "long-text" }]
        }))
        .await;

    // Assert
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "PROMPT4002");
    assert_eq!(body["result"]["missingParameters"], json!(["b"]));
}

#[tokio::test]
async fn should_prune_definitions_missing_from_content() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let created = create_prompt(
        &server,
        &token,
        json!({
            "name": "p",
            "content": "Only {{kept}}",
            "parameters": [
                { "name": "stale", "type": "short-text" },
                { "name": "kept", "type": "long-text" }
            ]
        }),
    )
    .await;

    // Assert
    assert_eq!(
        created["parameters"],
        json!([{ "name": "kept", "type": "long-text" }])
    );
}

#[tokio::test]
async fn should_return_409_for_duplicate_name() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    create_prompt(&server, &token, greeting_prompt()).await;

    // Act
    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&greeting_prompt())
        .await;

    // Assert
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "PROMPT4091");
}

#[tokio::test]
async fn should_allow_same_name_for_different_users() {
    let server = test_server().await;
    create_prompt(&server, &token_for(Uuid::new_v4()), greeting_prompt()).await;

    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .json(&greeting_prompt())
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn should_return_400_for_malformed_body() {
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    let response = server
        .post("/api/v1/prompts")
        .authorization_bearer(&token)
        .json(&json!({ "name": "missing content" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "COMMON400");
}

// ============== 조회 / 수정 / 삭제 ==============

#[tokio::test]
async fn should_hide_prompt_from_other_users() {
    // Arrange
    let server = test_server().await;
    let owner = token_for(Uuid::new_v4());
    let created = create_prompt(&server, &owner, greeting_prompt()).await;

    // Act
    let response = server
        .get(&format!("/api/v1/prompts/{}", id_of(&created)))
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .await;

    // Assert
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "PROMPT4041");
}

#[tokio::test]
async fn should_return_400_for_invalid_path_id() {
    let server = test_server().await;

    let response = server
        .get("/api/v1/prompts/not-a-uuid")
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_update_prompt_and_replace_tags() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let old_tag = create_tag(&server, &token, "old").await;
    let new_tag = create_tag(&server, &token, "new").await;
    let mut body = greeting_prompt();
    body["tags"] = json!([id_of(&old_tag)]);
    let created = create_prompt(&server, &token, body).await;

    // Act
    let response = server
        .put(&format!("/api/v1/prompts/{}", id_of(&created)))
        .authorization_bearer(&token)
        .json(&json!({
            "name": "Greeting v2",
            "content": "Dear {{name}}",
            "parameters": [{ "name": "name", "type": "long-text" }],
            "tags": [id_of(&new_tag)]
        }))
        .await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result["name"], "Greeting v2");
    assert_eq!(result["parameters"], json!([{ "name": "name", "type": "long-text" }]));
    assert_eq!(result["tags"], json!([{ "id": id_of(&new_tag), "name": "new" }]));
}

#[tokio::test]
async fn should_keep_tags_when_update_omits_them() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let tag = create_tag(&server, &token, "keep").await;
    let mut body = greeting_prompt();
    body["tags"] = json!([id_of(&tag)]);
    let created = create_prompt(&server, &token, body).await;

    // Act
    let response = server
        .put(&format!("/api/v1/prompts/{}", id_of(&created)))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Plain", "content": "no parameters" }))
        .await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result["parameters"], json!([]));
    assert_eq!(result["tags"][0]["name"], "keep");
}

#[tokio::test]
async fn should_delete_prompt() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let created = create_prompt(&server, &token, greeting_prompt()).await;
    let path = format!("/api/v1/prompts/{}", id_of(&created));

    // Act
    let response = server.delete(&path).authorization_bearer(&token).await;

    // Assert
    response.assert_status(StatusCode::NO_CONTENT);
    server
        .get(&path)
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============== 목록 ==============

#[tokio::test]
async fn should_list_with_search_and_pagination() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    for name in ["Email reply", "email summary", "Code review"] {
        create_prompt(&server, &token, json!({ "name": name, "content": "text" })).await;
    }

    // Act
    let response = server
        .get("/api/v1/prompts")
        .authorization_bearer(&token)
        .add_query_param("search", "EMAIL")
        .add_query_param("sortBy", "name")
        .add_query_param("sortDir", "asc")
        .add_query_param("pageSize", 1)
        .await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result["data"].as_array().unwrap().len(), 1);
    assert_eq!(result["data"][0]["name"], "Email reply");
    assert_eq!(result["pagination"]["totalItems"], 2);
    assert_eq!(result["pagination"]["totalPages"], 2);
    assert_eq!(result["pagination"]["currentPage"], 1);
}

#[tokio::test]
async fn should_filter_prompts_carrying_all_tags() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let a = id_of(&create_tag(&server, &token, "a").await);
    let b = id_of(&create_tag(&server, &token, "b").await);
    create_prompt(&server, &token, json!({ "name": "both", "content": "x", "tags": [a, b] })).await;
    create_prompt(&server, &token, json!({ "name": "only-a", "content": "x", "tags": [a] })).await;

    // Act
    let response = server
        .get("/api/v1/prompts")
        .authorization_bearer(&token)
        .add_query_param("tags", format!("{},{}", a, b))
        .await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result["pagination"]["totalItems"], 1);
    assert_eq!(result["data"][0]["name"], "both");
}

#[tokio::test]
async fn should_reject_page_beyond_limit() {
    let server = test_server().await;

    let response = server
        .get("/api/v1/prompts")
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .add_query_param("page", 1_000_000_000_000_000_000u64)
        .add_query_param("pageSize", 100)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "COMMON400");
}

#[tokio::test]
async fn should_reject_page_size_over_limit() {
    let server = test_server().await;

    let response = server
        .get("/api/v1/prompts")
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .add_query_param("pageSize", 101)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============== 파라미터 ==============

#[tokio::test]
async fn should_fill_prompt_with_all_values() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let created = create_prompt(&server, &token, greeting_prompt()).await;

    // Act
    let response = server
        .post(&format!("/api/v1/prompts/{}/fill", id_of(&created)))
        .authorization_bearer(&token)
        .json(&json!({ "values": { "name": "Ann", "order_id": "42" } }))
        .await;

    // Assert
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["result"]["content"],
        "Hello Ann, your order 42 is ready."
    );
}

#[tokio::test]
async fn should_reject_fill_with_blank_value() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let created = create_prompt(&server, &token, greeting_prompt()).await;

    // Act
    let response = server
        .post(&format!("/api/v1/prompts/{}/fill", id_of(&created)))
        .authorization_bearer(&token)
        .json(&json!({ "values": { "name": "  " } }))
        .await;

    // Assert
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "PROMPT4003");
    assert_eq!(body["result"]["missingParameters"], json!(["name", "order_id"]));
}

#[tokio::test]
async fn should_preview_with_placeholders() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let created = create_prompt(&server, &token, greeting_prompt()).await;

    // Act
    let response = server
        .post(&format!("/api/v1/prompts/{}/preview", id_of(&created)))
        .authorization_bearer(&token)
        .json(&json!({ "values": { "name": "Ann" } }))
        .await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result["content"], "Hello Ann, your order {{order_id}} is ready.");
    assert_eq!(result["missingParameters"], json!(["order_id"]));
    assert_eq!(result["missingCount"], 1);
}

#[tokio::test]
async fn should_sync_draft_parameters() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());

    // Act
    let response = server
        .post("/api/v1/prompts/parameters")
        .authorization_bearer(&token)
        .json(&json!({
            "content": "{{topic}} in {{style}}",
            "parameters": [
                { "name": "style", "type": "long-text" },
                { "name": "removed", "type": "short-text" }
            ]
        }))
        .await;

    // Assert
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["result"]["parameters"],
        json!([
            { "name": "style", "type": "long-text" },
            { "name": "topic", "type": "short-text" }
        ])
    );
}
