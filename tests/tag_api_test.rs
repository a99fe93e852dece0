//! 태그 및 프롬프트-태그 연결 API 통합 테스트
//!
//! - GET/POST /api/v1/tags, PATCH/DELETE /api/v1/tags/{id}
//! - POST/DELETE /api/v1/prompt-tags

mod common;

use axum::http::StatusCode;
use common::{create_prompt, create_tag, id_of, test_server, token_for};
use serde_json::{json, Value};
use uuid::Uuid;

// ============== 태그 ==============

#[tokio::test]
async fn should_list_tags_sorted_with_prompt_count() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let writing = create_tag(&server, &token, "writing").await;
    create_tag(&server, &token, "coding").await;
    create_prompt(
        &server,
        &token,
        json!({ "name": "p", "content": "x", "tags": [id_of(&writing)] }),
    )
    .await;

    // Act
    let response = server.get("/api/v1/tags").authorization_bearer(&token).await;

    // Assert
    response.assert_status_ok();
    let result = response.json::<Value>()["result"].clone();
    assert_eq!(result[0]["name"], "coding");
    assert_eq!(result[0]["promptCount"], 0);
    assert_eq!(result[1]["name"], "writing");
    assert_eq!(result[1]["promptCount"], 1);
}

#[tokio::test]
async fn should_reject_duplicate_tag_name_ignoring_case() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    create_tag(&server, &token, "Work").await;

    // Act
    let response = server
        .post("/api/v1/tags")
        .authorization_bearer(&token)
        .json(&json!({ "name": " work " }))
        .await;

    // Assert
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "TAG4091");
}

#[tokio::test]
async fn should_reject_empty_tag_name() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/tags")
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .json(&json!({ "name": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_rename_tag() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let tag = create_tag(&server, &token, "draft").await;

    // Act
    let response = server
        .patch(&format!("/api/v1/tags/{}", id_of(&tag)))
        .authorization_bearer(&token)
        .json(&json!({ "name": "final" }))
        .await;

    // Assert
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["result"]["name"], "final");
}

#[tokio::test]
async fn should_not_rename_tag_of_other_user() {
    let server = test_server().await;
    let tag = create_tag(&server, &token_for(Uuid::new_v4()), "mine").await;

    let response = server
        .patch(&format!("/api/v1/tags/{}", id_of(&tag)))
        .authorization_bearer(&token_for(Uuid::new_v4()))
        .json(&json!({ "name": "yours" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "TAG4041");
}

#[tokio::test]
async fn should_delete_tag_and_detach_from_prompts() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let tag = create_tag(&server, &token, "temp").await;
    let prompt = create_prompt(
        &server,
        &token,
        json!({ "name": "p", "content": "x", "tags": [id_of(&tag)] }),
    )
    .await;

    // Act
    let response = server
        .delete(&format!("/api/v1/tags/{}", id_of(&tag)))
        .authorization_bearer(&token)
        .await;

    // Assert
    response.assert_status(StatusCode::NO_CONTENT);
    let fetched = server
        .get(&format!("/api/v1/prompts/{}", id_of(&prompt)))
        .authorization_bearer(&token)
        .await;
    assert_eq!(fetched.json::<Value>()["result"]["tags"], json!([]));
}

// ============== 프롬프트-태그 연결 ==============

#[tokio::test]
async fn should_assign_and_remove_tag() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let prompt = create_prompt(&server, &token, json!({ "name": "p", "content": "x" })).await;
    let tag = create_tag(&server, &token, "t").await;
    let link = json!({ "promptId": id_of(&prompt), "tagId": id_of(&tag) });

    // Act
    let assigned = server
        .post("/api/v1/prompt-tags")
        .authorization_bearer(&token)
        .json(&link)
        .await;
    let removed = server
        .delete("/api/v1/prompt-tags")
        .authorization_bearer(&token)
        .json(&link)
        .await;

    // Assert
    assigned.assert_status(StatusCode::CREATED);
    let result = assigned.json::<Value>()["result"].clone();
    assert_eq!(result["promptName"], "p");
    assert_eq!(result["tagName"], "t");
    removed.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn should_return_409_for_existing_link() {
    // Arrange
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let tag = create_tag(&server, &token, "t").await;
    let prompt = create_prompt(
        &server,
        &token,
        json!({ "name": "p", "content": "x", "tags": [id_of(&tag)] }),
    )
    .await;

    // Act
    let response = server
        .post("/api/v1/prompt-tags")
        .authorization_bearer(&token)
        .json(&json!({ "promptId": id_of(&prompt), "tagId": id_of(&tag) }))
        .await;

    // Assert
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "PROMPT_TAG4091");
}

#[tokio::test]
async fn should_return_404_when_removing_missing_link() {
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let prompt = create_prompt(&server, &token, json!({ "name": "p", "content": "x" })).await;
    let tag = create_tag(&server, &token, "t").await;

    let response = server
        .delete("/api/v1/prompt-tags")
        .authorization_bearer(&token)
        .json(&json!({ "promptId": id_of(&prompt), "tagId": id_of(&tag) }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "PROMPT_TAG4041");
}

#[tokio::test]
async fn should_forbid_linking_tag_of_other_user() {
    // Arrange
    let server = test_server().await;
    let owner = token_for(Uuid::new_v4());
    let prompt = create_prompt(&server, &owner, json!({ "name": "p", "content": "x" })).await;
    let foreign_tag = create_tag(&server, &token_for(Uuid::new_v4()), "foreign").await;

    // Act
    let response = server
        .post("/api/v1/prompt-tags")
        .authorization_bearer(&owner)
        .json(&json!({ "promptId": id_of(&prompt), "tagId": id_of(&foreign_tag) }))
        .await;

    // Assert
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["code"], "PROMPT_TAG4031");
}

#[tokio::test]
async fn should_return_404_for_unknown_tag() {
    let server = test_server().await;
    let token = token_for(Uuid::new_v4());
    let prompt = create_prompt(&server, &token, json!({ "name": "p", "content": "x" })).await;

    let response = server
        .post("/api/v1/prompt-tags")
        .authorization_bearer(&token)
        .json(&json!({ "promptId": id_of(&prompt), "tagId": Uuid::new_v4() }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "TAG4041");
}
