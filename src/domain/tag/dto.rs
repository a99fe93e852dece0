use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::tag;

// ============== 태그 생성 / 이름 변경 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "태그 이름은 1~50자여야 합니다."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 50, message = "태그 이름은 1~50자여야 합니다."))]
    pub name: String,
}

// ============== 응답 ==============

/// 프롬프트에 붙어 있는 태그 요약
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<tag::Model> for TagSummary {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// 이 태그가 붙은 프롬프트 수
    pub prompt_count: u64,
}

impl TagResponse {
    pub fn from_model(model: tag::Model, prompt_count: u64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            prompt_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessTagResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: TagResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessTagListResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Vec<TagResponse>,
}
