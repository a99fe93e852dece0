use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 프롬프트-태그 연결/해제 요청
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptTagRequest {
    pub prompt_id: Uuid,
    pub tag_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptTagResponse {
    pub prompt_id: Uuid,
    pub tag_id: Uuid,
    pub prompt_name: String,
    pub tag_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPromptTagResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: PromptTagResponse,
}
