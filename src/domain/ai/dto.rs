use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 프롬프트 개선 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptRequest {
    /// 개선할 프롬프트 본문
    #[validate(length(min = 3, max = 10000, message = "본문은 3자 이상 10000자 이하여야 합니다."))]
    pub content: String,

    /// 개선 방향에 대한 추가 지시사항
    #[validate(length(max = 1000, message = "지시사항은 1000자 이하여야 합니다."))]
    pub instruction: Option<String>,
}

/// 프롬프트 개선 결과
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePromptResponse {
    pub improved_content: String,
    pub explanation: String,
    /// 개선된 본문에서 추출한 파라미터 이름
    pub detected_parameters: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessImprovePromptResponse {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: ImprovePromptResponse,
}

/// LLM이 돌려주는 JSON 본문
#[derive(Debug, Deserialize)]
pub(crate) struct LlmImprovement {
    pub improved_content: String,
    pub explanation: String,
}
