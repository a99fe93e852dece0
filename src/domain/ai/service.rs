use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::client::{build_system_message, build_user_message, AiClientTrait};
use super::dto::{ImprovePromptRequest, ImprovePromptResponse, LlmImprovement};
use super::prompt::ImprovePrompt;
use super::retry::with_retry;
use crate::domain::prompt::template::extract_parameters;
use crate::utils::error::AppError;

pub struct AiService;

impl AiService {
    /// LLM으로 프롬프트를 개선하고 개선된 본문의 파라미터를 함께 반환합니다.
    pub async fn improve_prompt(
        client: Arc<dyn AiClientTrait>,
        req: ImprovePromptRequest,
    ) -> Result<ImprovePromptResponse, AppError> {
        let messages = vec![
            build_system_message(&ImprovePrompt::system_prompt(req.instruction.as_deref()))?,
            build_user_message(&ImprovePrompt::user_prompt(&req.content))?,
        ];

        let raw = with_retry(|| {
            let client = Arc::clone(&client);
            let messages = messages.clone();
            async move { client.complete(messages).await }
        })
        .await?;

        let improvement = parse_improvement(&raw)?;
        let detected_parameters = extract_parameters(&improvement.improved_content);

        info!(
            original_len = req.content.len(),
            improved_len = improvement.improved_content.len(),
            parameters = detected_parameters.len(),
            "Prompt improved"
        );

        Ok(ImprovePromptResponse {
            improved_content: improvement.improved_content,
            explanation: improvement.explanation,
            detected_parameters,
        })
    }
}

/// 모델 응답을 해석합니다. 코드 펜스로 감싼 JSON도 허용합니다.
fn parse_improvement(raw: &str) -> Result<LlmImprovement, AppError> {
    let body = strip_code_fence(raw);

    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "LLM returned non-JSON content");
        AppError::AiInvalidResponse("JSON 형식이 아닙니다.".to_string())
    })?;

    if let Some(reason) = value.get("error") {
        let reason = reason.as_str().unwrap_or("요청을 처리할 수 없습니다.");
        warn!(reason, "LLM refused to improve prompt");
        return Err(AppError::AiPromptRejected(
            "유해하거나 위험한 프롬프트로 판단되어 개선할 수 없습니다.".to_string(),
        ));
    }

    let improvement: LlmImprovement = serde_json::from_value(value)
        .map_err(|e| AppError::AiInvalidResponse(format!("필수 필드가 없습니다: {}", e)))?;

    if improvement.improved_content.trim().is_empty() {
        return Err(AppError::AiInvalidResponse(
            "개선된 본문이 비어 있습니다.".to_string(),
        ));
    }

    Ok(improvement)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // ```json 같은 언어 표기는 첫 줄과 함께 버림
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::client::MockAiClientTrait;

    fn request(content: &str) -> ImprovePromptRequest {
        ImprovePromptRequest {
            content: content.to_string(),
            instruction: None,
        }
    }

    #[test]
    fn should_strip_json_code_fence() {
        let raw = "```json\n{\"a\":1}\n```";

        assert_eq!(strip_code_fence(raw), "{\"a\":1}");
    }

    #[test]
    fn should_keep_plain_json_untouched() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn should_treat_error_key_as_rejection() {
        let result = parse_improvement(r#"{"error": "Harmful or dangerous prompt detected."}"#);

        assert!(matches!(result, Err(AppError::AiPromptRejected(_))));
    }

    #[test]
    fn should_reject_non_json_answer() {
        let result = parse_improvement("Sure! Here is your improved prompt.");

        assert!(matches!(result, Err(AppError::AiInvalidResponse(_))));
    }

    #[test]
    fn should_reject_answer_without_required_fields() {
        let result = parse_improvement(r#"{"improved_content": "only content"}"#);

        assert!(matches!(result, Err(AppError::AiInvalidResponse(_))));
    }

    #[tokio::test]
    async fn should_return_improvement_with_detected_parameters() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().times(1).returning(|_| {
            Ok("```json\n{\"_thoughts\":\"t\",\"improved_content\":\"Write a poem about {{topic}} in {{style}}.\",\"explanation\":\"Added parameters\"}\n```".to_string())
        });

        // Act
        let result = AiService::improve_prompt(Arc::new(mock), request("write a poem")).await;

        // Assert
        let response = result.unwrap();
        assert_eq!(response.improved_content, "Write a poem about {{topic}} in {{style}}.");
        assert_eq!(response.detected_parameters, vec!["topic", "style"]);
        assert_eq!(response.explanation, "Added parameters");
    }

    #[tokio::test]
    async fn should_not_retry_rejected_prompt() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok(r#"{"error":"Harmful or dangerous prompt detected."}"#.to_string()));

        // Act
        let result = AiService::improve_prompt(Arc::new(mock), request("do harm")).await;

        // Assert
        assert!(matches!(result, Err(AppError::AiPromptRejected(_))));
    }

    #[tokio::test]
    async fn should_propagate_auth_error_without_retry() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(AppError::AiAuthError));

        let result = AiService::improve_prompt(Arc::new(mock), request("write a poem")).await;

        assert!(matches!(result, Err(AppError::AiAuthError)));
    }
}
