use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};

use crate::utils::error::AppError;

/// 헬스체크용 짧은 타임아웃
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// OpenAI 호환 API 에러를 세분화된 AppError로 변환
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = api_err.message.to_lowercase();

            if err_type == "authentication_error"
                || message.contains("api key")
                || message.contains("unauthorized")
            {
                AppError::AiAuthError
            } else if err_type == "rate_limit_error" || message.contains("rate limit") {
                AppError::AiRateLimitError
            } else if err_type == "server_error"
                || message.contains("overloaded")
                || message.contains("server")
            {
                AppError::AiTemporaryError
            } else {
                AppError::AiError(api_err.message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::AiTemporaryError
            } else if status == Some(401) || status == Some(403) {
                AppError::AiAuthError
            } else if status == Some(429) {
                AppError::AiRateLimitError
            } else if status.map(|s| s >= 500).unwrap_or(false) {
                AppError::AiTemporaryError
            } else {
                AppError::AiError(req_err.to_string())
            }
        }
        OpenAIError::JSONDeserialize(e) => AppError::AiInvalidResponse(e.to_string()),
        _ => AppError::AiError(error.to_string()),
    }
}

/// AI 클라이언트 인터페이스
///
/// LLM 호출을 추상화하여 테스트에서 Mock 객체로 대체할 수 있습니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiClientTrait: Send + Sync {
    /// 채팅 완성 요청, 첫 번째 선택지의 텍스트를 반환합니다.
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError>;

    /// 헬스체크용 최소 텍스트 생성
    async fn health_check(&self) -> Result<String, AppError>;
}

/// OpenAI 호환 API 클라이언트 구현체 (기본값은 OpenRouter)
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_base: &str, model: &str, timeout_secs: u64) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn send(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        timeout: Duration,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .build()
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let response = tokio::time::timeout(timeout, self.client.chat().create(request))
            .await
            .map_err(|_| AppError::AiTemporaryError)? // 타임아웃
            .map_err(classify_openai_error)?;

        first_choice_content(response)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn first_choice_content(response: CreateChatCompletionResponse) -> Result<String, AppError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AppError::AiInvalidResponse("응답에 내용이 없습니다.".to_string()))
}

#[async_trait::async_trait]
impl AiClientTrait for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        self.send(messages, self.timeout).await
    }

    async fn health_check(&self) -> Result<String, AppError> {
        let messages = vec![build_system_message("Respond with exactly 'ok'")?];
        self.send(messages, Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS))
            .await
    }
}

/// 메시지 빌더 헬퍼 함수
pub fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::InternalError(e.to_string()))?,
    ))
}

pub fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::InternalError(e.to_string()))?,
    ))
}
