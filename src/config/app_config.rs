use std::env;

pub const DEFAULT_LLM_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_IMPROVEMENT_MODEL: &str = "openai/gpt-4o-mini";

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_schema_update: bool,

    // Auth (토큰 발급은 외부 인증 서비스가 담당)
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,

    // LLM (OpenAI 호환 API)
    pub llm_api_key: String,
    pub llm_api_base: String,
    pub improvement_model: String,
    pub llm_timeout_secs: u64,

    pub rate_limit_enabled: bool,
    pub log_dir: String,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let db_schema_update = parse_bool("DB_SCHEMA_UPDATE", false)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "secret".to_string()
        });
        let jwt_audience = non_empty_var("JWT_AUDIENCE");

        let llm_api_key = env::var("LLM_API_KEY").unwrap_or_else(|_| {
            tracing::warn!(
                "LLM_API_KEY 환경변수가 설정되지 않았습니다. 프롬프트 개선 기능을 사용할 수 없습니다."
            );
            String::new()
        });
        let llm_api_base =
            non_empty_var("LLM_API_BASE").unwrap_or_else(|| DEFAULT_LLM_API_BASE.to_string());
        let improvement_model = non_empty_var("PROMPTS_IMPROVEMENT_MODEL")
            .unwrap_or_else(|| DEFAULT_IMPROVEMENT_MODEL.to_string());
        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let rate_limit_enabled = parse_bool("RATE_LIMIT_ENABLED", true)?;
        let log_dir = Self::log_dir_from_env();

        Ok(Self {
            server_port,
            database_url,
            db_schema_update,
            jwt_secret,
            jwt_audience,
            llm_api_key,
            llm_api_base,
            improvement_model,
            llm_timeout_secs,
            rate_limit_enabled,
            log_dir,
        })
    }

    /// 로깅은 설정 로드보다 먼저 초기화되므로 로그 디렉터리만 따로 읽습니다.
    pub fn log_dir_from_env() -> String {
        non_empty_var("LOG_DIR").unwrap_or_else(|| "logs".to_string())
    }

    /// 테스트용 기본 설정
    pub fn for_test(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            server_port: 0,
            database_url: database_url.into(),
            db_schema_update: true,
            jwt_secret: jwt_secret.into(),
            jwt_audience: None,
            llm_api_key: "test-key".to_string(),
            llm_api_base: DEFAULT_LLM_API_BASE.to_string(),
            improvement_model: DEFAULT_IMPROVEMENT_MODEL.to_string(),
            llm_timeout_secs: 5,
            rate_limit_enabled: false,
            log_dir: "logs".to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match non_empty_var(key) {
        Some(raw) => raw
            .trim()
            .parse::<bool>()
            .map_err(|_| ConfigError::InvalidFlag(key)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
    #[error("Invalid LLM timeout")]
    InvalidTimeout,
    #[error("{0} must be 'true' or 'false'")]
    InvalidFlag(&'static str),
}
