use serde::Serialize;
use utoipa::ToSchema;

/// `GET /health` 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub checks: HealthChecks,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// LLM 장애 또는 지연. 프롬프트 관리 기능은 정상
    Degraded,
    /// 데이터베이스 장애
    Unhealthy,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthChecks {
    pub database: DependencyCheck,
    pub llm: DependencyCheck,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Up,
    Down,
}

/// 의존성 하나의 점검 결과
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCheck {
    pub status: CheckStatus,
    #[schema(example = 12)]
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DependencyCheck {
    pub fn up(latency_ms: u64) -> Self {
        Self {
            status: CheckStatus::Up,
            latency_ms,
            reason: None,
        }
    }

    pub fn down(latency_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Down,
            latency_ms,
            reason: Some(reason.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == CheckStatus::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_statuses_in_lowercase() {
        assert_eq!(serde_json::to_string(&HealthState::Degraded).unwrap(), "\"degraded\"");
        assert_eq!(serde_json::to_string(&CheckStatus::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn should_omit_reason_for_passing_check() {
        let json = serde_json::to_value(DependencyCheck::up(10)).unwrap();

        assert_eq!(json, serde_json::json!({ "status": "up", "latencyMs": 10 }));
    }
}
