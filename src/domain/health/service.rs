use std::sync::Arc;
use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;
use tokio::time::timeout;

use super::dto::{DependencyCheck, HealthChecks, HealthState, HealthStatus};
use crate::domain::ai::client::AiClientTrait;

/// 개별 체크 타임아웃
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// LLM 응답이 이 시간 이상이면 Degraded
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

/// LLM 체크 결과 캐시 유효 시간
const CACHE_DURATION: Duration = Duration::from_secs(30);

struct CachedCheck {
    result: DependencyCheck,
    cached_at: Instant,
}

/// 가동 시간과 LLM 체크 캐시를 보관합니다. 서버 시작 시 한 번 만들어 상태에 넣습니다.
pub struct HealthMonitor {
    started_at: Instant,
    llm_cache: RwLock<Option<CachedCheck>>,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            llm_cache: RwLock::new(None),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 전체 헬스 체크 수행
    pub async fn check(
        &self,
        db: &DatabaseConnection,
        ai_client: &Arc<dyn AiClientTrait>,
    ) -> HealthStatus {
        let (database, llm) = tokio::join!(check_database(db), self.check_llm_cached(ai_client));
        let status = determine_health_state(&database, &llm);

        HealthStatus {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: self.uptime_secs(),
            checks: HealthChecks { database, llm },
        }
    }

    async fn check_llm_cached(&self, ai_client: &Arc<dyn AiClientTrait>) -> DependencyCheck {
        {
            let cached = self.llm_cache.read().await;
            if let Some(ref c) = *cached {
                if c.cached_at.elapsed() < CACHE_DURATION {
                    tracing::debug!(
                        cache_age_secs = c.cached_at.elapsed().as_secs(),
                        "Using cached LLM health check result"
                    );
                    return c.result.clone();
                }
            }
        }

        let result = check_llm(ai_client).await;

        let mut cached = self.llm_cache.write().await;
        *cached = Some(CachedCheck {
            result: result.clone(),
            cached_at: Instant::now(),
        });

        result
    }
}

/// DB 장애는 Unhealthy, LLM 장애나 지연은 Degraded
fn determine_health_state(database: &DependencyCheck, llm: &DependencyCheck) -> HealthState {
    if !database.is_up() {
        HealthState::Unhealthy
    } else if !llm.is_up() || llm.latency_ms >= DEGRADED_THRESHOLD.as_millis() as u64 {
        HealthState::Degraded
    } else {
        HealthState::Healthy
    }
}

async fn check_database(db: &DatabaseConnection) -> DependencyCheck {
    let start = Instant::now();
    let result = timeout(HEALTH_CHECK_TIMEOUT, db.ping()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => DependencyCheck::up(latency_ms),
        Ok(Err(e)) => {
            tracing::error!(latency_ms, error = %e, "Database health check failed");
            DependencyCheck::down(latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            DependencyCheck::down(latency_ms, "timeout")
        }
    }
}

async fn check_llm(ai_client: &Arc<dyn AiClientTrait>) -> DependencyCheck {
    tracing::debug!("Performing fresh LLM health check");
    let start = Instant::now();
    let result = timeout(HEALTH_CHECK_TIMEOUT, ai_client.health_check()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(_)) => {
            tracing::info!(latency_ms, "LLM health check passed");
            DependencyCheck::up(latency_ms)
        }
        Ok(Err(e)) => {
            tracing::warn!(latency_ms, error = %e, "LLM health check failed");
            DependencyCheck::down(latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!("LLM health check timed out");
            DependencyCheck::down(latency_ms, "timeout")
        }
    }
}
