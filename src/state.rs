use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::domain::ai::client::AiClientTrait;
use crate::domain::health::service::HealthMonitor;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub ai_client: Arc<dyn AiClientTrait>,
    pub health: Arc<HealthMonitor>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, ai_client: Arc<dyn AiClientTrait>) -> Self {
        Self {
            db,
            config,
            ai_client,
            health: Arc::new(HealthMonitor::new()),
        }
    }
}
