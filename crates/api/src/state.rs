//! Application state

use crate::config::AppConfig;
use nvcbank_business::{EnterpriseSecurityManager, ServiceContext};
use nvcbank_persistence::Database;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ctx: ServiceContext,
    pub security: Arc<EnterpriseSecurityManager>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: &Database, config: AppConfig) -> anyhow::Result<Self> {
        Self::with_context(ServiceContext::new(db), config)
    }

    pub fn with_context(ctx: ServiceContext, config: AppConfig) -> anyhow::Result<Self> {
        let security = EnterpriseSecurityManager::new(config.security.clone())?;
        Ok(Self {
            ctx,
            security: Arc::new(security),
            config: Arc::new(config),
        })
    }
}
