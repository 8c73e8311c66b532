//! Server configuration

use nvcbank_business::SecurityConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "nvcbank=info,tower_http=info";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub error_log_dir: PathBuf,
    pub log_filter: String,
    pub security: SecurityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite:nvcbank.db".to_string(),
            error_log_dir: PathBuf::from("logs/errors"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            security: SecurityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config từ environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("NVCBANK_HOST").unwrap_or(defaults.host),
            port: env::var("NVCBANK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            error_log_dir: env::var("NVCBANK_ERROR_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.error_log_dir),
            log_filter: env::var("RUST_LOG").unwrap_or(defaults.log_filter),
            security: SecurityConfig::from_env(),
        }
    }

    /// Lấy địa chỉ bind đầy đủ
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
