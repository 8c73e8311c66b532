//! # NVC Bank Persistence
//!
//! Persistence layer cho NVC Bank - SQLite + JSONL error log.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Database                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   SQLite    │    │    JSONL    │    │     Repos       │ │
//! │  │  (state)    │    │  (errors)   │    │   (queries)     │ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nvcbank_persistence::{Database, UserRepo};
//!
//! let db = Database::new("sqlite:nvcbank.db", "logs/errors").await?;
//! let users = UserRepo::get_all(db.pool()).await?;
//! ```

pub mod error;
pub mod logs;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use logs::{ErrorLogReader, ErrorLogStore, ErrorRecord};
pub use sqlite::{
    create_memory_pool, create_pool, create_schema, default_columns, init_database,
    AmlTransactionRepo, BankAccountRepo, ColumnSpec, ComplianceFrameworkRepo,
    IslamicProductRepo, MigrationReport, Migrator, NvctSupplyRepo, SovereignDebtRepo, UserRepo,
};

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

/// Database facade - SQLite pool + error log store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    error_log: Arc<ErrorLogStore>,
}

impl Database {
    /// Mở database, tạo schema nếu chưa có
    ///
    /// # Arguments
    /// * `db_url` - SQLite URL (e.g., "sqlite:nvcbank.db")
    /// * `error_log_path` - thư mục JSONL error log
    pub async fn new<P: AsRef<Path>>(db_url: &str, error_log_path: P) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Self::from_pool(pool, error_log_path)
    }

    /// Database in-memory cho tests
    pub async fn in_memory<P: AsRef<Path>>(error_log_path: P) -> PersistenceResult<Self> {
        let pool = create_memory_pool().await?;
        create_schema(&pool).await?;
        Self::from_pool(pool, error_log_path)
    }

    pub fn from_pool<P: AsRef<Path>>(pool: SqlitePool, error_log_path: P) -> PersistenceResult<Self> {
        let error_log = Arc::new(ErrorLogStore::new(error_log_path)?);
        Ok(Self { pool, error_log })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn error_log(&self) -> Arc<ErrorLogStore> {
        Arc::clone(&self.error_log)
    }

    pub fn error_reader(&self) -> ErrorLogReader {
        ErrorLogReader::new(self.error_log.base_path())
    }

    /// Chạy column migrations mặc định
    pub async fn migrate(&self) -> PersistenceResult<MigrationReport> {
        Migrator::new(&self.pool).apply_defaults().await
    }
}
