//! # Persistence Errors
//!
//! Error types cho persistence layer, wrapping sqlx và IO errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    // === Migration errors ===
    #[error("Invalid identifier in migration: {0}")]
    InvalidIdentifier(String),

    #[error("Table does not exist: {0}")]
    MissingTable(String),

    // === Error log store errors ===
    #[error("Error log IO error: {0}")]
    LogIo(#[from] std::io::Error),

    #[error("Error log serialization error: {0}")]
    LogSerialization(#[from] serde_json::Error),

    // === Conversion errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias cho PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    /// Tạo NotFound error
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Tạo AlreadyExists error
    pub fn already_exists(entity: &str, id: &str) -> Self {
        Self::AlreadyExists {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_enum(field: &str, value: &str) -> Self {
        Self::InvalidEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi not found không
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Kiểm tra có phải lỗi database không
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Lỗi UNIQUE constraint của SQLite -> AlreadyExists
    pub(crate) fn from_insert(err: sqlx::Error, entity: &str, id: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::already_exists(entity, id)
            }
            _ => Self::Database(err),
        }
    }
}
