//! Business layer errors
//!
//! Uses anyhow for error aggregation with custom error types.

use nvcbank_core::{Permission, UserRole};
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Permission errors ===
    #[error("Permission denied: role {role} lacks {permission}")]
    PermissionDenied { role: UserRole, permission: Permission },

    #[error("User is inactive: {0}")]
    InactiveUser(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    // === Rule errors ===
    #[error("Operation not allowed: {0}")]
    RuleViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Not found errors ===
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // === Wrapped errors ===
    #[error("Persistence error: {0}")]
    Persistence(#[from] nvcbank_persistence::PersistenceError),

    #[error("Core error: {0}")]
    Core(#[from] nvcbank_core::CoreError),
}

/// Result type alias for business operations
pub type BusinessResult<T> = anyhow::Result<T>;

impl BusinessError {
    pub fn permission_denied(role: UserRole, permission: Permission) -> Self {
        Self::PermissionDenied { role, permission }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::RuleViolation(message.into())
    }

    /// Lỗi phân quyền (403)
    pub fn is_forbidden(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } | Self::InactiveUser(_) | Self::AccessDenied(_) => true,
            Self::Core(e) => e.is_permission_error(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Persistence(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Lỗi dữ liệu đầu vào (400)
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidInput(_) => true,
            Self::Core(e) => e.is_validation(),
            _ => false,
        }
    }

    /// Xung đột với trạng thái hiện tại (409)
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::RuleViolation(_) => true,
            Self::Core(e) => e.is_state_error(),
            Self::Persistence(e) => e.is_already_exists(),
            _ => false,
        }
    }
}
