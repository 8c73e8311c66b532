//! # Error Module
//!
//! Định nghĩa các domain errors cho NVC Bank sử dụng thiserror.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi nghiệp vụ cốt lõi, không liên quan đến infrastructure.
#[derive(Debug, Error)]
pub enum CoreError {
    // === Validation errors ===
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    // === State errors ===
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Account is not active: {0}")]
    AccountNotActive(String),

    // === NVCT supply errors ===
    #[error("Supply cap exceeded: requested {requested}, remaining {remaining}")]
    SupplyCapExceeded { requested: Decimal, remaining: Decimal },

    #[error("Insufficient circulating supply: need {needed}, circulating {circulating}")]
    InsufficientCirculating { needed: Decimal, circulating: Decimal },

    #[error("Insufficient reserves: required {required}, available {available}")]
    InsufficientReserves { required: Decimal, available: Decimal },

    // === Permission errors ===
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Tạo validation error cho một field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Tạo invalid transition error
    pub fn transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Kiểm tra có phải lỗi validation không
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation { .. }
                | CoreError::InvalidAmount(_)
                | CoreError::UnknownRole(_)
                | CoreError::UnknownPermission(_)
        )
    }

    /// Kiểm tra có phải lỗi permission không
    pub fn is_permission_error(&self) -> bool {
        matches!(self, CoreError::PermissionDenied(_))
    }

    /// Lỗi do trạng thái hiện tại không cho phép thao tác
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTransition { .. }
                | CoreError::AccountNotActive(_)
                | CoreError::SupplyCapExceeded { .. }
                | CoreError::InsufficientCirculating { .. }
                | CoreError::InsufficientReserves { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "Validation error: name: must not be empty");

        let err = CoreError::InsufficientReserves {
            required: dec!(1000),
            available: dec!(500),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient reserves: required 1000, available 500"
        );
    }

    #[test]
    fn test_error_checks() {
        assert!(CoreError::validation("x", "y").is_validation());
        assert!(CoreError::PermissionDenied("manage_users".into()).is_permission_error());
        assert!(CoreError::transition("cleared", "pending").is_state_error());
        assert!(!CoreError::UnknownRole("ghost".into()).is_state_error());
    }
}
