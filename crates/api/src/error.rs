//! API errors
//!
//! Lỗi nghiệp vụ được map sang status code tương ứng. Lỗi nội bộ không lộ
//! chi tiết ra client: response 500 mang `InternalFailure`, middleware
//! `log_internal_errors` ghi vào error log rồi thay body bằng thông báo chung
//! kèm error id.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use nvcbank_business::{BusinessError, USER_FACING_MESSAGE};
use nvcbank_core::CoreError;
use nvcbank_persistence::PersistenceError;
use std::time::Duration;
use thiserror::Error;

use crate::handlers::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests")]
    TooManyRequests { retry_after: Duration },

    #[error(transparent)]
    Internal(anyhow::Error),
}

/// Chi tiết lỗi nội bộ, gắn vào response extensions cho middleware ghi log
#[derive(Debug, Clone)]
pub struct InternalFailure {
    pub error_type: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_business(err: &BusinessError) -> Option<Self> {
        let message = err.to_string();
        if err.is_forbidden() {
            Some(ApiError::Forbidden(message))
        } else if err.is_not_found() {
            Some(ApiError::NotFound(message))
        } else if err.is_invalid_input() {
            Some(ApiError::BadRequest(message))
        } else if err.is_conflict() {
            Some(ApiError::Conflict(message))
        } else {
            None
        }
    }

    fn from_persistence(err: &PersistenceError) -> Option<Self> {
        if err.is_not_found() {
            Some(ApiError::NotFound(err.to_string()))
        } else if err.is_already_exists() {
            Some(ApiError::Conflict(err.to_string()))
        } else {
            None
        }
    }

    fn from_core(err: &CoreError) -> Option<Self> {
        let message = err.to_string();
        if err.is_permission_error() {
            Some(ApiError::Forbidden(message))
        } else if err.is_validation() {
            Some(ApiError::BadRequest(message))
        } else if err.is_state_error() {
            Some(ApiError::Conflict(message))
        } else {
            None
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let classified = if let Some(e) = err.downcast_ref::<BusinessError>() {
            Self::from_business(e)
        } else if let Some(e) = err.downcast_ref::<PersistenceError>() {
            Self::from_persistence(e)
        } else if let Some(e) = err.downcast_ref::<CoreError>() {
            Self::from_core(e)
        } else {
            None
        };
        classified.unwrap_or(ApiError::Internal(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Internal(err) => {
                let failure = InternalFailure {
                    error_type: if err.downcast_ref::<PersistenceError>().is_some() {
                        "database"
                    } else {
                        "internal"
                    },
                    message: format!("{:#}", err),
                };
                let mut response =
                    (status, ApiResponse::<()>::error(USER_FACING_MESSAGE)).into_response();
                response.extensions_mut().insert(failure);
                response
            }
            ApiError::TooManyRequests { retry_after } => {
                let mut response =
                    (status, ApiResponse::<()>::error("Rate limit exceeded")).into_response();
                // Làm tròn lên, tối thiểu 1 giây
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            other => (status, ApiResponse::<()>::error(other.to_string())).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvcbank_core::{Permission, UserRole};

    #[test]
    fn test_classification() {
        let err: anyhow::Error =
            BusinessError::permission_denied(UserRole::Customer, Permission::ManageUsers).into();
        assert_eq!(ApiError::from(err).status(), StatusCode::FORBIDDEN);

        let err: anyhow::Error = PersistenceError::not_found("User", "x").into();
        assert_eq!(ApiError::from(err).status(), StatusCode::NOT_FOUND);

        let err: anyhow::Error = CoreError::validation("amount", "must be positive").into();
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);

        let err: anyhow::Error = BusinessError::rule("last super admin").into();
        assert_eq!(ApiError::from(err).status(), StatusCode::CONFLICT);

        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(ApiError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_context_does_not_hide_classification() {
        let err = anyhow::Error::from(PersistenceError::already_exists("BankAccount", "1"))
            .context("Failed to insert bank account");
        assert_eq!(ApiError::from(err).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_response_hides_details() {
        let response = ApiError::Internal(anyhow::anyhow!("secret path /etc/x")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let failure = response.extensions().get::<InternalFailure>().unwrap();
        assert!(failure.message.contains("secret path"));
    }

    #[test]
    fn test_retry_after_header() {
        let response = ApiError::TooManyRequests {
            retry_after: Duration::from_millis(2500),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "3");
    }
}
