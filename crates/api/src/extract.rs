//! Request extractors

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nvcbank_business::UserManagementService;
use nvcbank_core::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Header mang id của user đã xác thực ở tầng trước (gateway/SSO)
pub const USER_ID_HEADER: &str = "x-user-id";

/// User đang active của request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let user = UserManagementService::new(&state.ctx)
            .resolve_active(user_id)
            .await?;
        Ok(CurrentUser(user))
    }
}

/// Client key do `security_guard` gắn vào request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ClientKey>()
            .cloned()
            .unwrap_or_else(|| ClientKey("unknown".to_string())))
    }
}
