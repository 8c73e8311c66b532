//! Health, identity, navbar, dashboard

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use nvcbank_business::{DashboardManager, NavbarContext, NavbarContextService, UserManagementService};
use nvcbank_core::{DashboardConfig, Permission, User};
use nvcbank_persistence::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiResponse, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match UserRepo::count(state.ctx.pool()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            "unavailable"
        }
    };
    Json(serde_json::json!({
        "status": "ok",
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub display_name: String,
    pub initials: String,
    pub permissions: Vec<Permission>,
}

/// Thông tin user hiện tại; client shell gọi một lần khi mở phiên nên
/// đây cũng là nơi ghi nhận last_login
pub async fn me(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> ApiResult<MeResponse> {
    UserManagementService::new(&state.ctx)
        .record_login(&user.id)
        .await?;
    let permissions = state
        .ctx
        .permissions()
        .permissions_for(user.role)
        .into_iter()
        .collect();
    Ok(ApiResponse::success(MeResponse {
        display_name: user.display_name().to_string(),
        initials: user.initials(),
        user,
        permissions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NavbarQuery {
    pub path: Option<String>,
}

pub async fn navbar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<NavbarQuery>,
) -> ApiResult<NavbarContext> {
    let path = query.path.as_deref().unwrap_or("/");
    let nav = NavbarContextService::new(&state.ctx).build(Some(&user), path);
    Ok(ApiResponse::success(nav))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub config: DashboardConfig,
    pub metrics: Map<String, Value>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<DashboardResponse> {
    let manager = DashboardManager::new(&state.ctx);
    let config = manager.config_for(&user)?;
    let metrics = manager.metrics_for(&user, &config).await?;
    Ok(ApiResponse::success(DashboardResponse { config, metrics }))
}
