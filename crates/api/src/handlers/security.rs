//! /security-center

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use nvcbank_business::security::{BlockedClient, SecurityStats};
use nvcbank_business::{ErrorLoggerService, SecurityConfig};
use nvcbank_core::Permission;
use nvcbank_persistence::ErrorRecord;
use nvcbank_reports::PermissionMatrixReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use super::{export_response, ApiResponse, ApiResult, ExportQuery};
use crate::error::ApiError;
use crate::extract::{ClientKey, CurrentUser};
use crate::state::AppState;

const DEFAULT_ERROR_LOG_LIMIT: usize = 50;
const MAX_ERROR_LOG_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
pub struct SecurityStatus {
    pub stats: SecurityStats,
    pub blocked: Vec<BlockedClient>,
    pub config: SecurityConfig,
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub client: String,
    /// None = chặn tới khi unblock
    pub duration_secs: Option<u64>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnblockRequest {
    pub client: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorLogQuery {
    pub limit: Option<usize>,
}

pub async fn status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<SecurityStatus> {
    state.ctx.authorize(&user, Permission::ViewSecurityCenter)?;
    state.security.purge_expired();
    Ok(ApiResponse::success(SecurityStatus {
        stats: state.security.stats(),
        blocked: state.security.blocked_clients(),
        config: state.security.config().clone(),
    }))
}

pub async fn block(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ClientKey(own_client): ClientKey,
    Json(req): Json<BlockRequest>,
) -> ApiResult<Vec<BlockedClient>> {
    state.ctx.authorize(&user, Permission::ManageSecurity)?;
    let client = req.client.trim();
    if client.is_empty() {
        return Err(ApiError::BadRequest("client must not be empty".to_string()));
    }
    if client == own_client {
        return Err(ApiError::BadRequest("refusing to block your own client".to_string()));
    }
    let reason = req.reason.as_deref().unwrap_or("blocked by administrator");
    state
        .security
        .block(client, req.duration_secs.map(Duration::from_secs), reason);
    info!(actor = %user.username, %client, %reason, "client blocked");
    Ok(ApiResponse::success(state.security.blocked_clients()))
}

pub async fn unblock(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UnblockRequest>,
) -> ApiResult<bool> {
    state.ctx.authorize(&user, Permission::ManageSecurity)?;
    let removed = state.security.unblock(req.client.trim());
    if !removed {
        return Err(ApiError::NotFound(format!("Client not blocked: {}", req.client)));
    }
    info!(actor = %user.username, client = %req.client, "client unblocked");
    Ok(ApiResponse::success(true))
}

pub async fn error_logs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ErrorLogQuery>,
) -> ApiResult<Vec<ErrorRecord>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ERROR_LOG_LIMIT)
        .min(MAX_ERROR_LOG_LIMIT);
    Ok(ApiResponse::success(
        ErrorLoggerService::new(&state.ctx).recent(&user, limit)?,
    ))
}

pub async fn error_log(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(error_id): Path<String>,
) -> ApiResult<ErrorRecord> {
    Ok(ApiResponse::success(
        ErrorLoggerService::new(&state.ctx).find(&user, &error_id)?,
    ))
}

pub async fn permission_matrix(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format()?;
    state.ctx.authorize(&user, Permission::ViewSecurityCenter)?;
    let report = PermissionMatrixReport::new("Permission Matrix", state.ctx.permissions());
    Ok(export_response(format, &report))
}
