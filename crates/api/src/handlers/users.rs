//! /user-management

use axum::extract::{Path, State};
use axum::Json;
use nvcbank_business::UserManagementService;
use nvcbank_core::{User, UserRole};
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(
        UserManagementService::new(&state.ctx).list(&actor).await?,
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(
        UserManagementService::new(&state.ctx).get(&actor, &id).await?,
    ))
}

pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<User> {
    let user = UserManagementService::new(&state.ctx)
        .create(&actor, &req.username, &req.email, req.role)
        .await?;
    Ok(ApiResponse::success(user))
}

pub async fn change_role(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(
        UserManagementService::new(&state.ctx)
            .change_role(&actor, &id, req.role)
            .await?,
    ))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(
        UserManagementService::new(&state.ctx)
            .deactivate(&actor, &id)
            .await?,
    ))
}

pub async fn activate_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(
        UserManagementService::new(&state.ctx)
            .activate(&actor, &id)
            .await?,
    ))
}
