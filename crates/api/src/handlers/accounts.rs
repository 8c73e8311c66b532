//! /accounts

use axum::extract::{Path, Query, State};
use axum::response::Response;
use nvcbank_business::AccountService;
use nvcbank_core::{AccountType, BankAccount, Permission};
use nvcbank_reports::AccountSummaryReport;
use serde::Deserialize;

use super::{export_response, ApiResponse, ApiResult, ExportQuery};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenAccountRequest {
    pub owner_id: String,
    pub account_type: AccountType,
    pub currency: String,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<BankAccount>> {
    let accounts = AccountService::new(&state.ctx).list(&user).await?;
    Ok(ApiResponse::success(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<BankAccount> {
    let account = AccountService::new(&state.ctx).get(&user, &id).await?;
    Ok(ApiResponse::success(account))
}

pub async fn open_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    axum::Json(req): axum::Json<OpenAccountRequest>,
) -> ApiResult<BankAccount> {
    let account = AccountService::new(&state.ctx)
        .open(&user, &req.owner_id, req.account_type, &req.currency)
        .await?;
    Ok(ApiResponse::success(account))
}

pub async fn freeze_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<BankAccount> {
    Ok(ApiResponse::success(
        AccountService::new(&state.ctx).freeze(&user, &id).await?,
    ))
}

pub async fn unfreeze_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<BankAccount> {
    Ok(ApiResponse::success(
        AccountService::new(&state.ctx).unfreeze(&user, &id).await?,
    ))
}

pub async fn close_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<BankAccount> {
    Ok(ApiResponse::success(
        AccountService::new(&state.ctx).close(&user, &id).await?,
    ))
}

pub async fn export_accounts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format()?;
    state.ctx.authorize(&user, Permission::ExportReports)?;
    let accounts = AccountService::new(&state.ctx).list(&user).await?;
    let report = AccountSummaryReport::new("Account Summary", accounts);
    Ok(export_response(format, &report))
}
