//! /nvct-stablecoin

use axum::extract::State;
use axum::Json;
use nvcbank_business::NvctService;
use nvcbank_core::{NvctSupply, SupplyChange};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub amount: Decimal,
    pub reserve_deposit: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BurnRequest {
    pub amount: Decimal,
}

pub async fn supply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<NvctSupply> {
    Ok(ApiResponse::success(
        NvctService::new(&state.ctx).supply(&user).await?,
    ))
}

pub async fn mint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<MintRequest>,
) -> ApiResult<SupplyChange> {
    Ok(ApiResponse::success(
        NvctService::new(&state.ctx)
            .mint(&user, req.amount, req.reserve_deposit)
            .await?,
    ))
}

pub async fn burn(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<BurnRequest>,
) -> ApiResult<SupplyChange> {
    Ok(ApiResponse::success(
        NvctService::new(&state.ctx).burn(&user, req.amount).await?,
    ))
}

pub async fn audit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<NvctSupply> {
    Ok(ApiResponse::success(
        NvctService::new(&state.ctx).record_audit(&user).await?,
    ))
}
