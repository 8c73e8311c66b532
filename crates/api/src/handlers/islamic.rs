//! /islamic-banking

use axum::extract::{Path, Query, State};
use axum::Json;
use nvcbank_business::IslamicBankingService;
use nvcbank_core::{IslamicBankingProduct, IslamicProductType};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub product_type: IslamicProductType,
    #[serde(default)]
    pub profit_rate: Decimal,
    #[serde(default)]
    pub min_investment: Decimal,
}

pub async fn list_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<IslamicBankingProduct>> {
    Ok(ApiResponse::success(
        IslamicBankingService::new(&state.ctx)
            .list(&user, query.active_only)
            .await?,
    ))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<IslamicBankingProduct> {
    let product = IslamicBankingService::new(&state.ctx)
        .create(&user, &req.name, req.product_type, req.profit_rate, req.min_investment)
        .await?;
    Ok(ApiResponse::success(product))
}

pub async fn approve_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<IslamicBankingProduct> {
    Ok(ApiResponse::success(
        IslamicBankingService::new(&state.ctx).approve(&user, &id).await?,
    ))
}

pub async fn activate_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<IslamicBankingProduct> {
    Ok(ApiResponse::success(
        IslamicBankingService::new(&state.ctx).activate(&user, &id).await?,
    ))
}

pub async fn deactivate_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<IslamicBankingProduct> {
    Ok(ApiResponse::success(
        IslamicBankingService::new(&state.ctx).deactivate(&user, &id).await?,
    ))
}
