//! /sovereign

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use nvcbank_business::{NewPortfolio, SovereignService, SovereignSummary};
use nvcbank_core::{DebtInstrument, DebtStatus, SovereignDebtPortfolio};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ApiResponse, ApiResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

const DEFAULT_MATURITY_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
pub struct CreatePortfolioRequest {
    pub country: String,
    pub instrument: DebtInstrument,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub currency: String,
    pub maturity_date: NaiveDate,
    pub credit_rating: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: DebtStatus,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub within_days: Option<i64>,
}

pub async fn list_portfolios(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<SovereignDebtPortfolio>> {
    Ok(ApiResponse::success(
        SovereignService::new(&state.ctx).list(&user).await?,
    ))
}

pub async fn create_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreatePortfolioRequest>,
) -> ApiResult<SovereignDebtPortfolio> {
    let new = NewPortfolio {
        country: req.country,
        instrument: req.instrument,
        principal: req.principal,
        interest_rate: req.interest_rate,
        currency: req.currency,
        maturity_date: req.maturity_date,
        credit_rating: req.credit_rating,
    };
    Ok(ApiResponse::success(
        SovereignService::new(&state.ctx).create(&user, new).await?,
    ))
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<SovereignDebtPortfolio> {
    Ok(ApiResponse::success(
        SovereignService::new(&state.ctx)
            .update_status(&user, &id, req.status)
            .await?,
    ))
}

pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<SovereignSummary> {
    let within = query
        .within_days
        .unwrap_or(DEFAULT_MATURITY_WINDOW_DAYS)
        .max(0);
    let today = Utc::now().date_naive();
    Ok(ApiResponse::success(
        SovereignService::new(&state.ctx)
            .summary(&user, today, within)
            .await?,
    ))
}
