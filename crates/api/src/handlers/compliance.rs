//! /compliance - frameworks and AML queue

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use nvcbank_business::{AmlService, ComplianceService, ScreeningRequest};
use nvcbank_core::{AmlStatus, AmlTransaction, ComplianceFramework, Permission};
use nvcbank_reports::AmlCaseReport;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{export_response, ApiResponse, ApiResult, ExportQuery};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

// ============ Frameworks ============

#[derive(Debug, Deserialize)]
pub struct CreateFrameworkRequest {
    pub name: String,
    pub code: String,
    pub jurisdiction: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub score: Decimal,
}

pub async fn list_frameworks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<ComplianceFramework>> {
    Ok(ApiResponse::success(
        ComplianceService::new(&state.ctx).list(&user).await?,
    ))
}

pub async fn create_framework(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateFrameworkRequest>,
) -> ApiResult<ComplianceFramework> {
    let framework = ComplianceService::new(&state.ctx)
        .create(
            &user,
            &req.name,
            &req.code,
            &req.jurisdiction,
            req.description.as_deref(),
        )
        .await?;
    Ok(ApiResponse::success(framework))
}

pub async fn record_assessment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AssessmentRequest>,
) -> ApiResult<ComplianceFramework> {
    let framework = ComplianceService::new(&state.ctx)
        .record_assessment(&user, &id, req.score)
        .await?;
    Ok(ApiResponse::success(framework))
}

pub async fn retire_framework(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<ComplianceFramework> {
    Ok(ApiResponse::success(
        ComplianceService::new(&state.ctx).retire(&user, &id).await?,
    ))
}

// ============ AML ============

#[derive(Debug, Deserialize)]
pub struct AmlListQuery {
    pub status: Option<AmlStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ScreenRequest {
    pub transaction_ref: String,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub counterparty: String,
    pub country: String,
    pub home_country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: AmlStatus,
    pub notes: Option<String>,
}

/// Quốc gia của ngân hàng khi request không ghi rõ
const DEFAULT_HOME_COUNTRY: &str = "US";

pub async fn list_aml(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AmlListQuery>,
) -> ApiResult<Vec<AmlTransaction>> {
    Ok(ApiResponse::success(
        AmlService::new(&state.ctx).list(&user, query.status).await?,
    ))
}

pub async fn screen_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ScreenRequest>,
) -> ApiResult<AmlTransaction> {
    let request = ScreeningRequest {
        transaction_ref: req.transaction_ref,
        account_id: req.account_id,
        amount: req.amount,
        currency: req.currency,
        counterparty: req.counterparty,
        country: req.country,
        home_country: req
            .home_country
            .unwrap_or_else(|| DEFAULT_HOME_COUNTRY.to_string()),
    };
    let tx = AmlService::new(&state.ctx).screen(&user, request).await?;
    Ok(ApiResponse::success(tx))
}

pub async fn transition_aml(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> ApiResult<AmlTransaction> {
    let tx = AmlService::new(&state.ctx)
        .transition(&user, &id, req.status, req.notes.as_deref())
        .await?;
    Ok(ApiResponse::success(tx))
}

pub async fn aml_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format()?;
    state.ctx.authorize(&user, Permission::ExportReports)?;
    let cases = AmlService::new(&state.ctx).list(&user, None).await?;
    Ok(export_response(format, &AmlCaseReport::generate("AML Cases", cases)))
}
