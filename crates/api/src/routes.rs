//! API Routes

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, compliance, islamic, nvct, security, sovereign, system, users};
use crate::middleware::{log_internal_errors, security_guard, security_headers};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // System
        .route("/health", get(system::health_check))
        .route("/api/me", get(system::me))
        .route("/api/navbar", get(system::navbar))
        .route("/api/dashboard", get(system::dashboard))
        // Accounts
        .route("/accounts", get(accounts::list_accounts).post(accounts::open_account))
        .route("/accounts/export", get(accounts::export_accounts))
        .route("/accounts/:id", get(accounts::get_account))
        .route("/accounts/:id/freeze", post(accounts::freeze_account))
        .route("/accounts/:id/unfreeze", post(accounts::unfreeze_account))
        .route("/accounts/:id/close", post(accounts::close_account))
        // Compliance
        .route(
            "/compliance/frameworks",
            get(compliance::list_frameworks).post(compliance::create_framework),
        )
        .route(
            "/compliance/frameworks/:id/assessment",
            post(compliance::record_assessment),
        )
        .route(
            "/compliance/frameworks/:id/retire",
            post(compliance::retire_framework),
        )
        .route(
            "/compliance/aml",
            get(compliance::list_aml).post(compliance::screen_transaction),
        )
        .route("/compliance/aml/report", get(compliance::aml_report))
        .route(
            "/compliance/aml/:id/transition",
            post(compliance::transition_aml),
        )
        // Sovereign
        .route(
            "/sovereign/portfolios",
            get(sovereign::list_portfolios).post(sovereign::create_portfolio),
        )
        .route(
            "/sovereign/portfolios/:id/status",
            post(sovereign::update_status),
        )
        .route("/sovereign/summary", get(sovereign::summary))
        // NVCT
        .route("/nvct-stablecoin/supply", get(nvct::supply))
        .route("/nvct-stablecoin/mint", post(nvct::mint))
        .route("/nvct-stablecoin/burn", post(nvct::burn))
        .route("/nvct-stablecoin/audit", post(nvct::audit))
        // Islamic banking
        .route(
            "/islamic-banking/products",
            get(islamic::list_products).post(islamic::create_product),
        )
        .route(
            "/islamic-banking/products/:id/approve",
            post(islamic::approve_product),
        )
        .route(
            "/islamic-banking/products/:id/activate",
            post(islamic::activate_product),
        )
        .route(
            "/islamic-banking/products/:id/deactivate",
            post(islamic::deactivate_product),
        )
        // User management
        .route(
            "/user-management/users",
            get(users::list_users).post(users::create_user),
        )
        .route("/user-management/users/:id", get(users::get_user))
        .route("/user-management/users/:id/role", post(users::change_role))
        .route(
            "/user-management/users/:id/deactivate",
            post(users::deactivate_user),
        )
        .route(
            "/user-management/users/:id/activate",
            post(users::activate_user),
        )
        // Security center
        .route("/security-center/status", get(security::status))
        .route("/security-center/block", post(security::block))
        .route("/security-center/unblock", post(security::unblock))
        .route("/security-center/error-logs", get(security::error_logs))
        .route(
            "/security-center/error-logs/:error_id",
            get(security::error_log),
        )
        .route(
            "/security-center/permission-matrix",
            get(security::permission_matrix),
        )
        // Middleware - layer sau bọc ngoài layer trước
        .layer(middleware::from_fn_with_state(state.clone(), log_internal_errors))
        .layer(middleware::from_fn_with_state(state.clone(), security_guard))
        .layer(middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
