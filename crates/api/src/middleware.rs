//! HTTP middleware: security guard, security headers, internal error logging

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use nvcbank_business::{ErrorContext, ErrorLoggerService, SecurityDecision, USER_FACING_MESSAGE};
use std::net::SocketAddr;
use tracing::warn;

use crate::error::{ApiError, InternalFailure};
use crate::extract::{ClientKey, USER_ID_HEADER};
use crate::state::AppState;

/// Client key: hop đầu của `X-Forwarded-For`, sau đó tới peer address
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limit, blocked clients, threat scan trên query string
pub async fn security_guard(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_key(req.headers(), peer);

    match state.security.check_request(&client) {
        SecurityDecision::Allowed { .. } => {}
        SecurityDecision::RateLimited { retry_after } => {
            return ApiError::TooManyRequests { retry_after }.into_response();
        }
        SecurityDecision::Blocked { reason, .. } => {
            warn!(%client, %reason, path = %req.uri().path(), "blocked client rejected");
            return ApiError::Forbidden("Access denied".to_string()).into_response();
        }
    }

    if let Some(query) = req.uri().query() {
        let threats = state.security.inspect_input(&client, query);
        if let Some(threat) = threats.first() {
            warn!(%client, threat = threat.as_str(), "suspicious query rejected");
            return ApiError::BadRequest("Request rejected".to_string()).into_response();
        }
    }

    req.extensions_mut().insert(ClientKey(client));
    next.run(req).await
}

pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    response
}

/// Response 500 từ handler: ghi error log, trả thông báo chung kèm error id
pub async fn log_internal_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let client = req.extensions().get::<ClientKey>().cloned();

    let response = next.run(req).await;
    let Some(failure) = response.extensions().get::<InternalFailure>().cloned() else {
        return response;
    };

    let mut context = ErrorContext::new(failure.error_type).request(&method, &path);
    if let Some(user_id) = &user_id {
        context = context.user(user_id);
    }
    if let Some(ClientKey(client)) = &client {
        context = context.client(client);
    }
    let error_id = ErrorLoggerService::new(&state.ctx).log_error(&failure.message, context);

    let body = serde_json::json!({
        "success": false,
        "data": null,
        "error": USER_FACING_MESSAGE,
        "error_id": error_id,
    });
    let (mut parts, _) = response.into_parts();
    parts.extensions.remove::<InternalFailure>();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Response::from_parts(parts, Body::from(body.to_string()))
}
