//! API Handlers

pub mod accounts;
pub mod compliance;
pub mod islamic;
pub mod nvct;
pub mod security;
pub mod sovereign;
pub mod system;
pub mod users;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nvcbank_reports::{ExportFormat, ReportData};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ============ Response Types ============

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

impl ExportQuery {
    pub fn format(&self) -> Result<ExportFormat, ApiError> {
        match self.format.as_deref() {
            None => Ok(ExportFormat::default()),
            Some(f) => ExportFormat::from_str(f)
                .ok_or_else(|| ApiError::BadRequest(format!("Unsupported export format: {}", f))),
        }
    }
}

/// Report xuất ra dạng text với content-type của exporter
pub fn export_response(format: ExportFormat, report: &dyn ReportData) -> Response {
    let exporter = format.exporter();
    (
        [(header::CONTENT_TYPE, exporter.mime_type())],
        exporter.export(report),
    )
        .into_response()
}
