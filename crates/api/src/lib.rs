//! # NVC Bank API
//!
//! axum HTTP server cho các module nghiệp vụ. Mỗi request đi qua:
//!
//! ```text
//! cors → trace → security headers → security guard → error logging → handler
//! ```
//!
//! Identity lấy từ header `X-User-Id` (gateway đã xác thực); quyền được
//! kiểm tra trong business services.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use handlers::ApiResponse;
pub use routes::create_router;
pub use state::AppState;
