//! Error logger service
//!
//! Lỗi nội bộ được ghi đầy đủ vào error log; client chỉ nhận thông báo
//! chung kèm error id để đối chiếu.

use crate::error::BusinessResult;
use crate::services::ServiceContext;
use nvcbank_core::{Permission, User};
use nvcbank_persistence::{ErrorLogReader, ErrorRecord};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::error;

/// Thông báo trả về cho client khi có lỗi nội bộ
pub const USER_FACING_MESSAGE: &str = "Service temporarily unavailable";

/// Ngữ cảnh request khi lỗi xảy ra
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub error_type: String,
    pub user_id: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub client_ip: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn new(error_type: &str) -> Self {
        Self {
            error_type: error_type.to_string(),
            ..Default::default()
        }
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn request(mut self, method: &str, path: &str) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(path.to_string());
        self
    }

    pub fn client(mut self, client_ip: &str) -> Self {
        self.client_ip = Some(client_ip.to_string());
        self
    }

    pub fn meta(mut self, key: &str, value: impl Display) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

pub struct ErrorLoggerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ErrorLoggerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ghi lỗi, trả về error id. Không bao giờ thất bại: nếu không ghi được
    /// file thì lỗi vẫn có trong tracing output.
    pub fn log_error(&self, err: &dyn Display, context: ErrorContext) -> String {
        let store = self.ctx.error_log();
        let error_id = store.next_error_id();
        let message = err.to_string();

        error!(
            error_id = %error_id,
            error_type = %context.error_type,
            path = context.path.as_deref().unwrap_or("-"),
            user_id = context.user_id.as_deref().unwrap_or("-"),
            "{}",
            message
        );

        let mut record = ErrorRecord::new(&error_id, &context.error_type, &message);
        record.user_id = context.user_id;
        record.path = context.path;
        record.method = context.method;
        record.client_ip = context.client_ip;
        record.metadata = context.metadata;

        if let Err(e) = store.append(&record) {
            error!(error_id = %error_id, "failed to persist error record: {}", e);
        }
        error_id
    }

    /// Records gần nhất, cho security center
    pub fn recent(&self, actor: &User, limit: usize) -> BusinessResult<Vec<ErrorRecord>> {
        self.ctx.authorize(actor, Permission::ViewAuditLog)?;
        let reader = ErrorLogReader::new(self.ctx.error_log().base_path());
        Ok(reader.recent(limit)?)
    }

    pub fn find(&self, actor: &User, error_id: &str) -> BusinessResult<ErrorRecord> {
        self.ctx.authorize(actor, Permission::ViewAuditLog)?;
        let reader = ErrorLogReader::new(self.ctx.error_log().base_path());
        Ok(reader.find(error_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;
    use nvcbank_core::UserRole;

    #[tokio::test]
    async fn test_log_and_read_back() {
        let (ctx, _dir) = test_context().await;
        let logger = ErrorLoggerService::new(&ctx);

        let first = logger.log_error(
            &"database is locked",
            ErrorContext::new("database")
                .user("u-1")
                .request("GET", "/accounts")
                .client("10.1.1.1")
                .meta("attempt", 2),
        );
        let second = logger.log_error(&"boom", ErrorContext::new("internal"));
        assert_eq!(first, "ERR_000001");
        assert_eq!(second, "ERR_000002");

        let auditor = User::new("audrey", "audrey@nvcbank.com", UserRole::Auditor);
        let recent = logger.recent(&auditor, 10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].error_id, "ERR_000002");

        let record = logger.find(&auditor, &first).unwrap();
        assert_eq!(record.path.as_deref(), Some("/accounts"));
        assert_eq!(record.metadata.get("attempt").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_error_logs_need_audit_permission() {
        let (ctx, _dir) = test_context().await;
        let logger = ErrorLoggerService::new(&ctx);
        let customer = User::new("carl", "carl@nvcbank.com", UserRole::Customer);
        assert!(logger.recent(&customer, 10).is_err());
    }
}
