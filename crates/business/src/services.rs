//! Service context
//!
//! Dùng chung cho mọi service: pool, bảng phân quyền, error log.

use crate::error::{BusinessError, BusinessResult};
use nvcbank_core::{Authorizer, Permission, PermissionTable, User};
use nvcbank_persistence::{Database, ErrorLogStore};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;

/// Context for business operations - database access + RBAC
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
    permissions: Arc<PermissionTable>,
    error_log: Arc<ErrorLogStore>,
}

impl ServiceContext {
    /// Context với bảng phân quyền chuẩn
    pub fn new(db: &Database) -> Self {
        Self::from_parts(db.pool().clone(), PermissionTable::standard(), db.error_log())
    }

    pub fn from_parts(
        pool: SqlitePool,
        permissions: PermissionTable,
        error_log: Arc<ErrorLogStore>,
    ) -> Self {
        Self {
            pool,
            permissions: Arc::new(permissions),
            error_log,
        }
    }

    /// Thay bảng phân quyền (dùng trong tests)
    pub fn with_permissions(mut self, permissions: PermissionTable) -> Self {
        self.permissions = Arc::new(permissions);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    pub fn error_log(&self) -> &ErrorLogStore {
        &self.error_log
    }

    /// `_has_permission`: user active và role được cấp permission
    pub fn can(&self, actor: &User, permission: Permission) -> bool {
        self.permissions.is_allowed(actor.subject(), permission)
    }

    /// Kiểm tra quyền, trả lỗi nếu không được phép
    pub fn authorize(&self, actor: &User, permission: Permission) -> BusinessResult<()> {
        if !actor.is_active {
            warn!(user = %actor.username, %permission, "inactive user denied");
            return Err(BusinessError::InactiveUser(actor.username.clone()).into());
        }
        if !self.can(actor, permission) {
            warn!(user = %actor.username, role = %actor.role, %permission, "permission denied");
            return Err(BusinessError::permission_denied(actor.role, permission).into());
        }
        Ok(())
    }
}
