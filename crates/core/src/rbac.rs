//! # RBAC Module
//!
//! Bảng phân quyền Role → Permissions và interface kiểm tra quyền.
//!
//! ```text
//! UserRole ──▶ PermissionTable ──▶ BTreeSet<Permission>
//!                    │
//!                    ▼
//!   Authorizer::is_allowed(subject, permission) -> bool
//! ```
//!
//! Bảng phân quyền là dữ liệu tĩnh; mọi quyết định hiển thị navbar,
//! dashboard widgets và bảo vệ route đều đi qua đây.

use crate::permission::Permission;
use crate::role::UserRole;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Chủ thể cần kiểm tra quyền.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub role: UserRole,
    pub is_active: bool,
}

impl Subject {
    pub fn new(role: UserRole, is_active: bool) -> Self {
        Self { role, is_active }
    }

    pub fn active(role: UserRole) -> Self {
        Self::new(role, true)
    }
}

/// Interface kiểm tra quyền.
pub trait Authorizer: Send + Sync {
    /// Trả về true nếu subject được phép thực hiện permission
    fn is_allowed(&self, subject: Subject, permission: Permission) -> bool;

    /// Trả về true nếu subject có ít nhất một trong các permissions
    fn is_allowed_any(&self, subject: Subject, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.is_allowed(subject, *p))
    }
}

/// Bảng phân quyền Role → tập Permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTable {
    grants: BTreeMap<UserRole, BTreeSet<Permission>>,
}

impl PermissionTable {
    /// Bảng rỗng - mọi role đều không có quyền
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bảng phân quyền chuẩn của hệ thống
    pub fn standard() -> Self {
        use Permission::*;

        let mut table = Self::empty();

        table.grant_all(UserRole::SuperAdmin, Permission::ALL);
        table.grant_all(
            UserRole::Admin,
            Permission::ALL
                .into_iter()
                .filter(|p| !matches!(p, ManageRoles | SystemSettings)),
        );
        table.grant_all(
            UserRole::TreasuryOfficer,
            [
                ViewDashboard,
                ViewAccounts,
                ViewTransactions,
                ApproveTransactions,
                ViewTreasury,
                ManageTreasury,
                ViewNvct,
                ManageNvctSupply,
                ViewSovereign,
                ViewTrading,
                ExecuteTrades,
                ViewReports,
                ExportReports,
            ],
        );
        table.grant_all(
            UserRole::ComplianceOfficer,
            [
                ViewDashboard,
                ViewAccounts,
                ViewTransactions,
                ViewCompliance,
                ManageCompliance,
                ViewAml,
                ReviewAml,
                ViewKyc,
                ManageKyc,
                ViewIslamicBanking,
                ViewReports,
                ExportReports,
                ViewAuditLog,
            ],
        );
        table.grant_all(
            UserRole::SovereignBanker,
            [
                ViewDashboard,
                ViewSovereign,
                ManageSovereign,
                ViewTreasury,
                ViewNvct,
                ViewCompliance,
                ViewReports,
                ExportReports,
            ],
        );
        table.grant_all(
            UserRole::BankOfficer,
            [
                ViewDashboard,
                ViewAccounts,
                ManageAccounts,
                ViewTransactions,
                ViewKyc,
                ViewIslamicBanking,
                ManageIslamicBanking,
                ViewReports,
                ViewSupport,
            ],
        );
        table.grant_all(
            UserRole::Developer,
            [ViewDashboard, ViewApiDocs, ManageApiKeys, ViewTrading],
        );
        table.grant_all(
            UserRole::Partner,
            [
                ViewDashboard,
                ViewApiDocs,
                ViewPartners,
                ViewTransactions,
                ViewReports,
            ],
        );
        table.grant_all(
            UserRole::SupportAgent,
            [
                ViewDashboard,
                ViewAccounts,
                ViewUsers,
                ViewSupport,
                ManageSupport,
            ],
        );
        table.grant_all(
            UserRole::Auditor,
            [
                ViewDashboard,
                ViewAccounts,
                ViewTransactions,
                ViewCompliance,
                ViewAml,
                ViewKyc,
                ViewReports,
                ExportReports,
                ViewAuditLog,
                ViewSecurityCenter,
            ],
        );
        table.grant_all(
            UserRole::Customer,
            [
                ViewDashboard,
                ViewAccounts,
                ViewTransactions,
                ViewNvct,
                ViewIslamicBanking,
                ViewSupport,
            ],
        );

        table
    }

    /// Cấp một permission cho role
    pub fn grant(&mut self, role: UserRole, permission: Permission) {
        self.grants.entry(role).or_default().insert(permission);
    }

    /// Cấp nhiều permissions cho role
    pub fn grant_all<I>(&mut self, role: UserRole, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.grants.entry(role).or_default().extend(permissions);
    }

    /// Thu hồi permission. Trả về true nếu role đã có permission đó.
    pub fn revoke(&mut self, role: UserRole, permission: Permission) -> bool {
        self.grants
            .get_mut(&role)
            .map_or(false, |set| set.remove(&permission))
    }

    pub fn has_permission(&self, role: UserRole, permission: Permission) -> bool {
        self.grants
            .get(&role)
            .map_or(false, |set| set.contains(&permission))
    }

    /// Tất cả permissions của role (rỗng nếu role không có trong bảng)
    pub fn permissions_for(&self, role: UserRole) -> BTreeSet<Permission> {
        self.grants.get(&role).cloned().unwrap_or_default()
    }

    /// Các roles có permission cho trước
    pub fn roles_with(&self, permission: Permission) -> Vec<UserRole> {
        self.grants
            .iter()
            .filter(|(_, perms)| perms.contains(&permission))
            .map(|(role, _)| *role)
            .collect()
    }

    pub fn roles(&self) -> impl Iterator<Item = UserRole> + '_ {
        self.grants.keys().copied()
    }
}

impl Authorizer for PermissionTable {
    fn is_allowed(&self, subject: Subject, permission: Permission) -> bool {
        subject.is_active && self.has_permission(subject.role, permission)
    }
}
