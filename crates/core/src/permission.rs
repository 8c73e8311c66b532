//! # Permission Module
//!
//! Danh sách permissions dùng cho RBAC. Mỗi permission tương ứng với
//! một hành động (view/manage) trên một khu vực chức năng.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission trong hệ thống RBAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // === Overview ===
    ViewDashboard,

    // === Banking ===
    ViewAccounts,
    ManageAccounts,
    ViewTransactions,
    ApproveTransactions,

    // === Compliance ===
    ViewCompliance,
    ManageCompliance,
    ViewAml,
    ReviewAml,
    ViewKyc,
    ManageKyc,

    // === Treasury ===
    ViewTreasury,
    ManageTreasury,

    // === Sovereign ===
    ViewSovereign,
    ManageSovereign,

    // === Digital assets ===
    ViewNvct,
    ManageNvctSupply,
    ViewTrading,
    ExecuteTrades,

    // === Islamic banking ===
    ViewIslamicBanking,
    ManageIslamicBanking,

    // === Reporting ===
    ViewReports,
    ExportReports,

    // === Administration ===
    ViewSecurityCenter,
    ManageSecurity,
    ViewUsers,
    ManageUsers,
    ManageRoles,
    ViewAuditLog,
    SystemSettings,

    // === Partners & developers ===
    ViewApiDocs,
    ManageApiKeys,
    ViewPartners,
    ManagePartners,

    // === Support ===
    ViewSupport,
    ManageSupport,
}

impl Permission {
    pub const ALL: [Permission; 36] = [
        Permission::ViewDashboard,
        Permission::ViewAccounts,
        Permission::ManageAccounts,
        Permission::ViewTransactions,
        Permission::ApproveTransactions,
        Permission::ViewCompliance,
        Permission::ManageCompliance,
        Permission::ViewAml,
        Permission::ReviewAml,
        Permission::ViewKyc,
        Permission::ManageKyc,
        Permission::ViewTreasury,
        Permission::ManageTreasury,
        Permission::ViewSovereign,
        Permission::ManageSovereign,
        Permission::ViewNvct,
        Permission::ManageNvctSupply,
        Permission::ViewTrading,
        Permission::ExecuteTrades,
        Permission::ViewIslamicBanking,
        Permission::ManageIslamicBanking,
        Permission::ViewReports,
        Permission::ExportReports,
        Permission::ViewSecurityCenter,
        Permission::ManageSecurity,
        Permission::ViewUsers,
        Permission::ManageUsers,
        Permission::ManageRoles,
        Permission::ViewAuditLog,
        Permission::SystemSettings,
        Permission::ViewApiDocs,
        Permission::ManageApiKeys,
        Permission::ViewPartners,
        Permission::ManagePartners,
        Permission::ViewSupport,
        Permission::ManageSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewAccounts => "view_accounts",
            Permission::ManageAccounts => "manage_accounts",
            Permission::ViewTransactions => "view_transactions",
            Permission::ApproveTransactions => "approve_transactions",
            Permission::ViewCompliance => "view_compliance",
            Permission::ManageCompliance => "manage_compliance",
            Permission::ViewAml => "view_aml",
            Permission::ReviewAml => "review_aml",
            Permission::ViewKyc => "view_kyc",
            Permission::ManageKyc => "manage_kyc",
            Permission::ViewTreasury => "view_treasury",
            Permission::ManageTreasury => "manage_treasury",
            Permission::ViewSovereign => "view_sovereign",
            Permission::ManageSovereign => "manage_sovereign",
            Permission::ViewNvct => "view_nvct",
            Permission::ManageNvctSupply => "manage_nvct_supply",
            Permission::ViewTrading => "view_trading",
            Permission::ExecuteTrades => "execute_trades",
            Permission::ViewIslamicBanking => "view_islamic_banking",
            Permission::ManageIslamicBanking => "manage_islamic_banking",
            Permission::ViewReports => "view_reports",
            Permission::ExportReports => "export_reports",
            Permission::ViewSecurityCenter => "view_security_center",
            Permission::ManageSecurity => "manage_security",
            Permission::ViewUsers => "view_users",
            Permission::ManageUsers => "manage_users",
            Permission::ManageRoles => "manage_roles",
            Permission::ViewAuditLog => "view_audit_log",
            Permission::SystemSettings => "system_settings",
            Permission::ViewApiDocs => "view_api_docs",
            Permission::ManageApiKeys => "manage_api_keys",
            Permission::ViewPartners => "view_partners",
            Permission::ManagePartners => "manage_partners",
            Permission::ViewSupport => "view_support",
            Permission::ManageSupport => "manage_support",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        Permission::ALL
            .iter()
            .copied()
            .find(|perm| perm.as_str() == normalized)
    }

    /// Permission chỉ cho phép đọc
    pub fn is_read_only(&self) -> bool {
        self.as_str().starts_with("view_")
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_permission_codes_unique() {
        let codes: HashSet<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(codes.len(), Permission::ALL.len());
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(Permission::from_str("REVIEW_AML"), Some(Permission::ReviewAml));
        assert_eq!(Permission::from_str("launch_rockets"), None);
        for perm in Permission::ALL {
            assert_eq!(Permission::from_str(perm.as_str()), Some(perm));
        }
    }

    #[test]
    fn test_read_only() {
        assert!(Permission::ViewAml.is_read_only());
        assert!(!Permission::ReviewAml.is_read_only());
        assert!(!Permission::SystemSettings.is_read_only());
    }
}
