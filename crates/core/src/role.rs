//! # Role Module
//!
//! Định nghĩa UserRole - vai trò của người dùng trong hệ thống quản trị.
//! Mỗi role được ánh xạ tới một tập permissions trong [`crate::rbac::PermissionTable`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vai trò người dùng.
///
/// Thứ tự khai báo là thứ tự hiển thị (quyền cao nhất trước).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Toàn quyền, kể cả quản lý role và cấu hình hệ thống
    SuperAdmin,
    /// Quản trị viên vận hành
    Admin,
    /// Cán bộ ngân quỹ (treasury, NVCT supply)
    TreasuryOfficer,
    /// Cán bộ tuân thủ (AML, KYC, frameworks)
    ComplianceOfficer,
    /// Chuyên viên sovereign banking
    SovereignBanker,
    /// Giao dịch viên / cán bộ ngân hàng
    BankOfficer,
    Developer,
    /// Đối tác tích hợp
    Partner,
    SupportAgent,
    /// Kiểm toán viên (read-only)
    Auditor,
    /// Khách hàng
    Customer,
}

impl UserRole {
    pub const ALL: [UserRole; 11] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::TreasuryOfficer,
        UserRole::ComplianceOfficer,
        UserRole::SovereignBanker,
        UserRole::BankOfficer,
        UserRole::Developer,
        UserRole::Partner,
        UserRole::SupportAgent,
        UserRole::Auditor,
        UserRole::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::TreasuryOfficer => "treasury_officer",
            UserRole::ComplianceOfficer => "compliance_officer",
            UserRole::SovereignBanker => "sovereign_banker",
            UserRole::BankOfficer => "bank_officer",
            UserRole::Developer => "developer",
            UserRole::Partner => "partner",
            UserRole::SupportAgent => "support_agent",
            UserRole::Auditor => "auditor",
            UserRole::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        UserRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
    }

    /// Tên hiển thị trên navbar
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "Super Administrator",
            UserRole::Admin => "Administrator",
            UserRole::TreasuryOfficer => "Treasury Officer",
            UserRole::ComplianceOfficer => "Compliance Officer",
            UserRole::SovereignBanker => "Sovereign Banker",
            UserRole::BankOfficer => "Bank Officer",
            UserRole::Developer => "Developer",
            UserRole::Partner => "Partner",
            UserRole::SupportAgent => "Support Agent",
            UserRole::Auditor => "Auditor",
            UserRole::Customer => "Customer",
        }
    }

    /// Role đặc quyền - chỉ người có `manage_roles` mới được gán
    pub fn is_privileged(&self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::Admin)
    }

    /// Role thuộc về nhân sự nội bộ ngân hàng
    pub fn is_staff(&self) -> bool {
        !matches!(self, UserRole::Customer | UserRole::Partner)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_str() {
        assert_eq!(UserRole::SuperAdmin.as_str(), "super_admin");
        assert_eq!(UserRole::from_str("COMPLIANCE_OFFICER"), Some(UserRole::ComplianceOfficer));
        assert_eq!(UserRole::from_str("treasury-officer"), Some(UserRole::TreasuryOfficer));
        assert_eq!(UserRole::from_str("wizard"), None);
    }

    #[test]
    fn test_role_round_trip_all() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_flags() {
        assert!(UserRole::Admin.is_privileged());
        assert!(!UserRole::Auditor.is_privileged());
        assert!(UserRole::Auditor.is_staff());
        assert!(!UserRole::Customer.is_staff());
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&UserRole::SovereignBanker).unwrap();
        assert_eq!(json, "\"sovereign_banker\"");
    }
}
