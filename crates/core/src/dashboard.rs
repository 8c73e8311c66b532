//! # Dashboard Module
//!
//! Danh mục widgets và cấu hình dashboard theo role.

use crate::permission::Permission;
use crate::role::UserRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loại widget trên dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    AccountSummary,
    TransactionFeed,
    PendingApprovals,
    ComplianceScore,
    AmlAlerts,
    KycQueue,
    TreasuryPosition,
    LiquidityMonitor,
    NvctSupply,
    SovereignDebt,
    IslamicProducts,
    TradingOverview,
    SecurityEvents,
    UserActivity,
    SystemHealth,
    ApiUsage,
    PartnerMetrics,
    SupportTickets,
    AuditTrail,
    ReportLibrary,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::AccountSummary => "account_summary",
            WidgetKind::TransactionFeed => "transaction_feed",
            WidgetKind::PendingApprovals => "pending_approvals",
            WidgetKind::ComplianceScore => "compliance_score",
            WidgetKind::AmlAlerts => "aml_alerts",
            WidgetKind::KycQueue => "kyc_queue",
            WidgetKind::TreasuryPosition => "treasury_position",
            WidgetKind::LiquidityMonitor => "liquidity_monitor",
            WidgetKind::NvctSupply => "nvct_supply",
            WidgetKind::SovereignDebt => "sovereign_debt",
            WidgetKind::IslamicProducts => "islamic_products",
            WidgetKind::TradingOverview => "trading_overview",
            WidgetKind::SecurityEvents => "security_events",
            WidgetKind::UserActivity => "user_activity",
            WidgetKind::SystemHealth => "system_health",
            WidgetKind::ApiUsage => "api_usage",
            WidgetKind::PartnerMetrics => "partner_metrics",
            WidgetKind::SupportTickets => "support_tickets",
            WidgetKind::AuditTrail => "audit_trail",
            WidgetKind::ReportLibrary => "report_library",
        }
    }

    /// Permission tối thiểu để hiển thị widget
    pub fn required_permission(&self) -> Permission {
        match self {
            WidgetKind::AccountSummary => Permission::ViewAccounts,
            WidgetKind::TransactionFeed => Permission::ViewTransactions,
            WidgetKind::PendingApprovals => Permission::ApproveTransactions,
            WidgetKind::ComplianceScore => Permission::ViewCompliance,
            WidgetKind::AmlAlerts => Permission::ViewAml,
            WidgetKind::KycQueue => Permission::ViewKyc,
            WidgetKind::TreasuryPosition => Permission::ViewTreasury,
            WidgetKind::LiquidityMonitor => Permission::ViewTreasury,
            WidgetKind::NvctSupply => Permission::ViewNvct,
            WidgetKind::SovereignDebt => Permission::ViewSovereign,
            WidgetKind::IslamicProducts => Permission::ViewIslamicBanking,
            WidgetKind::TradingOverview => Permission::ViewTrading,
            WidgetKind::SecurityEvents => Permission::ViewSecurityCenter,
            WidgetKind::UserActivity => Permission::ViewUsers,
            WidgetKind::SystemHealth => Permission::SystemSettings,
            WidgetKind::ApiUsage => Permission::ViewApiDocs,
            WidgetKind::PartnerMetrics => Permission::ViewPartners,
            WidgetKind::SupportTickets => Permission::ViewSupport,
            WidgetKind::AuditTrail => Permission::ViewAuditLog,
            WidgetKind::ReportLibrary => Permission::ViewReports,
        }
    }

    /// Tiêu đề mặc định
    pub fn default_title(&self) -> &'static str {
        match self {
            WidgetKind::AccountSummary => "Account Summary",
            WidgetKind::TransactionFeed => "Recent Transactions",
            WidgetKind::PendingApprovals => "Pending Approvals",
            WidgetKind::ComplianceScore => "Compliance Score",
            WidgetKind::AmlAlerts => "AML Alerts",
            WidgetKind::KycQueue => "KYC Queue",
            WidgetKind::TreasuryPosition => "Treasury Position",
            WidgetKind::LiquidityMonitor => "Liquidity Monitor",
            WidgetKind::NvctSupply => "NVCT Supply",
            WidgetKind::SovereignDebt => "Sovereign Debt",
            WidgetKind::IslamicProducts => "Islamic Banking Products",
            WidgetKind::TradingOverview => "Trading Overview",
            WidgetKind::SecurityEvents => "Security Events",
            WidgetKind::UserActivity => "User Activity",
            WidgetKind::SystemHealth => "System Health",
            WidgetKind::ApiUsage => "API Usage",
            WidgetKind::PartnerMetrics => "Partner Metrics",
            WidgetKind::SupportTickets => "Support Tickets",
            WidgetKind::AuditTrail => "Audit Trail",
            WidgetKind::ReportLibrary => "Reports",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kích thước widget trên grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub kind: WidgetKind,
    pub title: String,
    pub size: WidgetSize,
    /// Vị trí trên grid, bắt đầu từ 0 và liên tục
    pub position: u8,
}

impl WidgetConfig {
    pub fn new(kind: WidgetKind, size: WidgetSize) -> Self {
        Self {
            kind,
            title: kind.default_title().to_string(),
            size,
            position: 0,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// Nút thao tác nhanh trên dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub url: String,
    pub required: Permission,
}

impl QuickAction {
    pub fn new(label: &str, url: &str, required: Permission) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            required,
        }
    }
}

/// Cấu hình dashboard cho một role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub role: UserRole,
    pub title: String,
    pub subtitle: String,
    pub widgets: Vec<WidgetConfig>,
    pub quick_actions: Vec<QuickAction>,
    pub refresh_interval_secs: u32,
}

impl DashboardConfig {
    pub fn new(role: UserRole, title: &str, subtitle: &str) -> Self {
        Self {
            role,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            widgets: Vec::new(),
            quick_actions: Vec::new(),
            refresh_interval_secs: 60,
        }
    }

    pub fn widget(mut self, kind: WidgetKind, size: WidgetSize) -> Self {
        self.widgets.push(WidgetConfig::new(kind, size));
        self
    }

    pub fn action(mut self, label: &str, url: &str, required: Permission) -> Self {
        self.quick_actions.push(QuickAction::new(label, url, required));
        self
    }

    pub fn refresh_every(mut self, secs: u32) -> Self {
        self.refresh_interval_secs = secs;
        self
    }

    pub fn has_widget(&self, kind: WidgetKind) -> bool {
        self.widgets.iter().any(|w| w.kind == kind)
    }

    /// Đánh số lại vị trí widgets 0..n theo thứ tự hiện tại
    pub fn renumber(&mut self) {
        for (idx, widget) in self.widgets.iter_mut().enumerate() {
            widget.position = idx as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_renumber() {
        let mut config = DashboardConfig::new(UserRole::Auditor, "Audit", "Read-only")
            .widget(WidgetKind::AuditTrail, WidgetSize::Large)
            .widget(WidgetKind::AmlAlerts, WidgetSize::Medium)
            .action("Export", "/reports/exports", Permission::ExportReports)
            .refresh_every(120);

        config.renumber();
        assert_eq!(config.widgets[0].position, 0);
        assert_eq!(config.widgets[1].position, 1);
        assert_eq!(config.widgets[1].title, "AML Alerts");
        assert!(config.has_widget(WidgetKind::AuditTrail));
        assert!(!config.has_widget(WidgetKind::SystemHealth));
        assert_eq!(config.refresh_interval_secs, 120);
    }

    #[test]
    fn test_widget_permissions() {
        assert_eq!(
            WidgetKind::NvctSupply.required_permission(),
            Permission::ViewNvct
        );
        assert_eq!(
            WidgetKind::SystemHealth.required_permission(),
            Permission::SystemSettings
        );
    }
}
