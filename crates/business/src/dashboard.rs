//! Dashboard manager
//!
//! Mỗi role có một layout riêng; sau khi dựng, widgets và quick actions
//! được lọc lại theo bảng phân quyền nên layout không thể lộ dữ liệu
//! vượt quyền của role.

use crate::error::BusinessResult;
use crate::services::ServiceContext;
use nvcbank_core::{
    AccountStatus, DashboardConfig, FrameworkStatus, Permission, User, UserRole, WidgetKind,
    WidgetSize,
};
use nvcbank_persistence::{
    AmlTransactionRepo, BankAccountRepo, ComplianceFrameworkRepo, IslamicProductRepo,
    NvctSupplyRepo, SovereignDebtRepo, UserRepo,
};
use nvcbank_core::validation::checked_add;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use WidgetKind::*;
use WidgetSize::*;

pub struct DashboardManager<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardManager<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Layout gốc của role, chưa lọc quyền
    pub fn layout_for(role: UserRole) -> DashboardConfig {
        match role {
            UserRole::SuperAdmin => super_admin_layout(),
            UserRole::Admin => admin_layout(),
            UserRole::TreasuryOfficer => treasury_layout(),
            UserRole::ComplianceOfficer => compliance_layout(),
            UserRole::SovereignBanker => sovereign_layout(),
            UserRole::BankOfficer => bank_officer_layout(),
            UserRole::Developer => developer_layout(),
            UserRole::Partner => partner_layout(),
            UserRole::SupportAgent => support_layout(),
            UserRole::Auditor => auditor_layout(),
            UserRole::Customer => customer_layout(),
        }
    }

    /// Dashboard của user: layout theo role, chỉ giữ phần được phép
    pub fn config_for(&self, user: &User) -> BusinessResult<DashboardConfig> {
        self.ctx.authorize(user, Permission::ViewDashboard)?;

        let mut config = Self::layout_for(user.role);
        let before = config.widgets.len();
        config
            .widgets
            .retain(|w| self.ctx.can(user, w.kind.required_permission()));
        config.quick_actions.retain(|a| self.ctx.can(user, a.required));
        config.renumber();

        debug!(
            user = %user.username,
            role = %user.role,
            widgets = config.widgets.len(),
            dropped = before - config.widgets.len(),
            "dashboard config built"
        );
        Ok(config)
    }

    /// Số liệu tổng hợp từ database cho các widgets có trong config
    pub async fn metrics_for(
        &self,
        user: &User,
        config: &DashboardConfig,
    ) -> BusinessResult<Map<String, Value>> {
        let pool = self.ctx.pool();
        let mut metrics = Map::new();

        for widget in &config.widgets {
            let value = match widget.kind {
                AccountSummary => {
                    let accounts = if user.role == UserRole::Customer {
                        BankAccountRepo::get_by_owner(pool, &user.id).await?
                    } else {
                        BankAccountRepo::get_all(pool).await?
                    };
                    let mut balances: BTreeMap<String, Decimal> = BTreeMap::new();
                    for acc in accounts.iter().filter(|a| a.status != AccountStatus::Closed) {
                        *balances.entry(acc.currency.clone()).or_default() += acc.balance;
                    }
                    let active = accounts.iter().filter(|a| a.is_active()).count();
                    json!({
                        "total_accounts": accounts.len(),
                        "active_accounts": active,
                        "balances": balances,
                    })
                }
                AmlAlerts => {
                    json!({ "open_cases": AmlTransactionRepo::count_open(pool).await? })
                }
                ComplianceScore => {
                    let frameworks = ComplianceFrameworkRepo::get_all(pool).await?;
                    let active: Vec<_> = frameworks
                        .iter()
                        .filter(|f| f.status == FrameworkStatus::Active)
                        .collect();
                    let average = if active.is_empty() {
                        None
                    } else {
                        let sum: Decimal = active.iter().map(|f| f.compliance_score).sum();
                        Some((sum / Decimal::from(active.len())).round_dp(2))
                    };
                    json!({
                        "frameworks": frameworks.len(),
                        "active_frameworks": active.len(),
                        "average_score": average,
                    })
                }
                NvctSupply => match NvctSupplyRepo::get(pool).await? {
                    Some(supply) => json!({
                        "total_supply": supply.total_supply,
                        "circulating_supply": supply.circulating_supply,
                        "reserve_balance": supply.reserve_balance,
                        "max_supply": supply.max_supply,
                        "collateral_ratio": supply.collateral_ratio().map(|r| r.round_dp(4)),
                    }),
                    None => Value::Null,
                },
                SovereignDebt => {
                    let portfolios = SovereignDebtRepo::get_all(pool).await?;
                    let mut principal: BTreeMap<String, Decimal> = BTreeMap::new();
                    for p in portfolios.iter().filter(|p| p.status.is_outstanding()) {
                        let total = principal.entry(p.currency.clone()).or_default();
                        *total = checked_add("outstanding_principal", *total, p.principal)?;
                    }
                    json!({
                        "portfolios": portfolios.len(),
                        "outstanding_principal": principal,
                    })
                }
                IslamicProducts => {
                    let all = IslamicProductRepo::get_all(pool, false).await?;
                    let active = all.iter().filter(|p| p.is_active).count();
                    json!({ "products": all.len(), "active_products": active })
                }
                UserActivity => json!({ "total_users": UserRepo::count(pool).await? }),
                _ => continue,
            };
            metrics.insert(widget.kind.as_str().to_string(), value);
        }

        Ok(metrics)
    }
}

// === Layout builders ===

fn super_admin_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::SuperAdmin,
        "Executive Command Center",
        "Full visibility across every banking division",
    )
    .widget(SystemHealth, Full)
    .widget(AccountSummary, Medium)
    .widget(TreasuryPosition, Medium)
    .widget(NvctSupply, Medium)
    .widget(SovereignDebt, Medium)
    .widget(ComplianceScore, Small)
    .widget(AmlAlerts, Small)
    .widget(SecurityEvents, Large)
    .widget(UserActivity, Medium)
    .widget(AuditTrail, Large)
    .action("Manage Users", "/user-management", Permission::ManageUsers)
    .action("Manage Roles", "/user-management/roles", Permission::ManageRoles)
    .action("Security Center", "/security-center", Permission::ViewSecurityCenter)
    .action("System Settings", "/settings", Permission::SystemSettings)
    .refresh_every(30)
}

fn admin_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::Admin,
        "Administration Dashboard",
        "Operations, users and security overview",
    )
    .widget(SystemHealth, Full)
    .widget(AccountSummary, Medium)
    .widget(TransactionFeed, Large)
    .widget(PendingApprovals, Medium)
    .widget(ComplianceScore, Small)
    .widget(SecurityEvents, Large)
    .widget(UserActivity, Medium)
    .action("Manage Users", "/user-management", Permission::ManageUsers)
    .action("Manage Roles", "/user-management/roles", Permission::ManageRoles)
    .action("Security Center", "/security-center", Permission::ViewSecurityCenter)
    .refresh_every(30)
}

fn treasury_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::TreasuryOfficer,
        "Treasury Dashboard",
        "Liquidity, reserves and NVCT supply",
    )
    .widget(TreasuryPosition, Large)
    .widget(LiquidityMonitor, Large)
    .widget(NvctSupply, Medium)
    .widget(PendingApprovals, Medium)
    .widget(TradingOverview, Medium)
    .widget(ReportLibrary, Small)
    .action("Mint NVCT", "/nvct-stablecoin/supply", Permission::ManageNvctSupply)
    .action("Approve Transactions", "/transactions/pending", Permission::ApproveTransactions)
    .action("Execute Trade", "/trading", Permission::ExecuteTrades)
}

fn compliance_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::ComplianceOfficer,
        "Compliance Dashboard",
        "Regulatory frameworks, AML and KYC queues",
    )
    .widget(ComplianceScore, Medium)
    .widget(AmlAlerts, Large)
    .widget(KycQueue, Medium)
    .widget(TransactionFeed, Large)
    .widget(IslamicProducts, Small)
    .widget(AuditTrail, Medium)
    .action("Review AML Cases", "/compliance/aml", Permission::ReviewAml)
    .action("KYC Queue", "/compliance/kyc", Permission::ManageKyc)
    .action("Frameworks", "/compliance", Permission::ManageCompliance)
}

fn sovereign_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::SovereignBanker,
        "Sovereign Banking Dashboard",
        "Sovereign debt portfolios and central bank relations",
    )
    .widget(SovereignDebt, Full)
    .widget(TreasuryPosition, Medium)
    .widget(NvctSupply, Medium)
    .widget(ComplianceScore, Small)
    .widget(ReportLibrary, Small)
    .action("Portfolios", "/sovereign/portfolios", Permission::ManageSovereign)
    .action("Central Bank Operations", "/sovereign/central-bank", Permission::ManageSovereign)
    .refresh_every(120)
}

fn bank_officer_layout() -> DashboardConfig {
    DashboardConfig::new(
        UserRole::BankOfficer,
        "Banking Operations",
        "Customer accounts and products",
    )
    .widget(AccountSummary, Large)
    .widget(TransactionFeed, Large)
    .widget(KycQueue, Medium)
    .widget(IslamicProducts, Medium)
    .widget(SupportTickets, Small)
    .action("Open Account", "/accounts/new", Permission::ManageAccounts)
    .action("Islamic Products", "/islamic-banking", Permission::ManageIslamicBanking)
}

fn developer_layout() -> DashboardConfig {
    DashboardConfig::new(UserRole::Developer, "Developer Console", "API usage and credentials")
        .widget(ApiUsage, Large)
        .widget(TradingOverview, Medium)
        .widget(SystemHealth, Medium)
        .action("API Keys", "/api-keys", Permission::ManageApiKeys)
        .action("API Docs", "/api-docs", Permission::ViewApiDocs)
        .refresh_every(300)
}

fn partner_layout() -> DashboardConfig {
    DashboardConfig::new(UserRole::Partner, "Partner Portal", "Integration health and volumes")
        .widget(PartnerMetrics, Large)
        .widget(ApiUsage, Medium)
        .widget(TransactionFeed, Medium)
        .widget(ReportLibrary, Small)
        .action("Partner Portal", "/partners", Permission::ViewPartners)
        .action("API Docs", "/api-docs", Permission::ViewApiDocs)
        .refresh_every(300)
}

fn support_layout() -> DashboardConfig {
    DashboardConfig::new(UserRole::SupportAgent, "Support Desk", "Open tickets and customer lookup")
        .widget(SupportTickets, Full)
        .widget(AccountSummary, Medium)
        .widget(UserActivity, Medium)
        .action("New Ticket", "/support/new", Permission::ManageSupport)
        .action("Find Customer", "/user-management", Permission::ViewUsers)
}

fn auditor_layout() -> DashboardConfig {
    DashboardConfig::new(UserRole::Auditor, "Audit Dashboard", "Read-only oversight")
        .widget(AuditTrail, Full)
        .widget(ComplianceScore, Medium)
        .widget(AmlAlerts, Medium)
        .widget(SecurityEvents, Medium)
        .widget(TransactionFeed, Large)
        .widget(ReportLibrary, Small)
        .action("Export Reports", "/reports", Permission::ExportReports)
        .action("Audit Log", "/audit-log", Permission::ViewAuditLog)
        .refresh_every(120)
}

fn customer_layout() -> DashboardConfig {
    DashboardConfig::new(UserRole::Customer, "My Banking", "Your accounts at a glance")
        .widget(AccountSummary, Full)
        .widget(TransactionFeed, Large)
        .widget(NvctSupply, Small)
        .widget(IslamicProducts, Medium)
        .widget(SupportTickets, Small)
        .action("My Accounts", "/accounts", Permission::ViewAccounts)
        .action("Get Help", "/support", Permission::ViewSupport)
        .refresh_every(120)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;
    use nvcbank_core::{AccountType, BankAccount};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_every_role_gets_permitted_widgets_only() {
        let (ctx, _dir) = test_context().await;
        let manager = DashboardManager::new(&ctx);

        for role in UserRole::ALL {
            let user = User::new("someone", "someone@nvcbank.com", role);
            let config = manager.config_for(&user).unwrap();
            assert_eq!(config.role, role);
            assert!(!config.widgets.is_empty(), "{} has no widgets", role);
            for widget in &config.widgets {
                assert!(ctx.can(&user, widget.kind.required_permission()));
            }
            for action in &config.quick_actions {
                assert!(ctx.can(&user, action.required));
            }
            let positions: Vec<u8> = config.widgets.iter().map(|w| w.position).collect();
            let expected: Vec<u8> = (0..config.widgets.len() as u8).collect();
            assert_eq!(positions, expected);
        }
    }

    #[tokio::test]
    async fn test_admin_loses_system_settings_pieces() {
        let (ctx, _dir) = test_context().await;
        let manager = DashboardManager::new(&ctx);

        assert!(DashboardManager::layout_for(UserRole::Admin).has_widget(SystemHealth));

        let admin = User::new("admin", "admin@nvcbank.com", UserRole::Admin);
        let config = manager.config_for(&admin).unwrap();
        assert!(!config.has_widget(SystemHealth));
        assert!(!config.quick_actions.iter().any(|a| a.required == Permission::ManageRoles));
        assert_eq!(config.widgets[0].kind, AccountSummary);
    }

    #[tokio::test]
    async fn test_inactive_user_is_refused() {
        let (ctx, _dir) = test_context().await;
        let mut user = User::new("gone", "gone@nvcbank.com", UserRole::SuperAdmin);
        user.is_active = false;
        assert!(DashboardManager::new(&ctx).config_for(&user).is_err());
    }

    #[tokio::test]
    async fn test_customer_metrics_only_cover_own_accounts() {
        let (ctx, _dir) = test_context().await;
        let customer = User::new("carol", "carol@nvcbank.com", UserRole::Customer);
        UserRepo::insert(ctx.pool(), &customer).await.unwrap();

        let mut mine = BankAccount::open(&customer.id, AccountType::Savings, "USD");
        mine.balance = dec!(150);
        BankAccountRepo::insert(ctx.pool(), &mine).await.unwrap();
        let mut theirs = BankAccount::open("other", AccountType::Checking, "USD");
        theirs.balance = dec!(9000);
        BankAccountRepo::insert(ctx.pool(), &theirs).await.unwrap();

        let manager = DashboardManager::new(&ctx);
        let config = manager.config_for(&customer).unwrap();
        let metrics = manager.metrics_for(&customer, &config).await.unwrap();

        let summary = &metrics["account_summary"];
        assert_eq!(summary["total_accounts"], 1);
        assert_eq!(summary["balances"]["USD"], "150");
        assert!(!metrics.contains_key("user_activity"));
        assert!(!metrics.contains_key("aml_alerts"));
    }
}
