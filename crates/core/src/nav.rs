//! # Navigation Module
//!
//! Danh mục các section trên navbar. Mỗi section yêu cầu một permission;
//! navbar của người dùng chỉ hiển thị các section mà role của họ được phép.

use crate::permission::Permission;
use serde::Serialize;
use std::fmt;

/// Nhóm hiển thị trên navbar, theo thứ tự khai báo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavGroup {
    Overview,
    Banking,
    Treasury,
    DigitalAssets,
    Sovereign,
    Compliance,
    RiskReporting,
    Administration,
    PartnersDevelopers,
    Support,
}

impl NavGroup {
    pub const ALL: [NavGroup; 10] = [
        NavGroup::Overview,
        NavGroup::Banking,
        NavGroup::Treasury,
        NavGroup::DigitalAssets,
        NavGroup::Sovereign,
        NavGroup::Compliance,
        NavGroup::RiskReporting,
        NavGroup::Administration,
        NavGroup::PartnersDevelopers,
        NavGroup::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NavGroup::Overview => "overview",
            NavGroup::Banking => "banking",
            NavGroup::Treasury => "treasury",
            NavGroup::DigitalAssets => "digital_assets",
            NavGroup::Sovereign => "sovereign",
            NavGroup::Compliance => "compliance",
            NavGroup::RiskReporting => "risk_reporting",
            NavGroup::Administration => "administration",
            NavGroup::PartnersDevelopers => "partners_developers",
            NavGroup::Support => "support",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavGroup::Overview => "Overview",
            NavGroup::Banking => "Banking",
            NavGroup::Treasury => "Treasury",
            NavGroup::DigitalAssets => "Digital Assets",
            NavGroup::Sovereign => "Sovereign Banking",
            NavGroup::Compliance => "Compliance",
            NavGroup::RiskReporting => "Risk & Reporting",
            NavGroup::Administration => "Administration",
            NavGroup::PartnersDevelopers => "Partners & Developers",
            NavGroup::Support => "Support",
        }
    }
}

impl fmt::Display for NavGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mục con trong một section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub url: &'static str,
    /// Permission riêng của item (chặt hơn permission của section)
    pub required: Option<Permission>,
}

/// Một section trên navbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavSection {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
    pub group: NavGroup,
    pub required: Permission,
    pub items: &'static [NavItem],
}

impl NavSection {
    /// Tìm section theo key
    pub fn find(key: &str) -> Option<&'static NavSection> {
        SECTIONS.iter().find(|s| s.key == key)
    }

    /// Section thuộc nhóm cho trước
    pub fn in_group(group: NavGroup) -> impl Iterator<Item = &'static NavSection> {
        SECTIONS.iter().filter(move |s| s.group == group)
    }

    /// `path` nằm dưới URL của section (so khớp theo segment)
    pub fn matches_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.url) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.url.ends_with('/'),
            None => false,
        }
    }
}

const fn item(label: &'static str, url: &'static str) -> NavItem {
    NavItem {
        label,
        url,
        required: None,
    }
}

const fn guarded(label: &'static str, url: &'static str, required: Permission) -> NavItem {
    NavItem {
        label,
        url,
        required: Some(required),
    }
}

/// Danh mục sections của navbar.
pub const SECTIONS: &[NavSection] = &[
    // === Overview ===
    NavSection {
        key: "dashboard",
        label: "Dashboard",
        icon: "fa-gauge",
        url: "/dashboard",
        group: NavGroup::Overview,
        required: Permission::ViewDashboard,
        items: &[],
    },
    NavSection {
        key: "analytics",
        label: "Analytics",
        icon: "fa-chart-line",
        url: "/analytics",
        group: NavGroup::Overview,
        required: Permission::ViewReports,
        items: &[],
    },
    // === Banking ===
    NavSection {
        key: "accounts",
        label: "Accounts",
        icon: "fa-building-columns",
        url: "/accounts",
        group: NavGroup::Banking,
        required: Permission::ViewAccounts,
        items: &[
            item("All Accounts", "/accounts"),
            guarded("Open Account", "/accounts/new", Permission::ManageAccounts),
            guarded("Frozen Accounts", "/accounts/frozen", Permission::ManageAccounts),
        ],
    },
    NavSection {
        key: "transactions",
        label: "Transactions",
        icon: "fa-right-left",
        url: "/transactions",
        group: NavGroup::Banking,
        required: Permission::ViewTransactions,
        items: &[
            item("History", "/transactions"),
            guarded(
                "Pending Approvals",
                "/transactions/pending",
                Permission::ApproveTransactions,
            ),
        ],
    },
    NavSection {
        key: "payments",
        label: "Payments",
        icon: "fa-money-bill-transfer",
        url: "/payments",
        group: NavGroup::Banking,
        required: Permission::ViewTransactions,
        items: &[],
    },
    NavSection {
        key: "cards",
        label: "Cards",
        icon: "fa-credit-card",
        url: "/cards",
        group: NavGroup::Banking,
        required: Permission::ViewAccounts,
        items: &[],
    },
    NavSection {
        key: "loans",
        label: "Loans",
        icon: "fa-hand-holding-dollar",
        url: "/loans",
        group: NavGroup::Banking,
        required: Permission::ManageAccounts,
        items: &[],
    },
    NavSection {
        key: "islamic_banking",
        label: "Islamic Banking",
        icon: "fa-mosque",
        url: "/islamic-banking",
        group: NavGroup::Banking,
        required: Permission::ViewIslamicBanking,
        items: &[
            item("Products", "/islamic-banking/products"),
            guarded(
                "Sharia Approvals",
                "/islamic-banking/approvals",
                Permission::ManageIslamicBanking,
            ),
        ],
    },
    // === Treasury ===
    NavSection {
        key: "treasury",
        label: "Treasury",
        icon: "fa-vault",
        url: "/treasury",
        group: NavGroup::Treasury,
        required: Permission::ViewTreasury,
        items: &[
            item("Positions", "/treasury"),
            guarded("Transfers", "/treasury/transfers", Permission::ManageTreasury),
        ],
    },
    NavSection {
        key: "liquidity",
        label: "Liquidity",
        icon: "fa-water",
        url: "/treasury/liquidity",
        group: NavGroup::Treasury,
        required: Permission::ViewTreasury,
        items: &[],
    },
    NavSection {
        key: "fx",
        label: "Foreign Exchange",
        icon: "fa-coins",
        url: "/treasury/fx",
        group: NavGroup::Treasury,
        required: Permission::ManageTreasury,
        items: &[],
    },
    NavSection {
        key: "investments",
        label: "Investments",
        icon: "fa-seedling",
        url: "/treasury/investments",
        group: NavGroup::Treasury,
        required: Permission::ManageTreasury,
        items: &[],
    },
    // === Digital assets ===
    NavSection {
        key: "nvct_stablecoin",
        label: "NVCT Stablecoin",
        icon: "fa-circle-dollar-to-slot",
        url: "/nvct-stablecoin",
        group: NavGroup::DigitalAssets,
        required: Permission::ViewNvct,
        items: &[
            item("Overview", "/nvct-stablecoin"),
            guarded("Reserves", "/nvct-stablecoin/reserves", Permission::ViewTreasury),
        ],
    },
    NavSection {
        key: "nvct_supply",
        label: "NVCT Supply",
        icon: "fa-industry",
        url: "/nvct-stablecoin/supply",
        group: NavGroup::DigitalAssets,
        required: Permission::ManageNvctSupply,
        items: &[
            item("Mint", "/nvct-stablecoin/mint"),
            item("Burn", "/nvct-stablecoin/burn"),
        ],
    },
    NavSection {
        key: "binance_integration",
        label: "Binance Integration",
        icon: "fa-link",
        url: "/binance-integration",
        group: NavGroup::DigitalAssets,
        required: Permission::ViewTrading,
        items: &[],
    },
    NavSection {
        key: "trading",
        label: "Trading Desk",
        icon: "fa-chart-candlestick",
        url: "/trading",
        group: NavGroup::DigitalAssets,
        required: Permission::ExecuteTrades,
        items: &[],
    },
    NavSection {
        key: "blockchain_explorer",
        label: "Blockchain Explorer",
        icon: "fa-cubes",
        url: "/blockchain",
        group: NavGroup::DigitalAssets,
        required: Permission::ViewNvct,
        items: &[],
    },
    // === Sovereign ===
    NavSection {
        key: "sovereign_banking",
        label: "Sovereign Banking",
        icon: "fa-landmark-flag",
        url: "/sovereign",
        group: NavGroup::Sovereign,
        required: Permission::ViewSovereign,
        items: &[item("Summary", "/sovereign/summary")],
    },
    NavSection {
        key: "sovereign_debt",
        label: "Sovereign Debt",
        icon: "fa-file-invoice-dollar",
        url: "/sovereign/portfolios",
        group: NavGroup::Sovereign,
        required: Permission::ViewSovereign,
        items: &[guarded(
            "New Portfolio",
            "/sovereign/portfolios/new",
            Permission::ManageSovereign,
        )],
    },
    NavSection {
        key: "central_bank_ops",
        label: "Central Bank Operations",
        icon: "fa-building-shield",
        url: "/sovereign/central-bank",
        group: NavGroup::Sovereign,
        required: Permission::ManageSovereign,
        items: &[],
    },
    // === Compliance ===
    NavSection {
        key: "compliance",
        label: "Compliance",
        icon: "fa-scale-balanced",
        url: "/compliance",
        group: NavGroup::Compliance,
        required: Permission::ViewCompliance,
        items: &[
            item("Frameworks", "/compliance/frameworks"),
            guarded(
                "Assessments",
                "/compliance/assessments",
                Permission::ManageCompliance,
            ),
        ],
    },
    NavSection {
        key: "aml",
        label: "AML Monitoring",
        icon: "fa-magnifying-glass-dollar",
        url: "/compliance/aml",
        group: NavGroup::Compliance,
        required: Permission::ViewAml,
        items: &[
            item("Alerts", "/compliance/aml"),
            guarded("Review Queue", "/compliance/aml/review", Permission::ReviewAml),
        ],
    },
    NavSection {
        key: "kyc",
        label: "KYC",
        icon: "fa-id-card",
        url: "/compliance/kyc",
        group: NavGroup::Compliance,
        required: Permission::ViewKyc,
        items: &[guarded(
            "Verification Queue",
            "/compliance/kyc/queue",
            Permission::ManageKyc,
        )],
    },
    NavSection {
        key: "sanctions",
        label: "Sanctions Screening",
        icon: "fa-ban",
        url: "/compliance/sanctions",
        group: NavGroup::Compliance,
        required: Permission::ReviewAml,
        items: &[],
    },
    NavSection {
        key: "regulatory_reporting",
        label: "Regulatory Reporting",
        icon: "fa-file-contract",
        url: "/compliance/reporting",
        group: NavGroup::Compliance,
        required: Permission::ManageCompliance,
        items: &[],
    },
    // === Risk & reporting ===
    NavSection {
        key: "reports",
        label: "Reports",
        icon: "fa-file-lines",
        url: "/reports",
        group: NavGroup::RiskReporting,
        required: Permission::ViewReports,
        items: &[
            item("Library", "/reports"),
            guarded("Exports", "/reports/exports", Permission::ExportReports),
        ],
    },
    NavSection {
        key: "risk_management",
        label: "Risk Management",
        icon: "fa-triangle-exclamation",
        url: "/risk",
        group: NavGroup::RiskReporting,
        required: Permission::ViewCompliance,
        items: &[],
    },
    NavSection {
        key: "audit_log",
        label: "Audit Log",
        icon: "fa-clipboard-list",
        url: "/audit-log",
        group: NavGroup::RiskReporting,
        required: Permission::ViewAuditLog,
        items: &[],
    },
    // === Administration ===
    NavSection {
        key: "user_management",
        label: "User Management",
        icon: "fa-users-gear",
        url: "/user-management",
        group: NavGroup::Administration,
        required: Permission::ViewUsers,
        items: &[
            item("Users", "/user-management/users"),
            guarded("Invite User", "/user-management/users/new", Permission::ManageUsers),
        ],
    },
    NavSection {
        key: "role_management",
        label: "Roles & Permissions",
        icon: "fa-user-shield",
        url: "/user-management/roles",
        group: NavGroup::Administration,
        required: Permission::ManageRoles,
        items: &[],
    },
    NavSection {
        key: "security_center",
        label: "Security Center",
        icon: "fa-shield-halved",
        url: "/security-center",
        group: NavGroup::Administration,
        required: Permission::ViewSecurityCenter,
        items: &[
            item("Status", "/security-center/status"),
            guarded(
                "Blocked Clients",
                "/security-center/blocked",
                Permission::ManageSecurity,
            ),
        ],
    },
    NavSection {
        key: "system_settings",
        label: "System Settings",
        icon: "fa-gears",
        url: "/settings",
        group: NavGroup::Administration,
        required: Permission::SystemSettings,
        items: &[],
    },
    NavSection {
        key: "error_logs",
        label: "Error Logs",
        icon: "fa-bug",
        url: "/security-center/error-logs",
        group: NavGroup::Administration,
        required: Permission::ViewAuditLog,
        items: &[],
    },
    // === Partners & developers ===
    NavSection {
        key: "partner_portal",
        label: "Partner Portal",
        icon: "fa-handshake",
        url: "/partners",
        group: NavGroup::PartnersDevelopers,
        required: Permission::ViewPartners,
        items: &[guarded(
            "Onboarding",
            "/partners/onboarding",
            Permission::ManagePartners,
        )],
    },
    NavSection {
        key: "api_docs",
        label: "API Documentation",
        icon: "fa-book",
        url: "/api-docs",
        group: NavGroup::PartnersDevelopers,
        required: Permission::ViewApiDocs,
        items: &[],
    },
    NavSection {
        key: "api_keys",
        label: "API Keys",
        icon: "fa-key",
        url: "/api-keys",
        group: NavGroup::PartnersDevelopers,
        required: Permission::ManageApiKeys,
        items: &[],
    },
    NavSection {
        key: "developer_tools",
        label: "Developer Tools",
        icon: "fa-code",
        url: "/developer",
        group: NavGroup::PartnersDevelopers,
        required: Permission::ManageApiKeys,
        items: &[],
    },
    // === Support ===
    NavSection {
        key: "support",
        label: "Support Center",
        icon: "fa-headset",
        url: "/support",
        group: NavGroup::Support,
        required: Permission::ViewSupport,
        items: &[guarded(
            "Ticket Queue",
            "/support/tickets",
            Permission::ManageSupport,
        )],
    },
    NavSection {
        key: "documents",
        label: "Documents",
        icon: "fa-folder-open",
        url: "/documents",
        group: NavGroup::Support,
        required: Permission::ViewSupport,
        items: &[],
    },
    NavSection {
        key: "notifications",
        label: "Notifications",
        icon: "fa-bell",
        url: "/notifications",
        group: NavGroup::Support,
        required: Permission::ViewDashboard,
        items: &[],
    },
    NavSection {
        key: "profile",
        label: "My Profile",
        icon: "fa-user",
        url: "/profile",
        group: NavGroup::Support,
        required: Permission::ViewDashboard,
        items: &[],
    },
];
