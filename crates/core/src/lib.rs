//! # NVC Bank Core
//!
//! Core domain types cho hệ thống quản trị NVC Bank.
//!
//! ## Modules
//!
//! - [`role`], [`permission`], [`rbac`] - phân quyền theo role
//! - [`nav`] - danh mục sections của navbar
//! - [`dashboard`] - widgets và cấu hình dashboard
//! - [`user`], [`account`], [`compliance`], [`aml`], [`nvct`], [`sovereign`],
//!   [`islamic`] - các thực thể nghiệp vụ
//!
//! Crate này không có I/O; mọi kiểm tra quyền là hàm thuần.

pub mod account;
pub mod aml;
pub mod compliance;
pub mod dashboard;
pub mod error;
pub mod islamic;
pub mod nav;
pub mod nvct;
pub mod permission;
pub mod rbac;
pub mod role;
pub mod sovereign;
pub mod user;
pub mod validation;

pub use account::{AccountStatus, AccountType, BankAccount};
pub use aml::{AmlFlag, AmlStatus, AmlTransaction, RiskLevel};
pub use compliance::{ComplianceFramework, FrameworkStatus};
pub use dashboard::{DashboardConfig, QuickAction, WidgetConfig, WidgetKind, WidgetSize};
pub use error::{CoreError, CoreResult};
pub use islamic::{IslamicBankingProduct, IslamicProductType};
pub use nav::{NavGroup, NavItem, NavSection, SECTIONS};
pub use nvct::{NvctSupply, SupplyChange};
pub use permission::Permission;
pub use rbac::{Authorizer, PermissionTable, Subject};
pub use role::UserRole;
pub use sovereign::{DebtInstrument, DebtStatus, SovereignDebtPortfolio};
pub use user::User;
