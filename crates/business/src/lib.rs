//! # NVC Bank Business
//!
//! Business logic layer - RBAC-checked services, navbar/dashboard context,
//! security manager và error logger.
//!
//! Mọi service nhận `&ServiceContext` và kiểm tra quyền của actor trước khi
//! chạm tới persistence.

pub mod accounts;
pub mod aml;
pub mod compliance;
pub mod dashboard;
pub mod error;
pub mod error_logger;
pub mod islamic;
pub mod navbar;
pub mod nvct;
pub mod security;
pub mod services;
pub mod sovereign;
pub mod users;

#[cfg(test)]
mod testing;

pub use accounts::AccountService;
pub use aml::{AmlService, AmlThresholds, ScreeningRequest};
pub use compliance::ComplianceService;
pub use dashboard::DashboardManager;
pub use error::{BusinessError, BusinessResult};
pub use error_logger::{ErrorContext, ErrorLoggerService, USER_FACING_MESSAGE};
pub use islamic::IslamicBankingService;
pub use navbar::{NavbarContext, NavbarContextService};
pub use nvct::NvctService;
pub use security::{EnterpriseSecurityManager, SecurityConfig, SecurityDecision, ThreatKind};
pub use services::ServiceContext;
pub use sovereign::{NewPortfolio, SovereignService, SovereignSummary};
pub use users::UserManagementService;

pub use nvcbank_core::Authorizer;
