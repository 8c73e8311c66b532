//! # NVC Bank Reports
//!
//! Report generation - CSV, JSON, Markdown exports, permission matrix and
//! the RBAC template linter.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV format with proper escaping
//! - [`JsonExporter`] - JSON format (pretty or compact)
//! - [`MarkdownExporter`] - Markdown tables for documentation
//!
//! ## Reports
//!
//! - [`AccountSummaryReport`] - Account overview
//! - [`AmlCaseReport`] - Screened transactions by risk
//! - [`PermissionMatrixReport`] - Permissions × roles grid
//! - [`LintReport`] - Findings of [`RbacLinter`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use nvcbank_core::PermissionTable;
//! use nvcbank_reports::{MarkdownExporter, PermissionMatrixReport, ReportExporter};
//!
//! let report = PermissionMatrixReport::new("RBAC", &PermissionTable::standard());
//! println!("{}", MarkdownExporter::new().export(&report));
//! ```

pub mod aml_report;
pub mod exporters;
pub mod permission_matrix;
pub mod rbac_lint;

pub use aml_report::AmlCaseReport;
pub use exporters::{
    AccountSummaryReport, CsvExporter, ExportFormat, JsonExporter, MarkdownExporter, ReportData,
    ReportExporter,
};
pub use permission_matrix::PermissionMatrixReport;
pub use rbac_lint::{LintFinding, LintReport, LintRule, RbacLinter, SourceKind, PROTECTED_PREFIXES};
