//! RBAC template lint

use anyhow::Result;
use nvcbank_reports::{LintRule, RbacLinter};
use std::path::Path;

use super::write_output;
use crate::ReportFormat;

const RULES: [LintRule; 4] = [
    LintRule::UnguardedLink,
    LintRule::HardcodedRoleCheck,
    LintRule::UnguardedApiCall,
    LintRule::CssOnlyProtection,
];

/// Quét `dir`, xuất report; trả về `true` nếu không có finding
pub fn run(dir: &Path, format: ReportFormat, output: Option<&Path>) -> Result<bool> {
    let report = RbacLinter::new()?.lint_dir(dir)?;
    let exporter = format.to_export_format().exporter();
    write_output(&exporter.export(&report), output)?;

    if report.is_clean() {
        eprintln!("✅ {} files scanned, no findings", report.files_scanned);
    } else {
        eprintln!(
            "❌ {} findings in {} files scanned",
            report.findings.len(),
            report.files_scanned
        );
        for rule in RULES {
            let count = report.count(rule);
            if count > 0 {
                eprintln!("   {:<22} {:>4}  {}", rule.as_str(), count, rule.description());
            }
        }
    }
    Ok(report.is_clean())
}
