//! Report exporters - CSV, JSON, Markdown
//!
//! Mọi report implement `ReportData`; exporter chỉ làm việc với headers,
//! rows và summary nên dùng được cho mọi loại report.

use chrono::{DateTime, Utc};
use nvcbank_core::{AccountStatus, BankAccount};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;

    /// Get the MIME type for this format
    fn mime_type(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    fn title(&self) -> &str;

    fn headers(&self) -> Vec<String>;

    fn rows(&self) -> Vec<Vec<String>>;

    /// Summary statistics as key-value pairs
    fn summary(&self) -> Vec<(String, String)>;
}

/// Định dạng xuất, chọn từ CLI `--format` hoặc query `?format=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn exporter(&self) -> Box<dyn ReportExporter> {
        match self {
            ExportFormat::Csv => Box::new(CsvExporter::new()),
            ExportFormat::Json => Box::new(JsonExporter::new()),
            ExportFormat::Markdown => Box::new(MarkdownExporter::new()),
        }
    }
}

// ============================================================================
// CSV Exporter
// ============================================================================

pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn line(&self, fields: &[String]) -> String {
        let escaped: Vec<String> = fields.iter().map(|f| self.escape(f)).collect();
        let mut line = escaped.join(&self.delimiter.to_string());
        line.push('\n');
        line
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();
        if self.include_header {
            output.push_str(&self.line(&report.headers()));
        }
        for row in report.rows() {
            output.push_str(&self.line(&row));
        }
        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Report dưới dạng `serde_json::Value` (API trả thẳng value này)
    pub fn to_value(&self, report: &dyn ReportData) -> serde_json::Value {
        let headers = report.headers();
        let data: Vec<serde_json::Value> = report
            .rows()
            .into_iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = headers
                    .iter()
                    .cloned()
                    .zip(row.into_iter().map(serde_json::Value::String))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        let summary: serde_json::Map<String, serde_json::Value> = report
            .summary()
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        serde_json::json!({
            "title": report.title(),
            "summary": summary,
            "data": data,
        })
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let value = self.to_value(report);
        if self.pretty {
            serde_json::to_string_pretty(&value).unwrap_or_default()
        } else {
            serde_json::to_string(&value).unwrap_or_default()
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

// ============================================================================
// Markdown Exporter
// ============================================================================

pub struct MarkdownExporter {
    include_summary: bool,
    include_toc: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_toc: false,
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }

    pub fn with_toc(mut self) -> Self {
        self.include_toc = true;
        self
    }

    // `|` trong cell sẽ phá bảng
    fn cell(value: &str) -> String {
        value.replace('|', "\\|").replace('\n', " ")
    }
}

impl ReportExporter for MarkdownExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_toc {
            output.push_str("## Table of Contents\n\n");
            if self.include_summary {
                output.push_str("- [Summary](#summary)\n");
            }
            output.push_str("- [Data](#data)\n\n");
        }

        if self.include_summary {
            output.push_str("## Summary\n\n");
            for (key, value) in report.summary() {
                output.push_str(&format!("- **{}**: {}\n", key, value));
            }
            output.push('\n');
        }

        output.push_str("## Data\n\n");
        let headers = report.headers();
        if headers.is_empty() {
            return output;
        }

        output.push_str(&format!("| {} |\n", headers.join(" | ")));
        output.push_str(&format!(
            "| {} |\n",
            headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
        ));
        for row in report.rows() {
            let cells: Vec<String> = row.iter().map(|c| Self::cell(c)).collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn mime_type(&self) -> &'static str {
        "text/markdown"
    }
}

// ============================================================================
// Account Summary Report
// ============================================================================

#[derive(Debug, Clone)]
pub struct AccountSummaryReport {
    pub title: String,
    pub accounts: Vec<BankAccount>,
    pub generated_at: DateTime<Utc>,
}

impl AccountSummaryReport {
    pub fn new(title: &str, accounts: Vec<BankAccount>) -> Self {
        Self {
            title: title.to_string(),
            accounts,
            generated_at: Utc::now(),
        }
    }

    /// Tổng số dư tài khoản active theo currency
    pub fn balances_by_currency(&self) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for account in self.accounts.iter().filter(|a| a.status == AccountStatus::Active) {
            *totals.entry(account.currency.clone()).or_default() += account.balance;
        }
        totals
    }
}

impl ReportData for AccountSummaryReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        ["Account Number", "Owner", "Type", "Currency", "Balance", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.accounts
            .iter()
            .map(|a| {
                vec![
                    a.account_number.clone(),
                    a.owner_id.clone(),
                    a.account_type.as_str().to_string(),
                    a.currency.clone(),
                    a.balance.to_string(),
                    a.status.as_str().to_string(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let active = self
            .accounts
            .iter()
            .filter(|a| a.status == AccountStatus::Active)
            .count();
        let mut summary = vec![
            ("Total Accounts".to_string(), self.accounts.len().to_string()),
            ("Active Accounts".to_string(), active.to_string()),
        ];
        for (currency, total) in self.balances_by_currency() {
            summary.push((format!("Balance {}", currency), total.to_string()));
        }
        summary.push(("Generated At".to_string(), self.generated_at.to_rfc3339()));
        summary
    }
}
