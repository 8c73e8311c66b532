//! AML case report
//!
//! Tổng hợp các giao dịch bị sàng lọc: số case theo risk level, theo flag,
//! case còn mở. Dùng cho compliance officer và auditor.

use chrono::{DateTime, Utc};
use nvcbank_core::{AmlTransaction, RiskLevel};
use std::collections::BTreeMap;

use crate::exporters::ReportData;

#[derive(Debug, Clone)]
pub struct AmlCaseReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    /// Sắp theo risk score giảm dần
    pub cases: Vec<AmlTransaction>,
}

impl AmlCaseReport {
    pub fn generate(title: &str, mut cases: Vec<AmlTransaction>) -> Self {
        cases.sort_by(|a, b| {
            b.risk_score
                .cmp(&a.risk_score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Self {
            title: title.to_string(),
            generated_at: Utc::now(),
            cases,
        }
    }

    pub fn open_cases(&self) -> usize {
        self.cases.iter().filter(|c| c.status.is_open()).count()
    }

    pub fn count_by_level(&self) -> BTreeMap<RiskLevel, usize> {
        let mut counts = BTreeMap::new();
        for case in &self.cases {
            *counts.entry(case.risk_level).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_by_flag(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for flag in self.cases.iter().flat_map(|c| c.flags.iter()) {
            *counts.entry(flag.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Điểm rủi ro trung bình của danh mục (0-100)
    pub fn average_risk_score(&self) -> f64 {
        if self.cases.is_empty() {
            return 0.0;
        }
        let total: u32 = self.cases.iter().map(|c| c.risk_score as u32).sum();
        total as f64 / self.cases.len() as f64
    }
}

impl ReportData for AmlCaseReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        [
            "Reference", "Account", "Amount", "Currency", "Country", "Score", "Level", "Status",
            "Flags",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.cases
            .iter()
            .map(|c| {
                vec![
                    c.transaction_ref.clone(),
                    c.account_id.clone(),
                    c.amount.to_string(),
                    c.currency.clone(),
                    c.country.clone(),
                    c.risk_score.to_string(),
                    c.risk_level.as_str().to_string(),
                    c.status.as_str().to_string(),
                    c.flags
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut summary = vec![
            ("Total Cases".to_string(), self.cases.len().to_string()),
            ("Open Cases".to_string(), self.open_cases().to_string()),
            (
                "Average Risk Score".to_string(),
                format!("{:.1}", self.average_risk_score()),
            ),
        ];
        for (level, count) in self.count_by_level() {
            summary.push((format!("Level {}", level), count.to_string()));
        }
        for (flag, count) in self.count_by_flag() {
            summary.push((format!("Flag {}", flag), count.to_string()));
        }
        summary.push(("Generated At".to_string(), self.generated_at.to_rfc3339()));
        summary
    }
}
