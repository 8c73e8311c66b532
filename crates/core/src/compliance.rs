//! # Compliance Module
//!
//! Khung tuân thủ (Basel III, FATF, IFRS 9, ...) và điểm đánh giá.

use crate::error::{CoreError, CoreResult};
use crate::validation::{check_country_code, check_length, check_range};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkStatus {
    Draft,
    Active,
    Retired,
}

impl FrameworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkStatus::Draft => "draft",
            FrameworkStatus::Active => "active",
            FrameworkStatus::Retired => "retired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(FrameworkStatus::Draft),
            "active" => Some(FrameworkStatus::Active),
            "retired" => Some(FrameworkStatus::Retired),
            _ => None,
        }
    }
}

impl fmt::Display for FrameworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFramework {
    pub id: String,
    pub name: String,
    /// Mã định danh, ví dụ `BASEL_III`
    pub code: String,
    /// Phạm vi áp dụng: mã quốc gia hoặc `GLOBAL`
    pub jurisdiction: String,
    pub description: Option<String>,
    pub status: FrameworkStatus,
    /// Điểm tuân thủ 0..=100
    pub compliance_score: Decimal,
    pub last_assessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceFramework {
    pub fn new(name: &str, code: &str, jurisdiction: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            code: code.trim().to_uppercase(),
            jurisdiction: jurisdiction.trim().to_uppercase(),
            description: None,
            status: FrameworkStatus::Draft,
            compliance_score: Decimal::ZERO,
            last_assessed: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_length("name", &self.name, 1, 200)?;
        check_length("code", &self.code, 2, 50)?;
        if !self
            .code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(CoreError::validation(
                "code",
                "only upper-case letters, digits and '_' are allowed",
            ));
        }
        if self.jurisdiction != "GLOBAL" {
            check_country_code("jurisdiction", &self.jurisdiction)?;
        }
        if let Some(desc) = &self.description {
            check_length("description", desc, 0, 2000)?;
        }
        check_range("compliance_score", self.compliance_score, Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Ghi nhận kết quả đánh giá. Framework đã retired không thể đánh giá lại.
    pub fn record_assessment(&mut self, score: Decimal) -> CoreResult<()> {
        if self.status == FrameworkStatus::Retired {
            return Err(CoreError::transition(self.status, "assessed"));
        }
        check_range("compliance_score", score, Decimal::ZERO, Decimal::ONE_HUNDRED)?;
        let now = Utc::now();
        self.compliance_score = score;
        self.last_assessed = Some(now);
        self.updated_at = now;
        if self.status == FrameworkStatus::Draft {
            self.status = FrameworkStatus::Active;
        }
        Ok(())
    }

    pub fn retire(&mut self) -> CoreResult<()> {
        if self.status == FrameworkStatus::Retired {
            return Err(CoreError::transition(self.status, FrameworkStatus::Retired));
        }
        self.status = FrameworkStatus::Retired;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_framework_validation() {
        let fw = ComplianceFramework::new("Basel III", "basel_iii", "global");
        assert_eq!(fw.code, "BASEL_III");
        assert!(fw.validate().is_ok());

        let bad = ComplianceFramework::new("", "B3", "GLOBAL");
        assert!(bad.validate().is_err());

        let bad_code = ComplianceFramework::new("FATF", "FATF-40", "GLOBAL");
        assert!(bad_code.validate().is_err());

        let bad_jurisdiction = ComplianceFramework::new("Local", "LOCAL_RULES", "Nigeria");
        assert!(bad_jurisdiction.validate().is_err());
    }

    #[test]
    fn test_assessment_activates_draft() {
        let mut fw = ComplianceFramework::new("IFRS 9", "IFRS_9", "GLOBAL");
        fw.record_assessment(dec!(87.5)).unwrap();
        assert_eq!(fw.status, FrameworkStatus::Active);
        assert_eq!(fw.compliance_score, dec!(87.5));
        assert!(fw.last_assessed.is_some());

        assert!(fw.record_assessment(dec!(101)).is_err());
        assert_eq!(fw.compliance_score, dec!(87.5));
    }

    #[test]
    fn test_retired_cannot_be_assessed() {
        let mut fw = ComplianceFramework::new("Legacy", "LEGACY", "US");
        fw.retire().unwrap();
        assert!(fw.record_assessment(dec!(50)).unwrap_err().is_state_error());
        assert!(fw.retire().is_err());
    }
}
