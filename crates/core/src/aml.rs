//! # AML Module
//!
//! Giao dịch được sàng lọc chống rửa tiền (AML): flags, mức rủi ro,
//! và vòng đời xử lý của một cảnh báo.
//!
//! ```text
//! pending ──▶ under_review ──▶ cleared
//!    │              │
//!    │              └──────▶ escalated ──▶ reported
//!    └──▶ cleared (chỉ khi rủi ro Low)
//! ```

use crate::error::{CoreError, CoreResult};
use crate::validation::{check_country_code, check_currency_code, check_length, check_positive};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// AML (Anti-Money Laundering) flags.
///
/// Các flag được gắn vào giao dịch để đánh dấu dấu hiệu đáng ngờ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmlFlag {
    /// Giao dịch lớn (>= threshold)
    LargeAmount,
    /// Gần ngưỡng báo cáo (có thể là structuring/smurfing)
    NearThreshold,
    /// Giao dịch xuyên biên giới
    CrossBorder,
    /// Từ/đến quốc gia rủi ro cao
    HighRiskCountry,
    /// Đối tác trong danh sách cấm vận
    SanctionedCounterparty,
    /// Số tiền tròn bất thường
    RoundAmount,
}

impl AmlFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmlFlag::LargeAmount => "large_amount",
            AmlFlag::NearThreshold => "near_threshold",
            AmlFlag::CrossBorder => "cross_border",
            AmlFlag::HighRiskCountry => "high_risk_country",
            AmlFlag::SanctionedCounterparty => "sanctioned_counterparty",
            AmlFlag::RoundAmount => "round_amount",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "large_amount" => Some(AmlFlag::LargeAmount),
            "near_threshold" => Some(AmlFlag::NearThreshold),
            "cross_border" => Some(AmlFlag::CrossBorder),
            "high_risk_country" => Some(AmlFlag::HighRiskCountry),
            "sanctioned_counterparty" => Some(AmlFlag::SanctionedCounterparty),
            "round_amount" => Some(AmlFlag::RoundAmount),
            _ => None,
        }
    }

    /// Trọng số cộng vào risk score
    pub fn weight(&self) -> u8 {
        match self {
            AmlFlag::LargeAmount => 30,
            AmlFlag::NearThreshold => 25,
            AmlFlag::CrossBorder => 10,
            AmlFlag::HighRiskCountry => 40,
            AmlFlag::SanctionedCounterparty => 80,
            AmlFlag::RoundAmount => 5,
        }
    }
}

impl fmt::Display for AmlFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mức rủi ro suy ra từ risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Low < 25 <= Medium < 50 <= High < 75 <= Critical
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => RiskLevel::Low,
            25..=49 => RiskLevel::Medium,
            50..=74 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trạng thái xử lý cảnh báo AML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmlStatus {
    Pending,
    UnderReview,
    Cleared,
    Escalated,
    /// Đã nộp báo cáo giao dịch đáng ngờ (SAR)
    Reported,
}

impl AmlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmlStatus::Pending => "pending",
            AmlStatus::UnderReview => "under_review",
            AmlStatus::Cleared => "cleared",
            AmlStatus::Escalated => "escalated",
            AmlStatus::Reported => "reported",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(AmlStatus::Pending),
            "under_review" => Some(AmlStatus::UnderReview),
            "cleared" => Some(AmlStatus::Cleared),
            "escalated" => Some(AmlStatus::Escalated),
            "reported" => Some(AmlStatus::Reported),
            _ => None,
        }
    }

    /// Trạng thái kết thúc - không chuyển tiếp được nữa
    pub fn is_terminal(&self) -> bool {
        matches!(self, AmlStatus::Cleared | AmlStatus::Reported)
    }

    /// Cảnh báo còn cần xử lý
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for AmlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Giao dịch đã qua sàng lọc AML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmlTransaction {
    pub id: String,
    /// Mã tham chiếu giao dịch gốc
    pub transaction_ref: String,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub counterparty: String,
    /// Quốc gia đối tác (ISO alpha-2)
    pub country: String,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub status: AmlStatus,
    pub flags: Vec<AmlFlag>,
    pub reviewed_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AmlTransaction {
    pub fn new(
        transaction_ref: &str,
        account_id: &str,
        amount: Decimal,
        currency: &str,
        counterparty: &str,
        country: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            transaction_ref: transaction_ref.trim().to_string(),
            account_id: account_id.to_string(),
            amount,
            currency: currency.to_uppercase(),
            counterparty: counterparty.trim().to_string(),
            country: country.to_uppercase(),
            risk_score: 0,
            risk_level: RiskLevel::Low,
            status: AmlStatus::Pending,
            flags: Vec::new(),
            reviewed_by: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Gắn flags và tính lại risk score (tối đa 100)
    pub fn with_flags(mut self, flags: Vec<AmlFlag>) -> Self {
        let score: u32 = flags.iter().map(|f| f.weight() as u32).sum();
        self.risk_score = score.min(100) as u8;
        self.risk_level = RiskLevel::from_score(self.risk_score);
        self.flags = flags;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_length("transaction_ref", &self.transaction_ref, 1, 64)?;
        check_length("counterparty", &self.counterparty, 1, 200)?;
        check_positive("amount", self.amount)?;
        check_currency_code("currency", &self.currency)?;
        check_country_code("country", &self.country)?;
        if self.risk_score > 100 {
            return Err(CoreError::validation("risk_score", "must be between 0 and 100"));
        }
        Ok(())
    }

    /// Kiểm tra chuyển trạng thái có hợp lệ không
    pub fn can_transition(&self, to: AmlStatus) -> bool {
        use AmlStatus::*;
        match (self.status, to) {
            (Pending, UnderReview) => true,
            (Pending, Cleared) => self.risk_level == RiskLevel::Low,
            (UnderReview, Cleared) | (UnderReview, Escalated) => true,
            (Escalated, Reported) => true,
            _ => false,
        }
    }

    /// Chuyển trạng thái, ghi nhận người review
    pub fn transition(
        &mut self,
        to: AmlStatus,
        reviewer_id: &str,
        notes: Option<&str>,
    ) -> CoreResult<()> {
        if !self.can_transition(to) {
            return Err(CoreError::transition(self.status, to));
        }
        self.status = to;
        self.reviewed_by = Some(reviewer_id.to_string());
        if let Some(notes) = notes {
            self.notes = Some(notes.to_string());
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
