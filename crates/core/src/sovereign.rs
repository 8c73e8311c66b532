//! # Sovereign Module
//!
//! Danh mục nợ quốc gia (sovereign debt) do ngân hàng nắm giữ.

use crate::error::{CoreError, CoreResult};
use crate::validation::{check_amount, check_country_code, check_currency_code, check_length, check_range};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Loại công cụ nợ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtInstrument {
    /// Trái phiếu (> 10 năm)
    Bond,
    /// Tín phiếu kho bạc (< 1 năm)
    Bill,
    /// Kỳ phiếu (1-10 năm)
    Note,
    /// Khoản vay song phương
    Loan,
}

impl DebtInstrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtInstrument::Bond => "bond",
            DebtInstrument::Bill => "bill",
            DebtInstrument::Note => "note",
            DebtInstrument::Loan => "loan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bond" => Some(DebtInstrument::Bond),
            "bill" => Some(DebtInstrument::Bill),
            "note" => Some(DebtInstrument::Note),
            "loan" => Some(DebtInstrument::Loan),
            _ => None,
        }
    }
}

impl fmt::Display for DebtInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Performing,
    Restructured,
    Default,
    Matured,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Performing => "performing",
            DebtStatus::Restructured => "restructured",
            DebtStatus::Default => "default",
            DebtStatus::Matured => "matured",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "performing" => Some(DebtStatus::Performing),
            "restructured" => Some(DebtStatus::Restructured),
            "default" => Some(DebtStatus::Default),
            "matured" => Some(DebtStatus::Matured),
            _ => None,
        }
    }

    /// Khoản nợ còn dư nợ
    pub fn is_outstanding(&self) -> bool {
        !matches!(self, DebtStatus::Matured)
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SovereignDebtPortfolio {
    pub id: String,
    /// Quốc gia phát hành (ISO alpha-2)
    pub country: String,
    pub instrument: DebtInstrument,
    pub principal: Decimal,
    /// Lãi suất năm, phần trăm
    pub interest_rate: Decimal,
    pub currency: String,
    pub maturity_date: NaiveDate,
    /// Xếp hạng tín nhiệm (AAA, BB+, ...)
    pub credit_rating: String,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
}

impl SovereignDebtPortfolio {
    pub fn new(
        country: &str,
        instrument: DebtInstrument,
        principal: Decimal,
        interest_rate: Decimal,
        currency: &str,
        maturity_date: NaiveDate,
        credit_rating: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            country: country.to_uppercase(),
            instrument,
            principal,
            interest_rate,
            currency: currency.to_uppercase(),
            maturity_date,
            credit_rating: credit_rating.trim().to_uppercase(),
            status: DebtStatus::Performing,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_country_code("country", &self.country)?;
        check_amount("principal", self.principal)?;
        check_range("interest_rate", self.interest_rate, Decimal::ZERO, Decimal::ONE_HUNDRED)?;
        check_currency_code("currency", &self.currency)?;
        check_length("credit_rating", &self.credit_rating, 1, 8)?;
        if !self
            .credit_rating
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '+' || c == '-')
        {
            return Err(CoreError::validation("credit_rating", "unrecognised rating format"));
        }
        Ok(())
    }

    /// Số ngày còn lại tới đáo hạn (âm nếu đã quá hạn)
    pub fn days_to_maturity(&self, today: NaiveDate) -> i64 {
        (self.maturity_date - today).num_days()
    }

    /// Lãi năm dự kiến = principal * rate / 100
    pub fn annual_interest(&self) -> Decimal {
        self.principal * self.interest_rate / Decimal::ONE_HUNDRED
    }
}
