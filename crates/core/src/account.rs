//! # Account Module
//!
//! Định nghĩa BankAccount - tài khoản ngân hàng của khách hàng.

use crate::error::{CoreError, CoreResult};
use crate::validation::check_currency_code;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trạng thái của Account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Tài khoản hoạt động bình thường
    Active,
    /// Tài khoản bị đóng băng (nghi ngờ gian lận, vi phạm)
    Frozen,
    /// Tài khoản đã đóng
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Frozen => "frozen",
            AccountStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(AccountStatus::Active),
            "frozen" => Some(AccountStatus::Frozen),
            "closed" => Some(AccountStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loại tài khoản
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Business,
    /// Tài khoản lưu ký tài sản số
    Custody,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Business => "business",
            AccountType::Custody => "custody",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            "business" => Some(AccountType::Business),
            "custody" => Some(AccountType::Custody),
            _ => None,
        }
    }

    /// Tiền tố số tài khoản
    fn number_prefix(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHK",
            AccountType::Savings => "SAV",
            AccountType::Business => "BUS",
            AccountType::Custody => "CUS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tài khoản ngân hàng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    /// ID của user sở hữu
    pub owner_id: String,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BankAccount {
    /// Mở tài khoản mới, số dư 0, trạng thái Active
    pub fn open(owner_id: &str, account_type: AccountType, currency: &str) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        // 10 chữ số cuối từ UUID
        let digits: String = id
            .as_u128()
            .to_string()
            .chars()
            .rev()
            .take(10)
            .collect();
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            account_number: format!("{}-{}", account_type.number_prefix(), digits),
            account_type,
            currency: currency.to_uppercase(),
            balance: Decimal::ZERO,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_currency_code("currency", &self.currency)?;
        if self.balance < Decimal::ZERO {
            return Err(CoreError::validation("balance", "must not be negative"));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Đóng băng tài khoản (chỉ từ Active)
    pub fn freeze(&mut self) -> CoreResult<()> {
        self.transition(AccountStatus::Active, AccountStatus::Frozen)
    }

    /// Mở khóa tài khoản (chỉ từ Frozen)
    pub fn unfreeze(&mut self) -> CoreResult<()> {
        self.transition(AccountStatus::Frozen, AccountStatus::Active)
    }

    /// Đóng tài khoản - yêu cầu số dư bằng 0
    pub fn close(&mut self) -> CoreResult<()> {
        if self.status == AccountStatus::Closed {
            return Err(CoreError::transition(self.status, AccountStatus::Closed));
        }
        if !self.balance.is_zero() {
            return Err(CoreError::validation(
                "balance",
                format!("account must be empty before closing, balance {}", self.balance),
            ));
        }
        self.status = AccountStatus::Closed;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn transition(&mut self, from: AccountStatus, to: AccountStatus) -> CoreResult<()> {
        if self.status != from {
            return Err(CoreError::transition(self.status, to));
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
