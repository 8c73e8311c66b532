//! Database schema definitions
//!
//! DDL và row types cho sqlx mapping từ SQLite tables.
//! Decimal lưu dạng TEXT, enum lưu theo mã snake_case.

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, NaiveDate, Utc};
use nvcbank_core::{
    AccountStatus, AccountType, AmlFlag, AmlStatus, AmlTransaction, BankAccount,
    ComplianceFramework, DebtInstrument, DebtStatus, FrameworkStatus, IslamicBankingProduct,
    IslamicProductType, NvctSupply, RiskLevel, SovereignDebtPortfolio, User, UserRole,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Các bảng của hệ thống, tạo theo thứ tự khai báo
pub const TABLES: &[&str] = &[
    "users",
    "bank_accounts",
    "compliance_frameworks",
    "aml_transactions",
    "nvct_supply",
    "sovereign_debt_portfolios",
    "islamic_banking_products",
];

pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    last_login DATETIME
);

CREATE TABLE IF NOT EXISTS bank_accounts (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    account_number TEXT NOT NULL UNIQUE,
    account_type TEXT NOT NULL,
    currency TEXT NOT NULL,
    balance TEXT NOT NULL DEFAULT '0',
    status TEXT NOT NULL DEFAULT 'active',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (owner_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS compliance_frameworks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE,
    jurisdiction TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    compliance_score TEXT NOT NULL DEFAULT '0',
    last_assessed DATETIME,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS aml_transactions (
    id TEXT PRIMARY KEY,
    transaction_ref TEXT NOT NULL UNIQUE,
    account_id TEXT NOT NULL,
    amount TEXT NOT NULL,
    currency TEXT NOT NULL,
    counterparty TEXT NOT NULL,
    country TEXT NOT NULL,
    risk_score INTEGER NOT NULL DEFAULT 0,
    risk_level TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    flags TEXT NOT NULL DEFAULT '',
    reviewed_by TEXT,
    notes TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS nvct_supply (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_supply TEXT NOT NULL,
    circulating_supply TEXT NOT NULL,
    reserve_balance TEXT NOT NULL,
    max_supply TEXT NOT NULL,
    last_audit DATETIME,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS sovereign_debt_portfolios (
    id TEXT PRIMARY KEY,
    country TEXT NOT NULL,
    instrument TEXT NOT NULL,
    principal TEXT NOT NULL,
    interest_rate TEXT NOT NULL,
    currency TEXT NOT NULL,
    maturity_date DATE NOT NULL,
    credit_rating TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'performing',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS islamic_banking_products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    product_type TEXT NOT NULL,
    profit_rate TEXT NOT NULL,
    min_investment TEXT NOT NULL,
    sharia_board_approved INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_bank_accounts_owner ON bank_accounts(owner_id);
CREATE INDEX IF NOT EXISTS idx_aml_status ON aml_transactions(status);
"#;

// === Helpers ===

pub(crate) fn parse_decimal(field: &str, value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| PersistenceError::InvalidDecimal(format!("{}: {} ({})", field, value, e)))
}

fn parse_enum<T>(field: &str, value: &str, parse: fn(&str) -> Option<T>) -> PersistenceResult<T> {
    parse(value).ok_or_else(|| PersistenceError::invalid_enum(field, value))
}

pub(crate) fn encode_flags(flags: &[AmlFlag]) -> String {
    flags
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_flags(value: &str) -> PersistenceResult<Vec<AmlFlag>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_enum("flags", s, AmlFlag::from_str))
        .collect()
}

// === Row types ===

/// Row type cho bảng `users`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Row type cho bảng `bank_accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BankAccountRow {
    pub id: String,
    pub owner_id: String,
    pub account_number: String,
    pub account_type: String,
    pub currency: String,
    pub balance: String, // Decimal stored as TEXT
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho bảng `compliance_frameworks`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ComplianceFrameworkRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub jurisdiction: String,
    pub description: Option<String>,
    pub status: String,
    pub compliance_score: String,
    pub last_assessed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho bảng `aml_transactions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AmlTransactionRow {
    pub id: String,
    pub transaction_ref: String,
    pub account_id: String,
    pub amount: String,
    pub currency: String,
    pub counterparty: String,
    pub country: String,
    pub risk_score: i64,
    pub risk_level: String,
    pub status: String,
    pub flags: String, // comma-separated
    pub reviewed_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho bảng `nvct_supply`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct NvctSupplyRow {
    pub id: i64,
    pub total_supply: String,
    pub circulating_supply: String,
    pub reserve_balance: String,
    pub max_supply: String,
    pub last_audit: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho bảng `sovereign_debt_portfolios`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct SovereignDebtRow {
    pub id: String,
    pub country: String,
    pub instrument: String,
    pub principal: String,
    pub interest_rate: String,
    pub currency: String,
    pub maturity_date: NaiveDate,
    pub credit_rating: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Row type cho bảng `islamic_banking_products`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct IslamicProductRow {
    pub id: String,
    pub name: String,
    pub product_type: String,
    pub profit_rate: String,
    pub min_investment: String,
    pub sharia_board_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// === Conversion implementations ===

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> PersistenceResult<Self> {
        Ok(User {
            role: parse_enum("role", &row.role, UserRole::from_str)?,
            id: row.id,
            username: row.username,
            email: row.email,
            is_active: row.is_active,
            created_at: row.created_at,
            last_login: row.last_login,
        })
    }
}

impl TryFrom<BankAccountRow> for BankAccount {
    type Error = PersistenceError;

    fn try_from(row: BankAccountRow) -> PersistenceResult<Self> {
        Ok(BankAccount {
            account_type: parse_enum("account_type", &row.account_type, AccountType::from_str)?,
            status: parse_enum("status", &row.status, AccountStatus::from_str)?,
            balance: parse_decimal("balance", &row.balance)?,
            id: row.id,
            owner_id: row.owner_id,
            account_number: row.account_number,
            currency: row.currency,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<ComplianceFrameworkRow> for ComplianceFramework {
    type Error = PersistenceError;

    fn try_from(row: ComplianceFrameworkRow) -> PersistenceResult<Self> {
        Ok(ComplianceFramework {
            status: parse_enum("status", &row.status, FrameworkStatus::from_str)?,
            compliance_score: parse_decimal("compliance_score", &row.compliance_score)?,
            id: row.id,
            name: row.name,
            code: row.code,
            jurisdiction: row.jurisdiction,
            description: row.description,
            last_assessed: row.last_assessed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<AmlTransactionRow> for AmlTransaction {
    type Error = PersistenceError;

    fn try_from(row: AmlTransactionRow) -> PersistenceResult<Self> {
        let risk_score = u8::try_from(row.risk_score)
            .map_err(|_| PersistenceError::invalid_enum("risk_score", &row.risk_score.to_string()))?;
        Ok(AmlTransaction {
            amount: parse_decimal("amount", &row.amount)?,
            risk_level: parse_enum("risk_level", &row.risk_level, RiskLevel::from_str)?,
            status: parse_enum("status", &row.status, AmlStatus::from_str)?,
            flags: decode_flags(&row.flags)?,
            risk_score,
            id: row.id,
            transaction_ref: row.transaction_ref,
            account_id: row.account_id,
            currency: row.currency,
            counterparty: row.counterparty,
            country: row.country,
            reviewed_by: row.reviewed_by,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<NvctSupplyRow> for NvctSupply {
    type Error = PersistenceError;

    fn try_from(row: NvctSupplyRow) -> PersistenceResult<Self> {
        Ok(NvctSupply {
            total_supply: parse_decimal("total_supply", &row.total_supply)?,
            circulating_supply: parse_decimal("circulating_supply", &row.circulating_supply)?,
            reserve_balance: parse_decimal("reserve_balance", &row.reserve_balance)?,
            max_supply: parse_decimal("max_supply", &row.max_supply)?,
            last_audit: row.last_audit,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<SovereignDebtRow> for SovereignDebtPortfolio {
    type Error = PersistenceError;

    fn try_from(row: SovereignDebtRow) -> PersistenceResult<Self> {
        Ok(SovereignDebtPortfolio {
            instrument: parse_enum("instrument", &row.instrument, DebtInstrument::from_str)?,
            status: parse_enum("status", &row.status, DebtStatus::from_str)?,
            principal: parse_decimal("principal", &row.principal)?,
            interest_rate: parse_decimal("interest_rate", &row.interest_rate)?,
            id: row.id,
            country: row.country,
            currency: row.currency,
            maturity_date: row.maturity_date,
            credit_rating: row.credit_rating,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<IslamicProductRow> for IslamicBankingProduct {
    type Error = PersistenceError;

    fn try_from(row: IslamicProductRow) -> PersistenceResult<Self> {
        Ok(IslamicBankingProduct {
            product_type: parse_enum(
                "product_type",
                &row.product_type,
                IslamicProductType::from_str,
            )?,
            profit_rate: parse_decimal("profit_rate", &row.profit_rate)?,
            min_investment: parse_decimal("min_investment", &row.min_investment)?,
            id: row.id,
            name: row.name,
            sharia_board_approved: row.sharia_board_approved,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_encoding() {
        let flags = vec![AmlFlag::LargeAmount, AmlFlag::HighRiskCountry];
        let encoded = encode_flags(&flags);
        assert_eq!(encoded, "large_amount,high_risk_country");
        assert_eq!(decode_flags(&encoded).unwrap(), flags);
        assert!(decode_flags("").unwrap().is_empty());
        assert!(decode_flags("large_amount,bogus").is_err());
    }

    #[test]
    fn test_user_row_with_unknown_role() {
        let row = UserRow {
            id: "u1".into(),
            username: "ghost".into(),
            email: "ghost@nvcbank.com".into(),
            role: "wizard".into(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        let err = User::try_from(row).unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_bad_decimal() {
        assert!(parse_decimal("balance", "12.50").is_ok());
        assert!(matches!(
            parse_decimal("balance", "twelve"),
            Err(PersistenceError::InvalidDecimal(_))
        ));
    }
}
