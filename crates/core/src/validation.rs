//! Validation helpers - kiểm tra độ dài chuỗi và khoảng giá trị.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;

/// Độ dài (theo ký tự) của `value` nằm trong `[min, max]`
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> CoreResult<()> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(CoreError::validation(
            field,
            format!("length must be between {} and {}, got {}", min, max, len),
        ));
    }
    Ok(())
}

/// `value` nằm trong `[min, max]`
pub fn check_range(field: &str, value: Decimal, min: Decimal, max: Decimal) -> CoreResult<()> {
    if value < min || value > max {
        return Err(CoreError::validation(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

/// Số tiền phải dương
pub fn check_positive(field: &str, value: Decimal) -> CoreResult<()> {
    if value <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "{} must be positive: {}",
            field, value
        )));
    }
    Ok(())
}

/// Trần cho mọi số tiền nhập vào: 10^18
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0);

/// Số tiền dương và không vượt [`MAX_AMOUNT`]
pub fn check_amount(field: &str, value: Decimal) -> CoreResult<()> {
    check_positive(field, value)?;
    if value > MAX_AMOUNT {
        return Err(CoreError::InvalidAmount(format!(
            "{} exceeds the maximum of {}: {}",
            field, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

pub fn checked_add(field: &str, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| CoreError::InvalidAmount(format!("{} overflows", field)))
}

pub fn checked_mul(field: &str, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| CoreError::InvalidAmount(format!("{} overflows", field)))
}

/// Mã ISO 3166-1 alpha-2 (2 chữ in hoa)
pub fn check_country_code(field: &str, value: &str) -> CoreResult<()> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(CoreError::validation(field, "expected ISO 3166 alpha-2 code"))
    }
}

/// Mã tiền tệ ISO 4217 hoặc mã token (3-5 chữ in hoa)
pub fn check_currency_code(field: &str, value: &str) -> CoreResult<()> {
    let len = value.len();
    if (3..=5).contains(&len) && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(CoreError::validation(field, "expected 3-5 upper-case letters"))
    }
}

pub fn check_email(field: &str, value: &str) -> CoreResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::validation(field, "invalid email address"))
    }
}
