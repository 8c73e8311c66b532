//! # Islamic Banking Module
//!
//! Sản phẩm ngân hàng Hồi giáo. Sản phẩm chỉ được kích hoạt sau khi
//! Hội đồng Sharia phê duyệt.

use crate::error::{CoreError, CoreResult};
use crate::validation::{check_length, check_range};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IslamicProductType {
    /// Bán hàng cộng lợi nhuận
    Murabaha,
    /// Thuê tài sản
    Ijara,
    /// Hợp danh góp vốn
    Musharaka,
    /// Ủy thác đầu tư
    Mudaraba,
    Sukuk,
    /// Bảo hiểm tương hỗ
    Takaful,
    /// Tiền gửi lưu ký
    Wadiah,
}

impl IslamicProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IslamicProductType::Murabaha => "murabaha",
            IslamicProductType::Ijara => "ijara",
            IslamicProductType::Musharaka => "musharaka",
            IslamicProductType::Mudaraba => "mudaraba",
            IslamicProductType::Sukuk => "sukuk",
            IslamicProductType::Takaful => "takaful",
            IslamicProductType::Wadiah => "wadiah",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "murabaha" => Some(IslamicProductType::Murabaha),
            "ijara" => Some(IslamicProductType::Ijara),
            "musharaka" => Some(IslamicProductType::Musharaka),
            "mudaraba" => Some(IslamicProductType::Mudaraba),
            "sukuk" => Some(IslamicProductType::Sukuk),
            "takaful" => Some(IslamicProductType::Takaful),
            "wadiah" => Some(IslamicProductType::Wadiah),
            _ => None,
        }
    }

    /// Wadiah là tiền gửi lưu ký - không được hứa hẹn lợi nhuận
    pub fn allows_profit(&self) -> bool {
        !matches!(self, IslamicProductType::Wadiah)
    }
}

impl fmt::Display for IslamicProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslamicBankingProduct {
    pub id: String,
    pub name: String,
    pub product_type: IslamicProductType,
    /// Tỷ suất lợi nhuận dự kiến, phần trăm
    pub profit_rate: Decimal,
    pub min_investment: Decimal,
    pub sharia_board_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl IslamicBankingProduct {
    pub fn new(
        name: &str,
        product_type: IslamicProductType,
        profit_rate: Decimal,
        min_investment: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            product_type,
            profit_rate,
            min_investment,
            sharia_board_approved: false,
            is_active: false,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_length("name", &self.name, 1, 150)?;
        check_range("profit_rate", self.profit_rate, Decimal::ZERO, Decimal::ONE_HUNDRED)?;
        if !self.product_type.allows_profit() && !self.profit_rate.is_zero() {
            return Err(CoreError::validation(
                "profit_rate",
                "wadiah products cannot carry a profit rate",
            ));
        }
        if self.min_investment < Decimal::ZERO {
            return Err(CoreError::validation("min_investment", "must not be negative"));
        }
        if self.is_active && !self.sharia_board_approved {
            return Err(CoreError::validation(
                "is_active",
                "product requires Sharia board approval before activation",
            ));
        }
        Ok(())
    }

    pub fn approve(&mut self) {
        self.sharia_board_approved = true;
    }

    pub fn activate(&mut self) -> CoreResult<()> {
        if !self.sharia_board_approved {
            return Err(CoreError::transition("unapproved", "active"));
        }
        self.is_active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_activation_requires_approval() {
        let mut product =
            IslamicBankingProduct::new("Home Ijara", IslamicProductType::Ijara, dec!(5.5), dec!(1000));
        assert!(product.validate().is_ok());
        assert!(product.activate().unwrap_err().is_state_error());

        product.approve();
        product.activate().unwrap();
        assert!(product.is_active);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_wadiah_has_no_profit() {
        let product =
            IslamicBankingProduct::new("Safe Keeping", IslamicProductType::Wadiah, dec!(1), dec!(0));
        assert!(product.validate().is_err());

        let product =
            IslamicBankingProduct::new("Safe Keeping", IslamicProductType::Wadiah, dec!(0), dec!(0));
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_active_without_approval_is_invalid() {
        let mut product =
            IslamicBankingProduct::new("Sukuk Fund", IslamicProductType::Sukuk, dec!(6), dec!(5000));
        product.is_active = true;
        assert!(product.validate().is_err());
    }
}
