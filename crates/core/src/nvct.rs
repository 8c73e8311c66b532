//! # NVCT Module
//!
//! Quản lý nguồn cung stablecoin NVCT.
//!
//! Bất biến:
//! - `0 <= circulating_supply <= total_supply <= max_supply`
//! - sau khi mint: `reserve_balance >= circulating_supply * min_collateral_ratio`

use crate::error::{CoreError, CoreResult};
use crate::validation::{check_amount, checked_add, checked_mul, MAX_AMOUNT};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trạng thái nguồn cung NVCT (một bản ghi duy nhất)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvctSupply {
    pub total_supply: Decimal,
    pub circulating_supply: Decimal,
    /// Dự trữ bảo chứng (USD)
    pub reserve_balance: Decimal,
    pub max_supply: Decimal,
    pub last_audit: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Kết quả một thao tác mint/burn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChange {
    pub amount: Decimal,
    pub reserve_delta: Decimal,
    pub total_supply: Decimal,
    pub circulating_supply: Decimal,
    pub reserve_balance: Decimal,
}

impl NvctSupply {
    /// Nguồn cung rỗng với giới hạn `max_supply`
    pub fn genesis(max_supply: Decimal) -> Self {
        Self {
            total_supply: Decimal::ZERO,
            circulating_supply: Decimal::ZERO,
            reserve_balance: Decimal::ZERO,
            max_supply,
            last_audit: None,
            updated_at: Utc::now(),
        }
    }

    /// Tỷ lệ bảo chứng hiện tại; None khi chưa có lưu hành
    pub fn collateral_ratio(&self) -> Option<Decimal> {
        if self.circulating_supply.is_zero() {
            None
        } else {
            Some(self.reserve_balance / self.circulating_supply)
        }
    }

    /// Lượng còn có thể mint trước khi chạm max_supply
    pub fn remaining_capacity(&self) -> Decimal {
        (self.max_supply - self.total_supply).max(Decimal::ZERO)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.circulating_supply < Decimal::ZERO {
            return Err(CoreError::validation("circulating_supply", "must not be negative"));
        }
        if self.circulating_supply > self.total_supply {
            return Err(CoreError::validation(
                "circulating_supply",
                "must not exceed total supply",
            ));
        }
        if self.total_supply > self.max_supply {
            return Err(CoreError::validation("total_supply", "must not exceed max supply"));
        }
        if self.reserve_balance < Decimal::ZERO {
            return Err(CoreError::validation("reserve_balance", "must not be negative"));
        }
        Ok(())
    }

    /// Phát hành `amount` NVCT, nạp thêm `reserve_deposit` vào dự trữ.
    pub fn mint(
        &mut self,
        amount: Decimal,
        reserve_deposit: Decimal,
        min_collateral_ratio: Decimal,
    ) -> CoreResult<SupplyChange> {
        check_amount("amount", amount)?;
        if reserve_deposit < Decimal::ZERO || reserve_deposit > MAX_AMOUNT {
            return Err(CoreError::InvalidAmount(format!(
                "reserve deposit must be between 0 and {}: {}",
                MAX_AMOUNT, reserve_deposit
            )));
        }

        let remaining = self.remaining_capacity();
        if amount > remaining {
            return Err(CoreError::SupplyCapExceeded {
                requested: amount,
                remaining,
            });
        }

        let new_total = checked_add("total_supply", self.total_supply, amount)?;
        let new_circulating = checked_add("circulating_supply", self.circulating_supply, amount)?;
        let new_reserve = checked_add("reserve_balance", self.reserve_balance, reserve_deposit)?;
        let required = checked_mul("required reserve", new_circulating, min_collateral_ratio)?;
        if new_reserve < required {
            return Err(CoreError::InsufficientReserves {
                required,
                available: new_reserve,
            });
        }

        self.total_supply = new_total;
        self.circulating_supply = new_circulating;
        self.reserve_balance = new_reserve;
        self.updated_at = Utc::now();

        Ok(self.change(amount, reserve_deposit))
    }

    /// Thu hồi `amount` NVCT; dự trữ được giải phóng 1:1 (không âm).
    pub fn burn(&mut self, amount: Decimal) -> CoreResult<SupplyChange> {
        check_amount("amount", amount)?;
        if amount > self.circulating_supply {
            return Err(CoreError::InsufficientCirculating {
                needed: amount,
                circulating: self.circulating_supply,
            });
        }

        let released = amount.min(self.reserve_balance);
        self.total_supply -= amount;
        self.circulating_supply -= amount;
        self.reserve_balance -= released;
        self.updated_at = Utc::now();

        Ok(self.change(amount, -released))
    }

    /// Đánh dấu thời điểm kiểm toán dự trữ
    pub fn mark_audited(&mut self) {
        let now = Utc::now();
        self.last_audit = Some(now);
        self.updated_at = now;
    }

    fn change(&self, amount: Decimal, reserve_delta: Decimal) -> SupplyChange {
        SupplyChange {
            amount,
            reserve_delta,
            total_supply: self.total_supply,
            circulating_supply: self.circulating_supply,
            reserve_balance: self.reserve_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mint_fully_backed() {
        let mut supply = NvctSupply::genesis(dec!(1000000));
        let change = supply.mint(dec!(500), dec!(500), dec!(1)).unwrap();
        assert_eq!(change.total_supply, dec!(500));
        assert_eq!(change.circulating_supply, dec!(500));
        assert_eq!(change.reserve_balance, dec!(500));
        assert_eq!(supply.collateral_ratio(), Some(dec!(1)));
        assert!(supply.validate().is_ok());
    }

    #[test]
    fn test_mint_rejects_under_collateralised() {
        let mut supply = NvctSupply::genesis(dec!(1000000));
        let err = supply.mint(dec!(500), dec!(400), dec!(1)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientReserves { .. }));
        assert_eq!(supply.total_supply, dec!(0));
    }

    #[test]
    fn test_mint_respects_cap() {
        let mut supply = NvctSupply::genesis(dec!(1000));
        supply.mint(dec!(900), dec!(900), dec!(1)).unwrap();
        let err = supply.mint(dec!(200), dec!(200), dec!(1)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SupplyCapExceeded { remaining, .. } if remaining == dec!(100)
        ));
    }

    #[test]
    fn test_mint_rejects_unbounded_deposit() {
        let mut supply = NvctSupply::genesis(dec!(1000));
        let err = supply.mint(dec!(1), Decimal::MAX, dec!(1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount(_)));
        assert_eq!(supply.reserve_balance, dec!(0));

        // trạng thái không bị hỏng, mint tiếp vẫn chạy
        supply.mint(dec!(1), MAX_AMOUNT, dec!(1)).unwrap();
        let change = supply.mint(dec!(1), dec!(1), dec!(1)).unwrap();
        assert_eq!(change.circulating_supply, dec!(2));
    }

    #[test]
    fn test_mint_reserve_overflow_is_an_error() {
        let mut supply = NvctSupply::genesis(dec!(1000));
        supply.reserve_balance = Decimal::MAX - dec!(1);
        let err = supply.mint(dec!(1), dec!(10), dec!(1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount(_)));
        assert_eq!(supply.circulating_supply, dec!(0));
    }

    #[test]
    fn test_burn() {
        let mut supply = NvctSupply::genesis(dec!(1000));
        supply.mint(dec!(300), dec!(330), dec!(1)).unwrap();
        let change = supply.burn(dec!(100)).unwrap();
        assert_eq!(change.circulating_supply, dec!(200));
        assert_eq!(change.reserve_balance, dec!(230));
        assert_eq!(change.reserve_delta, dec!(-100));

        let err = supply.burn(dec!(201)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientCirculating { .. }));
        assert!(supply.burn(dec!(0)).is_err());
    }

    #[test]
    fn test_validate_detects_broken_invariants() {
        let mut supply = NvctSupply::genesis(dec!(10));
        supply.total_supply = dec!(5);
        supply.circulating_supply = dec!(6);
        assert!(supply.validate().is_err());
        supply.circulating_supply = dec!(5);
        supply.total_supply = dec!(11);
        assert!(supply.validate().is_err());
    }
}
