//! NVCT stablecoin supply - mint, burn, audit
//!
//! Mỗi lần mint phải nạp đủ dự trữ để giữ tỷ lệ bảo chứng tối thiểu.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use nvcbank_core::{CoreResult, NvctSupply, Permission, SupplyChange, User};
use nvcbank_persistence::NvctSupplyRepo;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Giới hạn phát hành mặc định khi chưa có bản ghi supply
pub const DEFAULT_MAX_SUPPLY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

const MAX_UPDATE_ATTEMPTS: u32 = 64;

pub struct NvctService<'a> {
    ctx: &'a ServiceContext,
    min_collateral_ratio: Decimal,
}

impl<'a> NvctService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            min_collateral_ratio: Decimal::ONE,
        }
    }

    pub fn with_min_collateral_ratio(mut self, ratio: Decimal) -> Self {
        self.min_collateral_ratio = ratio;
        self
    }

    async fn load(&self) -> BusinessResult<NvctSupply> {
        Ok(NvctSupplyRepo::get(self.ctx.pool())
            .await?
            .unwrap_or_else(|| NvctSupply::genesis(DEFAULT_MAX_SUPPLY)))
    }

    /// Đọc - áp dụng - ghi có điều kiện; đọc lại khi có ghi đồng thời.
    async fn update<T>(
        &self,
        apply: impl Fn(&mut NvctSupply) -> CoreResult<T>,
    ) -> BusinessResult<(NvctSupply, T)> {
        let pool = self.ctx.pool();
        NvctSupplyRepo::init(pool, &NvctSupply::genesis(DEFAULT_MAX_SUPPLY)).await?;

        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            let current = NvctSupplyRepo::get(pool)
                .await?
                .ok_or_else(|| BusinessError::not_found("NvctSupply", "1"))?;
            let mut next = current.clone();
            let out = apply(&mut next).map_err(BusinessError::from)?;
            if NvctSupplyRepo::compare_and_swap(pool, &current, &next).await? {
                return Ok((next, out));
            }
            debug!(attempt, "NVCT supply changed concurrently, retrying");
        }
        Err(BusinessError::rule("NVCT supply is under heavy contention, try again").into())
    }

    pub async fn supply(&self, actor: &User) -> BusinessResult<NvctSupply> {
        self.ctx.authorize(actor, Permission::ViewNvct)?;
        self.load().await
    }

    pub async fn mint(
        &self,
        actor: &User,
        amount: Decimal,
        reserve_deposit: Decimal,
    ) -> BusinessResult<SupplyChange> {
        self.ctx.authorize(actor, Permission::ManageNvctSupply)?;
        let ratio = self.min_collateral_ratio;
        let (_, change) = self
            .update(|supply| supply.mint(amount, reserve_deposit, ratio))
            .await?;

        info!(
            actor = %actor.username,
            %amount,
            %reserve_deposit,
            circulating = %change.circulating_supply,
            "NVCT minted"
        );
        Ok(change)
    }

    /// Thu hồi NVCT, dự trữ giải phóng tương ứng
    pub async fn burn(&self, actor: &User, amount: Decimal) -> BusinessResult<SupplyChange> {
        self.ctx.authorize(actor, Permission::ManageNvctSupply)?;
        let (_, change) = self.update(|supply| supply.burn(amount)).await?;

        info!(actor = %actor.username, %amount, circulating = %change.circulating_supply, "NVCT burned");
        Ok(change)
    }

    pub async fn record_audit(&self, actor: &User) -> BusinessResult<NvctSupply> {
        self.ctx.authorize(actor, Permission::ManageNvctSupply)?;
        let (supply, ()) = self
            .update(|supply| {
                supply.mark_audited();
                Ok(())
            })
            .await?;
        Ok(supply)
    }
}
