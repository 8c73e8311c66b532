//! Islamic banking products
//!
//! Sản phẩm mới tạo ở trạng thái chưa duyệt, chưa mở bán. Chỉ sau khi
//! Sharia board phê duyệt mới được activate.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use nvcbank_core::{IslamicBankingProduct, IslamicProductType, Permission, User};
use nvcbank_persistence::IslamicProductRepo;
use rust_decimal::Decimal;
use tracing::info;

pub struct IslamicBankingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IslamicBankingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Người không có quyền quản lý chỉ thấy sản phẩm đang mở bán
    pub async fn list(
        &self,
        actor: &User,
        active_only: bool,
    ) -> BusinessResult<Vec<IslamicBankingProduct>> {
        self.ctx.authorize(actor, Permission::ViewIslamicBanking)?;
        let active_only = active_only || !self.ctx.can(actor, Permission::ManageIslamicBanking);
        Ok(IslamicProductRepo::get_all(self.ctx.pool(), active_only).await?)
    }

    pub async fn create(
        &self,
        actor: &User,
        name: &str,
        product_type: IslamicProductType,
        profit_rate: Decimal,
        min_investment: Decimal,
    ) -> BusinessResult<IslamicBankingProduct> {
        self.ctx.authorize(actor, Permission::ManageIslamicBanking)?;
        let product = IslamicBankingProduct::new(name, product_type, profit_rate, min_investment);
        product.validate().map_err(BusinessError::from)?;
        IslamicProductRepo::insert(self.ctx.pool(), &product)
            .await
            .map_err(BusinessError::from)?;
        info!(actor = %actor.username, product = %product.name, kind = product.product_type.as_str(), "islamic product created");
        Ok(product)
    }

    pub async fn approve(&self, actor: &User, product_id: &str) -> BusinessResult<IslamicBankingProduct> {
        self.update(actor, product_id, "approve", |p| {
            p.approve();
            Ok(())
        })
        .await
    }

    pub async fn activate(&self, actor: &User, product_id: &str) -> BusinessResult<IslamicBankingProduct> {
        self.update(actor, product_id, "activate", IslamicBankingProduct::activate)
            .await
    }

    pub async fn deactivate(&self, actor: &User, product_id: &str) -> BusinessResult<IslamicBankingProduct> {
        self.update(actor, product_id, "deactivate", |p| {
            p.deactivate();
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        actor: &User,
        product_id: &str,
        action: &str,
        apply: impl FnOnce(&mut IslamicBankingProduct) -> nvcbank_core::CoreResult<()>,
    ) -> BusinessResult<IslamicBankingProduct> {
        self.ctx.authorize(actor, Permission::ManageIslamicBanking)?;
        let mut product = IslamicProductRepo::get_by_id(self.ctx.pool(), product_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::not_found("IslamicBankingProduct", product_id)
                } else {
                    BusinessError::from(e)
                }
            })?;
        apply(&mut product).map_err(BusinessError::from)?;
        IslamicProductRepo::update_flags(self.ctx.pool(), &product).await?;
        info!(actor = %actor.username, product = %product.name, action, "islamic product updated");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_context};
    use nvcbank_core::UserRole;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_product_lifecycle() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "omar", UserRole::BankOfficer).await;
        let customer = seed_user(&ctx, "cust", UserRole::Customer).await;
        let svc = IslamicBankingService::new(&ctx);

        let product = svc
            .create(&officer, "Home Musharakah", IslamicProductType::Musharaka, dec!(4.5), dec!(5000))
            .await
            .unwrap();
        assert!(!product.is_active);

        // Chưa duyệt thì chưa activate được
        let err = svc.activate(&officer, &product.id).await.unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_conflict());

        svc.approve(&officer, &product.id).await.unwrap();
        let active = svc.activate(&officer, &product.id).await.unwrap();
        assert!(active.is_active && active.sharia_board_approved);

        assert_eq!(svc.list(&customer, false).await.unwrap().len(), 1);
        svc.deactivate(&officer, &product.id).await.unwrap();
        assert!(svc.list(&customer, false).await.unwrap().is_empty());
        assert_eq!(svc.list(&officer, false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wadiah_cannot_carry_profit() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "omar", UserRole::BankOfficer).await;
        let err = IslamicBankingService::new(&ctx)
            .create(&officer, "Safe Keeping", IslamicProductType::Wadiah, dec!(2), dec!(0))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_invalid_input());
    }

    #[tokio::test]
    async fn test_customer_cannot_manage() {
        let (ctx, _dir) = test_context().await;
        let customer = seed_user(&ctx, "cust", UserRole::Customer).await;
        let err = IslamicBankingService::new(&ctx)
            .create(&customer, "Murabaha Auto", IslamicProductType::Murabaha, dec!(3), dec!(100))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_forbidden());
    }
}
