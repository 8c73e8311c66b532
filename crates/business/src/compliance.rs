//! Compliance frameworks - list, create, assess, retire

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use nvcbank_core::{ComplianceFramework, Permission, User};
use nvcbank_persistence::ComplianceFrameworkRepo;
use rust_decimal::Decimal;
use tracing::info;

pub struct ComplianceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ComplianceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<ComplianceFramework>> {
        self.ctx.authorize(actor, Permission::ViewCompliance)?;
        Ok(ComplianceFrameworkRepo::get_all(self.ctx.pool()).await?)
    }

    pub async fn create(
        &self,
        actor: &User,
        name: &str,
        code: &str,
        jurisdiction: &str,
        description: Option<&str>,
    ) -> BusinessResult<ComplianceFramework> {
        self.ctx.authorize(actor, Permission::ManageCompliance)?;

        let mut framework = ComplianceFramework::new(name, code, jurisdiction);
        if let Some(desc) = description {
            framework = framework.with_description(desc);
        }
        framework.validate().map_err(BusinessError::from)?;
        ComplianceFrameworkRepo::insert(self.ctx.pool(), &framework)
            .await
            .map_err(BusinessError::from)?;

        info!(actor = %actor.username, code = %framework.code, "compliance framework created");
        Ok(framework)
    }

    /// Ghi điểm đánh giá 0..=100; framework draft chuyển sang active
    pub async fn record_assessment(
        &self,
        actor: &User,
        framework_id: &str,
        score: Decimal,
    ) -> BusinessResult<ComplianceFramework> {
        self.ctx.authorize(actor, Permission::ManageCompliance)?;
        let mut framework = ComplianceFrameworkRepo::get_by_id(self.ctx.pool(), framework_id)
            .await
            .map_err(BusinessError::from)?;
        framework.record_assessment(score).map_err(BusinessError::from)?;
        ComplianceFrameworkRepo::update(self.ctx.pool(), &framework).await?;

        info!(actor = %actor.username, code = %framework.code, %score, "compliance assessment recorded");
        Ok(framework)
    }

    pub async fn retire(&self, actor: &User, framework_id: &str) -> BusinessResult<ComplianceFramework> {
        self.ctx.authorize(actor, Permission::ManageCompliance)?;
        let mut framework = ComplianceFrameworkRepo::get_by_id(self.ctx.pool(), framework_id)
            .await
            .map_err(BusinessError::from)?;
        framework.retire().map_err(BusinessError::from)?;
        ComplianceFrameworkRepo::update(self.ctx.pool(), &framework).await?;
        Ok(framework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_context};
    use nvcbank_core::{FrameworkStatus, UserRole};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_assess() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "cora", UserRole::ComplianceOfficer).await;
        let svc = ComplianceService::new(&ctx);

        let fw = svc
            .create(&officer, "FATF Recommendations", "fatf_40", "global", Some("AML/CFT"))
            .await
            .unwrap();
        assert_eq!(fw.status, FrameworkStatus::Draft);

        let assessed = svc.record_assessment(&officer, &fw.id, dec!(92)).await.unwrap();
        assert_eq!(assessed.status, FrameworkStatus::Active);
        assert_eq!(assessed.compliance_score, dec!(92));

        let err = svc.record_assessment(&officer, &fw.id, dec!(101)).await.unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_invalid_input());

        svc.retire(&officer, &fw.id).await.unwrap();
        let err = svc.record_assessment(&officer, &fw.id, dec!(50)).await.unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_conflict());
    }

    #[tokio::test]
    async fn test_permissions() {
        let (ctx, _dir) = test_context().await;
        let auditor = seed_user(&ctx, "audrey", UserRole::Auditor).await;
        let banker = seed_user(&ctx, "bank", UserRole::BankOfficer).await;
        let svc = ComplianceService::new(&ctx);

        assert!(svc.list(&auditor).await.unwrap().is_empty());
        assert!(svc.create(&auditor, "X", "XX", "GB", None).await.is_err());
        assert!(svc.list(&banker).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let (ctx, _dir) = test_context().await;
        let admin = seed_user(&ctx, "root", UserRole::SuperAdmin).await;
        let svc = ComplianceService::new(&ctx);
        svc.create(&admin, "Basel III", "BASEL_III", "GLOBAL", None).await.unwrap();
        let err = svc
            .create(&admin, "Basel III again", "basel_iii", "GLOBAL", None)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_conflict());
    }
}
