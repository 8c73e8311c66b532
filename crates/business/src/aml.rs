//! AML screening and case review
//!
//! Giao dịch được chấm điểm theo flags; compliance officer xử lý hàng đợi
//! theo luồng pending → under_review → cleared/escalated → reported.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use nvcbank_core::{AmlFlag, AmlStatus, AmlTransaction, Permission, User};
use nvcbank_persistence::AmlTransactionRepo;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// AML thresholds for detection
#[derive(Debug, Clone)]
pub struct AmlThresholds {
    /// Amount threshold for "large_amount" flag
    pub large_amount: Decimal,
    /// Structuring band
    pub near_threshold_min: Decimal,
    pub near_threshold_max: Decimal,
    /// High-risk countries (ISO codes)
    pub high_risk_countries: Vec<String>,
    /// Counterparties trên danh sách trừng phạt
    pub sanctioned_counterparties: Vec<String>,
}

impl Default for AmlThresholds {
    fn default() -> Self {
        Self {
            large_amount: Decimal::new(10000, 0), // $10,000
            near_threshold_min: Decimal::new(9000, 0),
            near_threshold_max: Decimal::new(9999, 0),
            high_risk_countries: vec![
                "KP".to_string(), // North Korea
                "IR".to_string(), // Iran
                "SY".to_string(), // Syria
                "CU".to_string(), // Cuba
            ],
            sanctioned_counterparties: Vec::new(),
        }
    }
}

/// Dữ liệu giao dịch cần sàng lọc
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub transaction_ref: String,
    pub account_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub counterparty: String,
    pub country: String,
    /// Quốc gia của ngân hàng; khác `country` là giao dịch xuyên biên giới
    pub home_country: String,
}

pub struct AmlService<'a> {
    ctx: &'a ServiceContext,
    thresholds: AmlThresholds,
}

impl<'a> AmlService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            thresholds: AmlThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: AmlThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Flags cho một giao dịch
    pub fn check_aml_flags(&self, req: &ScreeningRequest) -> Vec<AmlFlag> {
        let t = &self.thresholds;
        let mut flags = Vec::new();

        if req.amount >= t.large_amount {
            flags.push(AmlFlag::LargeAmount);
        }
        if req.amount >= t.near_threshold_min && req.amount <= t.near_threshold_max {
            flags.push(AmlFlag::NearThreshold);
        }

        let country = req.country.to_uppercase();
        if !req.home_country.is_empty() && !country.eq_ignore_ascii_case(&req.home_country) {
            flags.push(AmlFlag::CrossBorder);
        }
        if t.high_risk_countries.iter().any(|c| *c == country) {
            flags.push(AmlFlag::HighRiskCountry);
        }
        if t
            .sanctioned_counterparties
            .iter()
            .any(|c| c.eq_ignore_ascii_case(req.counterparty.trim()))
        {
            flags.push(AmlFlag::SanctionedCounterparty);
        }
        // Số tròn nghìn thường gặp trong structuring
        if req.amount >= Decimal::new(1000, 0) && (req.amount % Decimal::new(1000, 0)).is_zero() {
            flags.push(AmlFlag::RoundAmount);
        }

        flags
    }

    /// Sàng lọc và lưu giao dịch vào hàng đợi AML
    pub async fn screen(&self, actor: &User, req: ScreeningRequest) -> BusinessResult<AmlTransaction> {
        self.ctx.authorize(actor, Permission::ReviewAml)?;

        let flags = self.check_aml_flags(&req);
        let tx = AmlTransaction::new(
            &req.transaction_ref,
            &req.account_id,
            req.amount,
            &req.currency,
            &req.counterparty,
            &req.country,
        )
        .with_flags(flags);
        tx.validate().map_err(BusinessError::from)?;

        AmlTransactionRepo::insert(self.ctx.pool(), &tx)
            .await
            .map_err(BusinessError::from)?;

        if tx.flags.is_empty() {
            info!(tx_ref = %tx.transaction_ref, "transaction screened clean");
        } else {
            warn!(
                tx_ref = %tx.transaction_ref,
                score = tx.risk_score,
                level = %tx.risk_level,
                "transaction flagged for AML review"
            );
        }
        Ok(tx)
    }

    /// Danh sách theo trạng thái; None = tất cả
    pub async fn list(
        &self,
        actor: &User,
        status: Option<AmlStatus>,
    ) -> BusinessResult<Vec<AmlTransaction>> {
        self.ctx.authorize(actor, Permission::ViewAml)?;
        let pool = self.ctx.pool();
        let list = match status {
            Some(status) => AmlTransactionRepo::get_by_status(pool, status).await?,
            None => AmlTransactionRepo::get_all(pool).await?,
        };
        Ok(list)
    }

    /// Chuyển trạng thái case, cần `review_aml`
    pub async fn transition(
        &self,
        actor: &User,
        aml_id: &str,
        to: AmlStatus,
        notes: Option<&str>,
    ) -> BusinessResult<AmlTransaction> {
        self.ctx.authorize(actor, Permission::ReviewAml)?;

        let mut tx = AmlTransactionRepo::get_by_id(self.ctx.pool(), aml_id)
            .await
            .map_err(BusinessError::from)?;
        let from = tx.status;
        tx.transition(to, &actor.id, notes).map_err(BusinessError::from)?;
        AmlTransactionRepo::update_review(self.ctx.pool(), &tx).await?;

        info!(
            reviewer = %actor.username,
            tx_ref = %tx.transaction_ref,
            %from,
            to = %tx.status,
            "AML case updated"
        );
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_context};
    use nvcbank_core::{RiskLevel, UserRole};
    use rust_decimal_macros::dec;

    fn request(tx_ref: &str, amount: Decimal, country: &str) -> ScreeningRequest {
        ScreeningRequest {
            transaction_ref: tx_ref.to_string(),
            account_id: "acc-1".to_string(),
            amount,
            currency: "USD".to_string(),
            counterparty: "Orion Trading".to_string(),
            country: country.to_string(),
            home_country: "US".to_string(),
        }
    }

    #[tokio::test]
    async fn test_flag_detection() {
        let (ctx, _dir) = test_context().await;
        let svc = AmlService::new(&ctx);

        assert!(svc.check_aml_flags(&request("a", dec!(250.10), "US")).is_empty());
        assert_eq!(
            svc.check_aml_flags(&request("b", dec!(9500.50), "US")),
            vec![AmlFlag::NearThreshold]
        );
        assert_eq!(
            svc.check_aml_flags(&request("c", dec!(15000), "IR")),
            vec![
                AmlFlag::LargeAmount,
                AmlFlag::CrossBorder,
                AmlFlag::HighRiskCountry,
                AmlFlag::RoundAmount
            ]
        );

        let svc = AmlService::new(&ctx).with_thresholds(AmlThresholds {
            sanctioned_counterparties: vec!["orion trading".to_string()],
            ..AmlThresholds::default()
        });
        assert!(svc
            .check_aml_flags(&request("d", dec!(10.5), "US"))
            .contains(&AmlFlag::SanctionedCounterparty));
    }

    #[tokio::test]
    async fn test_screen_and_review_flow() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "cora", UserRole::ComplianceOfficer).await;
        let svc = AmlService::new(&ctx);

        let tx = svc.screen(&officer, request("TX-9", dec!(15000), "IR")).await.unwrap();
        assert_eq!(tx.risk_score, 85);
        assert_eq!(tx.risk_level, RiskLevel::Critical);

        // Rủi ro cao không được clear trực tiếp
        let err = svc
            .transition(&officer, &tx.id, AmlStatus::Cleared, None)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_conflict());

        svc.transition(&officer, &tx.id, AmlStatus::UnderReview, None).await.unwrap();
        svc.transition(&officer, &tx.id, AmlStatus::Escalated, Some("source of funds unclear"))
            .await
            .unwrap();
        let reported = svc
            .transition(&officer, &tx.id, AmlStatus::Reported, None)
            .await
            .unwrap();
        assert_eq!(reported.status, AmlStatus::Reported);
        assert_eq!(reported.reviewed_by.as_deref(), Some(officer.id.as_str()));
        assert_eq!(reported.notes.as_deref(), Some("source of funds unclear"));

        assert_eq!(svc.list(&officer, Some(AmlStatus::Reported)).await.unwrap().len(), 1);
        assert!(svc.list(&officer, Some(AmlStatus::Pending)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auditor_can_view_but_not_review() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "cora", UserRole::ComplianceOfficer).await;
        let auditor = seed_user(&ctx, "audrey", UserRole::Auditor).await;
        let svc = AmlService::new(&ctx);

        let tx = svc.screen(&officer, request("TX-1", dec!(100), "US")).await.unwrap();
        assert_eq!(svc.list(&auditor, None).await.unwrap().len(), 1);

        let err = svc
            .transition(&auditor, &tx.id, AmlStatus::Cleared, None)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_forbidden());

        // Sàng lọc ghi vào hàng đợi, auditor chỉ được xem
        let err = svc
            .screen(&auditor, request("TX-2", dec!(100), "US"))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_forbidden());
        assert_eq!(svc.list(&auditor, None).await.unwrap().len(), 1);
    }
}
