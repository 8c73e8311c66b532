//! Sovereign debt portfolios - list, create, summary

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use chrono::NaiveDate;
use nvcbank_core::validation::{checked_add, checked_mul};
use nvcbank_core::{
    CoreResult, DebtInstrument, DebtStatus, Permission, SovereignDebtPortfolio, User,
};
use nvcbank_persistence::SovereignDebtRepo;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Thông tin tạo portfolio mới
#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub country: String,
    pub instrument: DebtInstrument,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub currency: String,
    pub maturity_date: NaiveDate,
    pub credit_rating: String,
}

/// Tổng hợp danh mục nợ còn dư nợ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SovereignSummary {
    pub portfolios: usize,
    pub outstanding: usize,
    pub total_principal_by_currency: BTreeMap<String, Decimal>,
    /// Lãi suất bình quân gia quyền theo principal
    pub weighted_average_rate: Option<Decimal>,
    pub maturing_within_days: i64,
    pub maturing_count: usize,
    pub by_country: BTreeMap<String, usize>,
}

/// Tính summary tại ngày `today`; lỗi nếu tổng principal tràn số
pub fn summarize(
    portfolios: &[SovereignDebtPortfolio],
    today: NaiveDate,
    within_days: i64,
) -> CoreResult<SovereignSummary> {
    let outstanding: Vec<&SovereignDebtPortfolio> = portfolios
        .iter()
        .filter(|p| p.status.is_outstanding())
        .collect();

    let mut total_principal_by_currency: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut by_country: BTreeMap<String, usize> = BTreeMap::new();
    let mut principal_sum = Decimal::ZERO;
    let mut weighted = Decimal::ZERO;
    for p in &outstanding {
        let total = total_principal_by_currency.entry(p.currency.clone()).or_default();
        *total = checked_add("total_principal", *total, p.principal)?;
        *by_country.entry(p.country.clone()).or_default() += 1;
        principal_sum = checked_add("total_principal", principal_sum, p.principal)?;
        let rate_weight = checked_mul("weighted_rate", p.principal, p.interest_rate)?;
        weighted = checked_add("weighted_rate", weighted, rate_weight)?;
    }

    let weighted_average_rate = if principal_sum.is_zero() {
        None
    } else {
        Some((weighted / principal_sum).round_dp(4))
    };

    let maturing_count = outstanding
        .iter()
        .filter(|p| {
            let days = p.days_to_maturity(today);
            (0..=within_days).contains(&days)
        })
        .count();

    Ok(SovereignSummary {
        portfolios: portfolios.len(),
        outstanding: outstanding.len(),
        total_principal_by_currency,
        weighted_average_rate,
        maturing_within_days: within_days,
        maturing_count,
        by_country,
    })
}

pub struct SovereignService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SovereignService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<SovereignDebtPortfolio>> {
        self.ctx.authorize(actor, Permission::ViewSovereign)?;
        Ok(SovereignDebtRepo::get_all(self.ctx.pool()).await?)
    }

    pub async fn create(
        &self,
        actor: &User,
        new: NewPortfolio,
    ) -> BusinessResult<SovereignDebtPortfolio> {
        self.ctx.authorize(actor, Permission::ManageSovereign)?;

        let portfolio = SovereignDebtPortfolio::new(
            &new.country,
            new.instrument,
            new.principal,
            new.interest_rate,
            &new.currency,
            new.maturity_date,
            &new.credit_rating,
        );
        portfolio.validate().map_err(BusinessError::from)?;
        SovereignDebtRepo::insert(self.ctx.pool(), &portfolio)
            .await
            .map_err(BusinessError::from)?;

        info!(
            actor = %actor.username,
            country = %portfolio.country,
            principal = %portfolio.principal,
            "sovereign portfolio created"
        );
        Ok(portfolio)
    }

    pub async fn update_status(
        &self,
        actor: &User,
        portfolio_id: &str,
        status: DebtStatus,
    ) -> BusinessResult<SovereignDebtPortfolio> {
        self.ctx.authorize(actor, Permission::ManageSovereign)?;
        SovereignDebtRepo::update_status(self.ctx.pool(), portfolio_id, status)
            .await
            .map_err(BusinessError::from)?;
        Ok(SovereignDebtRepo::get_by_id(self.ctx.pool(), portfolio_id).await?)
    }

    pub async fn summary(
        &self,
        actor: &User,
        today: NaiveDate,
        within_days: i64,
    ) -> BusinessResult<SovereignSummary> {
        let portfolios = self.list(actor).await?;
        let summary = summarize(&portfolios, today, within_days).map_err(BusinessError::from)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_context};
    use nvcbank_core::UserRole;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_portfolio(country: &str, principal: Decimal, rate: Decimal, maturity: NaiveDate) -> NewPortfolio {
        NewPortfolio {
            country: country.to_string(),
            instrument: DebtInstrument::Bond,
            principal,
            interest_rate: rate,
            currency: "USD".to_string(),
            maturity_date: maturity,
            credit_rating: "BB".to_string(),
        }
    }

    #[tokio::test]
    async fn test_summary() {
        let (ctx, _dir) = test_context().await;
        let banker = seed_user(&ctx, "sam", UserRole::SovereignBanker).await;
        let svc = SovereignService::new(&ctx);

        svc.create(&banker, new_portfolio("GH", dec!(1000), dec!(10), date(2026, 3, 1)))
            .await
            .unwrap();
        svc.create(&banker, new_portfolio("KE", dec!(3000), dec!(6), date(2030, 1, 1)))
            .await
            .unwrap();
        let matured = svc
            .create(&banker, new_portfolio("NG", dec!(5000), dec!(12), date(2025, 1, 1)))
            .await
            .unwrap();
        svc.update_status(&banker, &matured.id, DebtStatus::Matured).await.unwrap();

        let summary = svc.summary(&banker, date(2026, 1, 1), 90).await.unwrap();
        assert_eq!(summary.portfolios, 3);
        assert_eq!(summary.outstanding, 2);
        assert_eq!(summary.total_principal_by_currency["USD"], dec!(4000));
        // (1000*10 + 3000*6) / 4000 = 7
        assert_eq!(summary.weighted_average_rate, Some(dec!(7)));
        assert_eq!(summary.maturing_count, 1);
        assert!(!summary.by_country.contains_key("NG"));
    }

    #[tokio::test]
    async fn test_empty_summary_and_permissions() {
        let (ctx, _dir) = test_context().await;
        let treasurer = seed_user(&ctx, "tess", UserRole::TreasuryOfficer).await;
        let customer = seed_user(&ctx, "cust", UserRole::Customer).await;
        let svc = SovereignService::new(&ctx);

        let summary = svc.summary(&treasurer, date(2026, 1, 1), 30).await.unwrap();
        assert_eq!(summary.weighted_average_rate, None);
        assert!(svc
            .create(&treasurer, new_portfolio("GH", dec!(1), dec!(1), date(2027, 1, 1)))
            .await
            .is_err());
        assert!(svc.list(&customer).await.is_err());
    }

    #[test]
    fn test_summarize_overflow_is_an_error() {
        let huge = |country: &str| {
            SovereignDebtPortfolio::new(
                country,
                DebtInstrument::Bond,
                dec!(50000000000000000000000000000),
                dec!(1),
                "USD",
                date(2030, 1, 1),
                "BB",
            )
        };
        let err = summarize(&[huge("GH"), huge("KE")], date(2026, 1, 1), 30).unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_oversized_principal_rejected() {
        let (ctx, _dir) = test_context().await;
        let banker = seed_user(&ctx, "sam", UserRole::SovereignBanker).await;
        let svc = SovereignService::new(&ctx);
        let err = svc
            .create(
                &banker,
                new_portfolio("GH", dec!(50000000000000000000000000000), dec!(5), date(2030, 1, 1)),
            )
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_invalid_input());
        assert!(svc.list(&banker).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_portfolio_rejected() {
        let (ctx, _dir) = test_context().await;
        let banker = seed_user(&ctx, "sam", UserRole::SovereignBanker).await;
        let err = SovereignService::new(&ctx)
            .create(&banker, new_portfolio("GHANA", dec!(1000), dec!(5), date(2030, 1, 1)))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_invalid_input());
    }
}
