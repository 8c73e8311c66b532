//! Account operations - list, open, freeze, unfreeze, close

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use anyhow::Context;
use chrono::Utc;
use nvcbank_core::{AccountType, BankAccount, Permission, User, UserRole};
use nvcbank_persistence::{BankAccountRepo, UserRepo};
use tracing::info;

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Customer chỉ thấy tài khoản của mình; staff thấy tất cả
    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<BankAccount>> {
        self.ctx.authorize(actor, Permission::ViewAccounts)?;
        let accounts = if actor.role == UserRole::Customer {
            BankAccountRepo::get_by_owner(self.ctx.pool(), &actor.id).await?
        } else {
            BankAccountRepo::get_all(self.ctx.pool()).await?
        };
        Ok(accounts)
    }

    pub async fn get(&self, actor: &User, account_id: &str) -> BusinessResult<BankAccount> {
        self.ctx.authorize(actor, Permission::ViewAccounts)?;
        let account = self.load(account_id).await?;
        if actor.role == UserRole::Customer && account.owner_id != actor.id {
            // Không tiết lộ sự tồn tại của tài khoản người khác
            return Err(BusinessError::not_found("BankAccount", account_id).into());
        }
        Ok(account)
    }

    pub async fn open(
        &self,
        actor: &User,
        owner_id: &str,
        account_type: AccountType,
        currency: &str,
    ) -> BusinessResult<BankAccount> {
        self.ctx.authorize(actor, Permission::ManageAccounts)?;

        let owner = UserRepo::get_by_id(self.ctx.pool(), owner_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::not_found("User", owner_id)
                } else {
                    BusinessError::from(e)
                }
            })?;
        if !owner.is_active {
            return Err(BusinessError::rule(format!(
                "cannot open an account for inactive user {}",
                owner.username
            ))
            .into());
        }

        let account = BankAccount::open(&owner.id, account_type, currency);
        account.validate().map_err(BusinessError::from)?;
        BankAccountRepo::insert(self.ctx.pool(), &account)
            .await
            .context("Failed to insert bank account")?;

        info!(
            actor = %actor.username,
            account = %account.account_number,
            owner = %owner.username,
            "account opened"
        );
        Ok(account)
    }

    pub async fn freeze(&self, actor: &User, account_id: &str) -> BusinessResult<BankAccount> {
        self.change_status(actor, account_id, "freeze", BankAccount::freeze)
            .await
    }

    pub async fn unfreeze(&self, actor: &User, account_id: &str) -> BusinessResult<BankAccount> {
        self.change_status(actor, account_id, "unfreeze", BankAccount::unfreeze)
            .await
    }

    /// Đóng tài khoản - số dư phải bằng 0
    pub async fn close(&self, actor: &User, account_id: &str) -> BusinessResult<BankAccount> {
        self.change_status(actor, account_id, "close", BankAccount::close)
            .await
    }

    async fn change_status(
        &self,
        actor: &User,
        account_id: &str,
        action: &str,
        apply: fn(&mut BankAccount) -> nvcbank_core::CoreResult<()>,
    ) -> BusinessResult<BankAccount> {
        self.ctx.authorize(actor, Permission::ManageAccounts)?;
        let current = self.load(account_id).await?;
        let mut account = current.clone();
        apply(&mut account).map_err(BusinessError::from)?;
        account.updated_at = Utc::now();
        let written =
            BankAccountRepo::update_status(self.ctx.pool(), &current, account.status, account.updated_at)
                .await?;
        if !written {
            return Err(BusinessError::rule(format!(
                "account {} was modified concurrently, reload and retry",
                account.account_number
            ))
            .into());
        }
        info!(actor = %actor.username, account = %account.account_number, action, "account status changed");
        Ok(account)
    }

    async fn load(&self, account_id: &str) -> BusinessResult<BankAccount> {
        BankAccountRepo::get_by_id(self.ctx.pool(), account_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::not_found("BankAccount", account_id)
                } else {
                    BusinessError::from(e)
                }
            })
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_user, test_context};
    use nvcbank_core::AccountStatus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_customer_sees_only_own_accounts() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "officer", UserRole::BankOfficer).await;
        let alice = seed_user(&ctx, "alice", UserRole::Customer).await;
        let bob = seed_user(&ctx, "bob", UserRole::Customer).await;

        let svc = AccountService::new(&ctx);
        let alice_acc = svc.open(&officer, &alice.id, AccountType::Savings, "usd").await.unwrap();
        let bob_acc = svc.open(&officer, &bob.id, AccountType::Checking, "EUR").await.unwrap();

        let mine = svc.list(&alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, alice_acc.id);
        assert_eq!(svc.list(&officer).await.unwrap().len(), 2);

        assert!(svc.get(&alice, &alice_acc.id).await.is_ok());
        let err = svc.get(&alice, &bob_acc.id).await.unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_customer_cannot_open_accounts() {
        let (ctx, _dir) = test_context().await;
        let alice = seed_user(&ctx, "alice", UserRole::Customer).await;
        let err = AccountService::new(&ctx)
            .open(&alice, &alice.id, AccountType::Savings, "USD")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_forbidden());
    }

    #[tokio::test]
    async fn test_status_lifecycle() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "officer", UserRole::BankOfficer).await;
        let alice = seed_user(&ctx, "alice", UserRole::Customer).await;
        let svc = AccountService::new(&ctx);
        let account = svc.open(&officer, &alice.id, AccountType::Savings, "USD").await.unwrap();

        let frozen = svc.freeze(&officer, &account.id).await.unwrap();
        assert_eq!(frozen.status, AccountStatus::Frozen);
        assert!(svc.freeze(&officer, &account.id).await.is_err());
        svc.unfreeze(&officer, &account.id).await.unwrap();

        // Số dư khác 0 không đóng được
        let mut funded = BankAccountRepo::get_by_id(ctx.pool(), &account.id).await.unwrap();
        funded.balance = dec!(10);
        BankAccountRepo::update(ctx.pool(), &funded).await.unwrap();
        let err = svc.close(&officer, &account.id).await.unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_invalid_input());

        funded.balance = dec!(0);
        BankAccountRepo::update(ctx.pool(), &funded).await.unwrap();
        let closed = svc.close(&officer, &account.id).await.unwrap();
        assert_eq!(closed.status, AccountStatus::Closed);
    }

    #[tokio::test]
    async fn test_freeze_keeps_balance() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "officer", UserRole::BankOfficer).await;
        let alice = seed_user(&ctx, "alice", UserRole::Customer).await;
        let svc = AccountService::new(&ctx);
        let account = svc.open(&officer, &alice.id, AccountType::Checking, "USD").await.unwrap();

        let mut funded = BankAccountRepo::get_by_id(ctx.pool(), &account.id).await.unwrap();
        funded.balance = dec!(250.75);
        BankAccountRepo::update(ctx.pool(), &funded).await.unwrap();

        let frozen = svc.freeze(&officer, &account.id).await.unwrap();
        assert_eq!(frozen.balance, dec!(250.75));
        let stored = BankAccountRepo::get_by_id(ctx.pool(), &account.id).await.unwrap();
        assert_eq!(stored.status, AccountStatus::Frozen);
        assert_eq!(stored.balance, dec!(250.75));
    }

    #[tokio::test]
    async fn test_open_with_broken_users_table_is_not_a_404() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "officer", UserRole::BankOfficer).await;
        sqlx::query("DROP TABLE users").execute(ctx.pool()).await.unwrap();

        let err = AccountService::new(&ctx)
            .open(&officer, "ghost", AccountType::Savings, "USD")
            .await
            .unwrap_err();
        let err = err.downcast_ref::<BusinessError>().unwrap();
        assert!(!err.is_not_found());
        assert!(matches!(err, BusinessError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_open_for_unknown_owner() {
        let (ctx, _dir) = test_context().await;
        let officer = seed_user(&ctx, "officer", UserRole::BankOfficer).await;
        let err = AccountService::new(&ctx)
            .open(&officer, "ghost", AccountType::Savings, "USD")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<BusinessError>().unwrap().is_not_found());
    }
}
