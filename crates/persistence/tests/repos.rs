//! Repository tests trên SQLite in-memory

use chrono::{NaiveDate, Utc};
use nvcbank_core::{
    AccountStatus, AccountType, AmlFlag, AmlStatus, AmlTransaction, BankAccount,
    ComplianceFramework, DebtInstrument, DebtStatus, IslamicBankingProduct, IslamicProductType,
    NvctSupply, SovereignDebtPortfolio, User, UserRole,
};
use nvcbank_persistence::*;
use rust_decimal_macros::dec;
use sqlx::SqlitePool;

async fn setup() -> SqlitePool {
    let pool = create_memory_pool().await.unwrap();
    create_schema(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_user_roundtrip_and_duplicates() {
    let pool = setup().await;
    let user = User::new("alice.admin", "Alice@NVCBank.com", UserRole::Admin);
    UserRepo::insert(&pool, &user).await.unwrap();

    let loaded = UserRepo::get_by_id(&pool, &user.id).await.unwrap();
    assert_eq!(loaded.username, "alice.admin");
    assert_eq!(loaded.email, "alice@nvcbank.com");
    assert_eq!(loaded.role, UserRole::Admin);
    assert!(loaded.is_active);

    let by_name = UserRepo::get_by_username(&pool, "alice.admin").await.unwrap();
    assert_eq!(by_name.id, user.id);

    let dup = User::new("alice.admin", "other@nvcbank.com", UserRole::Customer);
    let err = UserRepo::insert(&pool, &dup).await.unwrap_err();
    assert!(err.is_already_exists());

    assert!(UserRepo::get_by_id(&pool, "missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_user_updates_and_counts() {
    let pool = setup().await;
    let root = User::new("root", "root@nvcbank.com", UserRole::SuperAdmin);
    let bob = User::new("bob", "bob@nvcbank.com", UserRole::Customer);
    UserRepo::insert(&pool, &root).await.unwrap();
    UserRepo::insert(&pool, &bob).await.unwrap();

    assert_eq!(UserRepo::count(&pool).await.unwrap(), 2);
    assert_eq!(
        UserRepo::count_active_by_role(&pool, UserRole::SuperAdmin).await.unwrap(),
        1
    );

    assert!(UserRepo::update_role_keeping_super_admin(&pool, &bob.id, UserRole::SupportAgent)
        .await
        .unwrap());
    assert!(UserRepo::deactivate_keeping_super_admin(&pool, &bob.id).await.unwrap());
    UserRepo::record_login(&pool, &root.id, Utc::now()).await.unwrap();

    let bob = UserRepo::get_by_id(&pool, &bob.id).await.unwrap();
    assert_eq!(bob.role, UserRole::SupportAgent);
    assert!(!bob.is_active);
    assert!(UserRepo::get_by_id(&pool, &root.id).await.unwrap().last_login.is_some());

    assert!(UserRepo::set_active(&pool, "nope", true).await.unwrap_err().is_not_found());

    // root là super admin active duy nhất
    assert!(!UserRepo::update_role_keeping_super_admin(&pool, &root.id, UserRole::Admin)
        .await
        .unwrap());
    assert!(!UserRepo::deactivate_keeping_super_admin(&pool, &root.id).await.unwrap());
    assert_eq!(
        UserRepo::count_active_by_role(&pool, UserRole::SuperAdmin).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_unknown_role_in_database_is_rejected() {
    let pool = setup().await;
    sqlx::query(
        "INSERT INTO users (id, username, email, role, is_active, created_at) \
         VALUES ('u-x', 'legacy', 'legacy@nvcbank.com', 'wizard', 1, ?)",
    )
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    let err = UserRepo::get_by_id(&pool, "u-x").await.unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidEnumValue { .. }));
}

#[tokio::test]
async fn test_bank_accounts() {
    let pool = setup().await;
    let owner = User::new("carol", "carol@nvcbank.com", UserRole::Customer);
    UserRepo::insert(&pool, &owner).await.unwrap();

    let mut account = BankAccount::open(&owner.id, AccountType::Savings, "usd");
    BankAccountRepo::insert(&pool, &account).await.unwrap();
    BankAccountRepo::insert(&pool, &BankAccount::open("someone-else", AccountType::Checking, "EUR"))
        .await
        .unwrap();

    let mine = BankAccountRepo::get_by_owner(&pool, &owner.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].currency, "USD");
    assert_eq!(mine[0].balance, dec!(0));

    account.balance = dec!(250.75);
    account.freeze().unwrap();
    BankAccountRepo::update(&pool, &account).await.unwrap();

    let loaded = BankAccountRepo::get_by_id(&pool, &account.id).await.unwrap();
    assert_eq!(loaded.balance, dec!(250.75));
    assert_eq!(loaded.status, AccountStatus::Frozen);
    assert_eq!(
        BankAccountRepo::count_by_status(&pool, AccountStatus::Active).await.unwrap(),
        1
    );
    assert_eq!(BankAccountRepo::get_all(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_bank_account_status_update_is_conditional() {
    let pool = setup().await;
    let account = BankAccount::open("owner-1", AccountType::Checking, "USD");
    BankAccountRepo::insert(&pool, &account).await.unwrap();

    // số dư đổi sau khi snapshot được đọc
    let snapshot = BankAccountRepo::get_by_id(&pool, &account.id).await.unwrap();
    let mut funded = snapshot.clone();
    funded.balance = dec!(40);
    BankAccountRepo::update(&pool, &funded).await.unwrap();

    let written = BankAccountRepo::update_status(&pool, &snapshot, AccountStatus::Closed, Utc::now())
        .await
        .unwrap();
    assert!(!written);

    let current = BankAccountRepo::get_by_id(&pool, &account.id).await.unwrap();
    let written = BankAccountRepo::update_status(&pool, &current, AccountStatus::Frozen, Utc::now())
        .await
        .unwrap();
    assert!(written);

    let loaded = BankAccountRepo::get_by_id(&pool, &account.id).await.unwrap();
    assert_eq!(loaded.status, AccountStatus::Frozen);
    assert_eq!(loaded.balance, dec!(40));
}

#[tokio::test]
async fn test_compliance_frameworks() {
    let pool = setup().await;
    let mut framework = ComplianceFramework::new("Basel III", "basel_iii", "global")
        .with_description("Capital adequacy");
    ComplianceFrameworkRepo::insert(&pool, &framework).await.unwrap();

    framework.record_assessment(dec!(87.5)).unwrap();
    ComplianceFrameworkRepo::update(&pool, &framework).await.unwrap();

    let all = ComplianceFrameworkRepo::get_all(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].code, "BASEL_III");
    assert_eq!(all[0].compliance_score, dec!(87.5));
    assert!(all[0].last_assessed.is_some());

    let dup = ComplianceFramework::new("Basel again", "BASEL_III", "GLOBAL");
    assert!(ComplianceFrameworkRepo::insert(&pool, &dup)
        .await
        .unwrap_err()
        .is_already_exists());
}

#[tokio::test]
async fn test_aml_transactions() {
    let pool = setup().await;
    let flagged = AmlTransaction::new("TX-1", "acc-1", dec!(15000), "USD", "Orion", "IR")
        .with_flags(vec![AmlFlag::LargeAmount, AmlFlag::HighRiskCountry]);
    let clean = AmlTransaction::new("TX-2", "acc-1", dec!(120), "USD", "Grocer", "GB");
    AmlTransactionRepo::insert(&pool, &flagged).await.unwrap();
    AmlTransactionRepo::insert(&pool, &clean).await.unwrap();

    let pending = AmlTransactionRepo::get_by_status(&pool, AmlStatus::Pending).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].transaction_ref, "TX-1");
    assert_eq!(pending[0].flags, vec![AmlFlag::LargeAmount, AmlFlag::HighRiskCountry]);
    assert_eq!(pending[0].risk_score, 70);

    let mut tx = pending[1].clone();
    tx.transition(AmlStatus::Cleared, "officer-1", Some("routine")).unwrap();
    AmlTransactionRepo::update_review(&pool, &tx).await.unwrap();

    let loaded = AmlTransactionRepo::get_by_id(&pool, &tx.id).await.unwrap();
    assert_eq!(loaded.status, AmlStatus::Cleared);
    assert_eq!(loaded.reviewed_by.as_deref(), Some("officer-1"));
    assert_eq!(AmlTransactionRepo::count_open(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_nvct_supply_singleton() {
    let pool = setup().await;
    assert!(NvctSupplyRepo::get(&pool).await.unwrap().is_none());

    let genesis = NvctSupply::genesis(dec!(1000000));
    NvctSupplyRepo::init(&pool, &genesis).await.unwrap();

    let mut supply = genesis.clone();
    supply.mint(dec!(500), dec!(500), dec!(1)).unwrap();
    assert!(NvctSupplyRepo::compare_and_swap(&pool, &genesis, &supply).await.unwrap());

    let loaded = NvctSupplyRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(loaded.circulating_supply, dec!(500));
    assert_eq!(loaded.reserve_balance, dec!(500));
    assert_eq!(loaded.max_supply, dec!(1000000));
}

#[tokio::test]
async fn test_nvct_supply_compare_and_swap() {
    let pool = setup().await;
    let genesis = NvctSupply::genesis(dec!(1000));
    NvctSupplyRepo::init(&pool, &genesis).await.unwrap();
    // init lần hai không ghi đè
    NvctSupplyRepo::init(&pool, &NvctSupply::genesis(dec!(5))).await.unwrap();
    let current = NvctSupplyRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(current.max_supply, dec!(1000));

    let mut first = current.clone();
    first.mint(dec!(10), dec!(10), dec!(1)).unwrap();
    assert!(NvctSupplyRepo::compare_and_swap(&pool, &current, &first).await.unwrap());

    // bản đọc cũ không còn khớp
    let mut stale = current.clone();
    stale.mint(dec!(20), dec!(20), dec!(1)).unwrap();
    assert!(!NvctSupplyRepo::compare_and_swap(&pool, &current, &stale).await.unwrap());

    let loaded = NvctSupplyRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(loaded.circulating_supply, dec!(10));
    assert_eq!(loaded.reserve_balance, dec!(10));
}

#[tokio::test]
async fn test_sovereign_and_islamic() {
    let pool = setup().await;
    let portfolio = SovereignDebtPortfolio::new(
        "GH",
        DebtInstrument::Bond,
        dec!(5000000),
        dec!(7.25),
        "USD",
        NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        "B-",
    );
    SovereignDebtRepo::insert(&pool, &portfolio).await.unwrap();
    SovereignDebtRepo::update_status(&pool, &portfolio.id, DebtStatus::Restructured)
        .await
        .unwrap();
    let loaded = SovereignDebtRepo::get_by_id(&pool, &portfolio.id).await.unwrap();
    assert_eq!(loaded.status, DebtStatus::Restructured);
    assert_eq!(loaded.maturity_date, portfolio.maturity_date);
    assert_eq!(loaded.interest_rate, dec!(7.25));

    let mut product =
        IslamicBankingProduct::new("Home Ijara", IslamicProductType::Ijara, dec!(5.5), dec!(1000));
    IslamicProductRepo::insert(&pool, &product).await.unwrap();
    assert!(IslamicProductRepo::get_all(&pool, true).await.unwrap().is_empty());

    product.approve();
    product.activate().unwrap();
    IslamicProductRepo::update_flags(&pool, &product).await.unwrap();
    let active = IslamicProductRepo::get_all(&pool, true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].sharia_board_approved);
}
