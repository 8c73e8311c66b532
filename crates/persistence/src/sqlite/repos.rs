//! Repository implementations cho SQLite
//!
//! CRUD operations cho tất cả các tables. Repos trả về domain types,
//! chuyển đổi qua `TryFrom<Row>` trong [`schema`](super::schema).

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::{DateTime, Utc};
use nvcbank_core::{
    AccountStatus, AmlStatus, AmlTransaction, BankAccount, ComplianceFramework, DebtStatus,
    IslamicBankingProduct, NvctSupply, SovereignDebtPortfolio, User, UserRole,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

fn ensure_affected(rows: u64, entity: &str, id: &str) -> PersistenceResult<()> {
    if rows == 0 {
        return Err(PersistenceError::not_found(entity, id));
    }
    Ok(())
}

// ============================================================================
// User Repository
// ============================================================================

/// Repository cho users table
pub struct UserRepo;

/// Row không phải super admin active, hoặc còn super admin active khác
const LAST_SUPER_ADMIN_GUARD: &str = "NOT (role = ? AND is_active = 1 AND \
     (SELECT COUNT(*) FROM users WHERE role = ? AND is_active = 1) <= 1)";

impl UserRepo {
    /// Lấy user theo ID
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", id))?
            .try_into()
    }

    /// Lấy user theo username
    pub async fn get_by_username(pool: &SqlitePool, username: &str) -> PersistenceResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", username))?
            .try_into()
    }

    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY username")
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Thêm user mới
    pub async fn insert(pool: &SqlitePool, user: &User) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, email, role, is_active, created_at, last_login) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.last_login)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "User", &user.username))?;
        Ok(())
    }

    pub async fn set_active(pool: &SqlitePool, id: &str, is_active: bool) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(pool)
            .await?;
        ensure_affected(result.rows_affected(), "User", id)
    }

    /// Đổi role, trừ khi user là super admin active cuối cùng.
    /// Đếm và ghi trong cùng một câu UPDATE; false nếu bị chặn.
    pub async fn update_role_keeping_super_admin(
        pool: &SqlitePool,
        id: &str,
        role: UserRole,
    ) -> PersistenceResult<bool> {
        let sql = format!("UPDATE users SET role = ? WHERE id = ? AND {}", LAST_SUPER_ADMIN_GUARD);
        let result = sqlx::query(&sql)
            .bind(role.as_str())
            .bind(id)
            .bind(UserRole::SuperAdmin.as_str())
            .bind(UserRole::SuperAdmin.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Vô hiệu hóa user, trừ khi đó là super admin active cuối cùng
    pub async fn deactivate_keeping_super_admin(
        pool: &SqlitePool,
        id: &str,
    ) -> PersistenceResult<bool> {
        let sql = format!("UPDATE users SET is_active = 0 WHERE id = ? AND {}", LAST_SUPER_ADMIN_GUARD);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(UserRole::SuperAdmin.as_str())
            .bind(UserRole::SuperAdmin.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Ghi nhận lần đăng nhập gần nhất
    pub async fn record_login(
        pool: &SqlitePool,
        id: &str,
        at: DateTime<Utc>,
    ) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(pool)
            .await?;
        ensure_affected(result.rows_affected(), "User", id)
    }

    /// Đếm users đang active theo role
    pub async fn count_active_by_role(pool: &SqlitePool, role: UserRole) -> PersistenceResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ? AND is_active = 1")
                .bind(role.as_str())
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

// ============================================================================
// Bank Account Repository
// ============================================================================

/// Repository cho bank_accounts table
pub struct BankAccountRepo;

impl BankAccountRepo {
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<BankAccount> {
        sqlx::query_as::<_, BankAccountRow>("SELECT * FROM bank_accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("BankAccount", id))?
            .try_into()
    }

    /// Lấy accounts của một user
    pub async fn get_by_owner(
        pool: &SqlitePool,
        owner_id: &str,
    ) -> PersistenceResult<Vec<BankAccount>> {
        sqlx::query_as::<_, BankAccountRow>(
            "SELECT * FROM bank_accounts WHERE owner_id = ? ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(BankAccount::try_from)
        .collect()
    }

    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<BankAccount>> {
        sqlx::query_as::<_, BankAccountRow>("SELECT * FROM bank_accounts ORDER BY created_at")
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(BankAccount::try_from)
            .collect()
    }

    pub async fn insert(pool: &SqlitePool, account: &BankAccount) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO bank_accounts \
             (id, owner_id, account_number, account_type, currency, balance, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.owner_id)
        .bind(&account.account_number)
        .bind(account.account_type.as_str())
        .bind(&account.currency)
        .bind(account.balance.to_string())
        .bind(account.status.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "BankAccount", &account.account_number))?;
        Ok(())
    }

    /// Cập nhật balance và status
    pub async fn update(pool: &SqlitePool, account: &BankAccount) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE bank_accounts SET balance = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(account.balance.to_string())
        .bind(account.status.as_str())
        .bind(account.updated_at)
        .bind(&account.id)
        .execute(pool)
        .await?;
        ensure_affected(result.rows_affected(), "BankAccount", &account.id)
    }

    /// Chỉ đổi status/updated_at, với điều kiện status và balance vẫn như
    /// lúc đọc `current`. false nếu tài khoản đã bị thay đổi.
    pub async fn update_status(
        pool: &SqlitePool,
        current: &BankAccount,
        status: AccountStatus,
        updated_at: DateTime<Utc>,
    ) -> PersistenceResult<bool> {
        let result = sqlx::query(
            "UPDATE bank_accounts SET status = ?, updated_at = ? \
             WHERE id = ? AND status = ? AND balance = ?",
        )
        .bind(status.as_str())
        .bind(updated_at)
        .bind(&current.id)
        .bind(current.status.as_str())
        .bind(current.balance.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn count_by_status(
        pool: &SqlitePool,
        status: AccountStatus,
    ) -> PersistenceResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bank_accounts WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

// ============================================================================
// Compliance Framework Repository
// ============================================================================

/// Repository cho compliance_frameworks table
pub struct ComplianceFrameworkRepo;

impl ComplianceFrameworkRepo {
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<ComplianceFramework> {
        sqlx::query_as::<_, ComplianceFrameworkRow>(
            "SELECT * FROM compliance_frameworks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| PersistenceError::not_found("ComplianceFramework", id))?
        .try_into()
    }

    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<ComplianceFramework>> {
        sqlx::query_as::<_, ComplianceFrameworkRow>(
            "SELECT * FROM compliance_frameworks ORDER BY code",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(ComplianceFramework::try_from)
        .collect()
    }

    pub async fn insert(
        pool: &SqlitePool,
        framework: &ComplianceFramework,
    ) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO compliance_frameworks \
             (id, name, code, jurisdiction, description, status, compliance_score, last_assessed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&framework.id)
        .bind(&framework.name)
        .bind(&framework.code)
        .bind(&framework.jurisdiction)
        .bind(&framework.description)
        .bind(framework.status.as_str())
        .bind(framework.compliance_score.to_string())
        .bind(framework.last_assessed)
        .bind(framework.created_at)
        .bind(framework.updated_at)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "ComplianceFramework", &framework.code))?;
        Ok(())
    }

    pub async fn update(
        pool: &SqlitePool,
        framework: &ComplianceFramework,
    ) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE compliance_frameworks SET name = ?, description = ?, status = ?, \
             compliance_score = ?, last_assessed = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&framework.name)
        .bind(&framework.description)
        .bind(framework.status.as_str())
        .bind(framework.compliance_score.to_string())
        .bind(framework.last_assessed)
        .bind(framework.updated_at)
        .bind(&framework.id)
        .execute(pool)
        .await?;
        ensure_affected(result.rows_affected(), "ComplianceFramework", &framework.id)
    }
}

// ============================================================================
// AML Transaction Repository
// ============================================================================

/// Repository cho aml_transactions table
pub struct AmlTransactionRepo;

impl AmlTransactionRepo {
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> PersistenceResult<AmlTransaction> {
        sqlx::query_as::<_, AmlTransactionRow>("SELECT * FROM aml_transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("AmlTransaction", id))?
            .try_into()
    }

    /// Lấy các giao dịch theo trạng thái, điểm rủi ro cao trước
    pub async fn get_by_status(
        pool: &SqlitePool,
        status: AmlStatus,
    ) -> PersistenceResult<Vec<AmlTransaction>> {
        sqlx::query_as::<_, AmlTransactionRow>(
            "SELECT * FROM aml_transactions WHERE status = ? ORDER BY risk_score DESC, created_at",
        )
        .bind(status.as_str())
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(AmlTransaction::try_from)
        .collect()
    }

    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<AmlTransaction>> {
        sqlx::query_as::<_, AmlTransactionRow>(
            "SELECT * FROM aml_transactions ORDER BY risk_score DESC, created_at",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(AmlTransaction::try_from)
        .collect()
    }

    pub async fn insert(pool: &SqlitePool, tx: &AmlTransaction) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO aml_transactions \
             (id, transaction_ref, account_id, amount, currency, counterparty, country, risk_score, \
              risk_level, status, flags, reviewed_by, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tx.id)
        .bind(&tx.transaction_ref)
        .bind(&tx.account_id)
        .bind(tx.amount.to_string())
        .bind(&tx.currency)
        .bind(&tx.counterparty)
        .bind(&tx.country)
        .bind(tx.risk_score as i64)
        .bind(tx.risk_level.as_str())
        .bind(tx.status.as_str())
        .bind(encode_flags(&tx.flags))
        .bind(&tx.reviewed_by)
        .bind(&tx.notes)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "AmlTransaction", &tx.transaction_ref))?;
        Ok(())
    }

    /// Cập nhật kết quả review
    pub async fn update_review(pool: &SqlitePool, tx: &AmlTransaction) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE aml_transactions SET status = ?, reviewed_by = ?, notes = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(tx.status.as_str())
        .bind(&tx.reviewed_by)
        .bind(&tx.notes)
        .bind(tx.updated_at)
        .bind(&tx.id)
        .execute(pool)
        .await?;
        ensure_affected(result.rows_affected(), "AmlTransaction", &tx.id)
    }

    /// Số giao dịch chưa kết thúc (pending, under_review, escalated)
    pub async fn count_open(pool: &SqlitePool) -> PersistenceResult<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM aml_transactions WHERE status NOT IN (?, ?)",
        )
        .bind(AmlStatus::Cleared.as_str())
        .bind(AmlStatus::Reported.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count.0)
    }
}

// ============================================================================
// NVCT Supply Repository
// ============================================================================

/// Repository cho nvct_supply table (singleton row id = 1)
pub struct NvctSupplyRepo;

impl NvctSupplyRepo {
    pub async fn get(pool: &SqlitePool) -> PersistenceResult<Option<NvctSupply>> {
        sqlx::query_as::<_, NvctSupplyRow>("SELECT * FROM nvct_supply WHERE id = 1")
            .fetch_optional(pool)
            .await?
            .map(NvctSupply::try_from)
            .transpose()
    }

    /// Tạo bản ghi supply nếu chưa có; bản ghi sẵn có được giữ nguyên
    pub async fn init(pool: &SqlitePool, supply: &NvctSupply) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO nvct_supply \
             (id, total_supply, circulating_supply, reserve_balance, max_supply, last_audit, updated_at) \
             VALUES (1, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(supply.total_supply.to_string())
        .bind(supply.circulating_supply.to_string())
        .bind(supply.reserve_balance.to_string())
        .bind(supply.max_supply.to_string())
        .bind(supply.last_audit)
        .bind(supply.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Ghi `next` chỉ khi bản ghi vẫn khớp `expected`.
    /// false nếu đã có người ghi trước (caller đọc lại rồi thử lại).
    pub async fn compare_and_swap(
        pool: &SqlitePool,
        expected: &NvctSupply,
        next: &NvctSupply,
    ) -> PersistenceResult<bool> {
        let result = sqlx::query(
            "UPDATE nvct_supply SET \
               total_supply = ?, circulating_supply = ?, reserve_balance = ?, \
               max_supply = ?, last_audit = ?, updated_at = ? \
             WHERE id = 1 AND total_supply = ? AND circulating_supply = ? \
               AND reserve_balance = ? AND max_supply = ?",
        )
        .bind(next.total_supply.to_string())
        .bind(next.circulating_supply.to_string())
        .bind(next.reserve_balance.to_string())
        .bind(next.max_supply.to_string())
        .bind(next.last_audit)
        .bind(next.updated_at)
        .bind(expected.total_supply.to_string())
        .bind(expected.circulating_supply.to_string())
        .bind(expected.reserve_balance.to_string())
        .bind(expected.max_supply.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Sovereign Debt Repository
// ============================================================================

/// Repository cho sovereign_debt_portfolios table
pub struct SovereignDebtRepo;

impl SovereignDebtRepo {
    pub async fn get_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> PersistenceResult<SovereignDebtPortfolio> {
        sqlx::query_as::<_, SovereignDebtRow>(
            "SELECT * FROM sovereign_debt_portfolios WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| PersistenceError::not_found("SovereignDebtPortfolio", id))?
        .try_into()
    }

    pub async fn get_all(pool: &SqlitePool) -> PersistenceResult<Vec<SovereignDebtPortfolio>> {
        sqlx::query_as::<_, SovereignDebtRow>(
            "SELECT * FROM sovereign_debt_portfolios ORDER BY maturity_date",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(SovereignDebtPortfolio::try_from)
        .collect()
    }

    pub async fn insert(
        pool: &SqlitePool,
        portfolio: &SovereignDebtPortfolio,
    ) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO sovereign_debt_portfolios \
             (id, country, instrument, principal, interest_rate, currency, maturity_date, credit_rating, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&portfolio.id)
        .bind(&portfolio.country)
        .bind(portfolio.instrument.as_str())
        .bind(portfolio.principal.to_string())
        .bind(portfolio.interest_rate.to_string())
        .bind(&portfolio.currency)
        .bind(portfolio.maturity_date)
        .bind(&portfolio.credit_rating)
        .bind(portfolio.status.as_str())
        .bind(portfolio.created_at)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "SovereignDebtPortfolio", &portfolio.id))?;
        Ok(())
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: &str,
        status: DebtStatus,
    ) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE sovereign_debt_portfolios SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(pool)
            .await?;
        ensure_affected(result.rows_affected(), "SovereignDebtPortfolio", id)
    }
}

// ============================================================================
// Islamic Banking Product Repository
// ============================================================================

/// Repository cho islamic_banking_products table
pub struct IslamicProductRepo;

impl IslamicProductRepo {
    pub async fn get_by_id(
        pool: &SqlitePool,
        id: &str,
    ) -> PersistenceResult<IslamicBankingProduct> {
        sqlx::query_as::<_, IslamicProductRow>(
            "SELECT * FROM islamic_banking_products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| PersistenceError::not_found("IslamicBankingProduct", id))?
        .try_into()
    }

    /// Lấy sản phẩm; `active_only` để lọc sản phẩm đang mở bán
    pub async fn get_all(
        pool: &SqlitePool,
        active_only: bool,
    ) -> PersistenceResult<Vec<IslamicBankingProduct>> {
        let sql = if active_only {
            "SELECT * FROM islamic_banking_products WHERE is_active = 1 ORDER BY name"
        } else {
            "SELECT * FROM islamic_banking_products ORDER BY name"
        };
        sqlx::query_as::<_, IslamicProductRow>(sql)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(IslamicBankingProduct::try_from)
            .collect()
    }

    pub async fn insert(
        pool: &SqlitePool,
        product: &IslamicBankingProduct,
    ) -> PersistenceResult<()> {
        sqlx::query(
            "INSERT INTO islamic_banking_products \
             (id, name, product_type, profit_rate, min_investment, sharia_board_approved, is_active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.product_type.as_str())
        .bind(product.profit_rate.to_string())
        .bind(product.min_investment.to_string())
        .bind(product.sharia_board_approved)
        .bind(product.is_active)
        .bind(product.created_at)
        .execute(pool)
        .await
        .map_err(|e| PersistenceError::from_insert(e, "IslamicBankingProduct", &product.name))?;
        Ok(())
    }

    /// Cập nhật cờ phê duyệt / kích hoạt
    pub async fn update_flags(
        pool: &SqlitePool,
        product: &IslamicBankingProduct,
    ) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE islamic_banking_products SET sharia_board_approved = ?, is_active = ? WHERE id = ?",
        )
        .bind(product.sharia_board_approved)
        .bind(product.is_active)
        .bind(&product.id)
        .execute(pool)
        .await?;
        ensure_affected(result.rows_affected(), "IslamicBankingProduct", &product.id)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Tạo connection pool
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Pool in-memory một connection (mỗi connection sqlite::memory: là một DB riêng)
pub async fn create_memory_pool() -> PersistenceResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Tạo các bảng nếu chưa có
pub async fn create_schema(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    create_schema(&pool).await?;
    Ok(pool)
}
