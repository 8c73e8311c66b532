//! Column migration tests

use nvcbank_persistence::*;
use sqlx::SqlitePool;

/// Schema cũ: thiếu các cột được thêm sau này
async fn legacy_pool() -> SqlitePool {
    let pool = create_memory_pool().await.unwrap();
    sqlx::raw_sql(
        "CREATE TABLE users (id TEXT PRIMARY KEY, username TEXT NOT NULL, email TEXT NOT NULL, role TEXT NOT NULL, created_at DATETIME);
         CREATE TABLE compliance_frameworks (id TEXT PRIMARY KEY, name TEXT, code TEXT, jurisdiction TEXT, status TEXT, compliance_score TEXT, created_at DATETIME, updated_at DATETIME);
         CREATE TABLE aml_transactions (id TEXT PRIMARY KEY, transaction_ref TEXT, status TEXT);
         CREATE TABLE nvct_supply (id INTEGER PRIMARY KEY, total_supply TEXT);
         CREATE TABLE islamic_banking_products (id TEXT PRIMARY KEY, name TEXT, is_active INTEGER);",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool
}

#[tokio::test]
async fn test_adds_missing_columns_once() {
    let pool = legacy_pool().await;
    let migrator = Migrator::new(&pool);

    assert!(!migrator.has_column("users", "last_login").await.unwrap());

    let report = migrator.apply_defaults().await.unwrap();
    assert_eq!(report.added.len(), default_columns().len());
    assert!(report.added.contains(&"users.last_login".to_string()));
    assert!(report.already_present.is_empty());
    assert!(migrator.has_column("users", "last_login").await.unwrap());

    let again = migrator.apply_defaults().await.unwrap();
    assert!(again.is_noop());
    assert_eq!(again.already_present.len(), default_columns().len());
}

#[tokio::test]
async fn test_added_default_is_applied_to_existing_rows() {
    let pool = legacy_pool().await;
    sqlx::query("INSERT INTO users (id, username, email, role) VALUES ('u1', 'old', 'old@x.io', 'customer')")
        .execute(&pool)
        .await
        .unwrap();

    Migrator::new(&pool).apply_defaults().await.unwrap();

    let active: i64 = sqlx::query_scalar("SELECT is_active FROM users WHERE id = 'u1'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn test_fresh_schema_needs_nothing() {
    let pool = create_memory_pool().await.unwrap();
    create_schema(&pool).await.unwrap();
    let report = Migrator::new(&pool).apply_defaults().await.unwrap();
    assert!(report.is_noop());
}

#[tokio::test]
async fn test_rejects_bad_identifiers_and_missing_tables() {
    let pool = legacy_pool().await;
    let migrator = Migrator::new(&pool);

    let bad = [ColumnSpec::new("users; DROP TABLE users", "x", "TEXT")];
    assert!(matches!(
        migrator.apply(&bad).await.unwrap_err(),
        PersistenceError::InvalidIdentifier(_)
    ));

    // Không có ALTER nào chạy khi một spec không hợp lệ
    let mixed = [
        ColumnSpec::new("users", "nickname", "TEXT"),
        ColumnSpec::new("users", "bad-name", "TEXT"),
    ];
    assert!(migrator.apply(&mixed).await.is_err());
    assert!(!migrator.has_column("users", "nickname").await.unwrap());

    let missing = [ColumnSpec::new("ledgers", "memo", "TEXT")];
    assert!(matches!(
        migrator.apply(&missing).await.unwrap_err(),
        PersistenceError::MissingTable(_)
    ));
}
