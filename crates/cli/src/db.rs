//! Database initialization, migration and status

use anyhow::{Context, Result};
use nvcbank_business::{ServiceContext, UserManagementService};
use nvcbank_core::{AccountStatus, UserRole};
use nvcbank_persistence::{AmlTransactionRepo, BankAccountRepo, Database, UserRepo};
use std::path::Path;

/// Mở (hoặc tạo) database; schema được tạo nếu chưa có
pub async fn open(db_path: &Path, error_log_dir: &Path) -> Result<Database> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let db_url = format!("sqlite:{}", db_path.display());
    Database::new(&db_url, error_log_dir)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Schema + column migrations, super admin nếu được yêu cầu
pub async fn init(db: &Database, admin: Option<(&str, &str)>) -> Result<()> {
    migrate(db).await?;

    if let Some((username, email)) = admin {
        let ctx = ServiceContext::new(db);
        let admin = UserManagementService::new(&ctx)
            .bootstrap_admin(username, email)
            .await?;
        println!("👤 Super admin '{}' created ({})", admin.username, admin.id);
    }
    Ok(())
}

pub async fn migrate(db: &Database) -> Result<()> {
    let report = db.migrate().await.context("Column migration failed")?;
    if report.is_noop() {
        println!("📦 Schema up to date ({} columns checked)", report.already_present.len());
    } else {
        for column in &report.added {
            println!("➕ Added column {}", column);
        }
    }
    Ok(())
}

pub async fn show_status(db_path: &Path, error_log_dir: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'nvcbank init' to create the database");
        return Ok(());
    }

    let db = open(db_path, error_log_dir).await?;
    let pool = db.pool();

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    println!("   Users:        {}", UserRepo::count(pool).await?);
    for role in UserRole::ALL {
        let active = UserRepo::count_active_by_role(pool, role).await?;
        if active > 0 {
            println!("     {:<20} {}", role.as_str(), active);
        }
    }

    println!(
        "   Accounts:     {} active, {} frozen, {} closed",
        BankAccountRepo::count_by_status(pool, AccountStatus::Active).await?,
        BankAccountRepo::count_by_status(pool, AccountStatus::Frozen).await?,
        BankAccountRepo::count_by_status(pool, AccountStatus::Closed).await?,
    );
    println!("   Open AML:     {}", AmlTransactionRepo::count_open(pool).await?);

    let errors = db.error_reader().recent(usize::MAX)?.len();
    println!("   Error logs:   {}", errors);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_bootstraps_admin_once() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("nvcbank.db");
        let db = open(&db_path, &dir.path().join("errors")).await.unwrap();

        init(&db, Some(("root", "root@nvcbank.com"))).await.unwrap();
        assert!(db_path.exists());
        assert_eq!(
            UserRepo::count_active_by_role(db.pool(), UserRole::SuperAdmin)
                .await
                .unwrap(),
            1
        );

        // Lần hai: schema giữ nguyên, không tạo thêm super admin
        assert!(init(&db, Some(("root2", "root2@nvcbank.com"))).await.is_err());
        init(&db, None).await.unwrap();
    }
}
