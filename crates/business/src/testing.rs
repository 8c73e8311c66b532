//! Test helpers: context trên SQLite in-memory

use crate::services::ServiceContext;
use nvcbank_core::{User, UserRole};
use nvcbank_persistence::{Database, UserRepo};
use tempfile::TempDir;

/// Context mới; giữ `TempDir` sống suốt test
pub async fn test_context() -> (ServiceContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory(dir.path().join("errors")).await.unwrap();
    (ServiceContext::new(&db), dir)
}

pub async fn seed_user(ctx: &ServiceContext, username: &str, role: UserRole) -> User {
    let user = User::new(username, &format!("{}@nvcbank.com", username), role);
    UserRepo::insert(ctx.pool(), &user).await.unwrap();
    user
}

/// Context trên file SQLite (nhiều connection) cho test đồng thời
pub async fn file_context() -> (ServiceContext, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("nvcbank.db").display());
    let db = Database::new(&url, dir.path().join("errors")).await.unwrap();
    (ServiceContext::new(&db), dir)
}
