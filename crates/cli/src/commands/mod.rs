//! CLI command handlers

pub mod lint;
pub mod rbac;
pub mod user;

use anyhow::{anyhow, Context, Result};
use nvcbank_core::UserRole;
use std::path::Path;

/// Role từ tên snake_case, lỗi liệt kê các role hợp lệ
pub fn parse_role(s: &str) -> Result<UserRole> {
    UserRole::from_str(s).ok_or_else(|| {
        let valid: Vec<&str> = UserRole::ALL.iter().map(|r| r.as_str()).collect();
        anyhow!("unknown role '{}' (expected one of: {})", s, valid.join(", "))
    })
}

/// Ghi ra file nếu có `--output`, không thì stdout
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("📄 Written to {:?}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}
