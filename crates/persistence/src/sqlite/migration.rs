//! Additive column migrations
//!
//! Thêm các cột còn thiếu vào database cũ mà không đụng tới dữ liệu.
//! Chạy lại nhiều lần là an toàn: cột đã có sẽ được bỏ qua.

use crate::error::{PersistenceError, PersistenceResult};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Một cột cần có trong bảng
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub table: String,
    pub column: String,
    /// Kiểu và ràng buộc, ví dụ `TEXT` hoặc `INTEGER NOT NULL DEFAULT 0`
    pub definition: String,
}

impl ColumnSpec {
    pub fn new(table: &str, column: &str, definition: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            definition: definition.to_string(),
        }
    }

    /// `table.column`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }

    fn validate(&self) -> PersistenceResult<()> {
        validate_identifier(&self.table)?;
        validate_identifier(&self.column)?;
        let def = self.definition.trim();
        if def.is_empty() || def.contains(';') || def.contains("--") || def.contains("/*") {
            return Err(PersistenceError::InvalidIdentifier(format!(
                "{}: bad column definition '{}'",
                self.qualified_name(),
                self.definition
            )));
        }
        Ok(())
    }
}

/// Kết quả một lần migrate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub added: Vec<String>,
    pub already_present: Vec<String>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

/// Identifier hợp lệ: `[A-Za-z_][A-Za-z0-9_]*`
pub fn validate_identifier(name: &str) -> PersistenceResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidIdentifier(name.to_string()))
    }
}

/// Các cột được bổ sung dần qua các phiên bản
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("users", "last_login", "DATETIME"),
        ColumnSpec::new("users", "is_active", "INTEGER NOT NULL DEFAULT 1"),
        ColumnSpec::new("compliance_frameworks", "description", "TEXT"),
        ColumnSpec::new("compliance_frameworks", "last_assessed", "DATETIME"),
        ColumnSpec::new("aml_transactions", "reviewed_by", "TEXT"),
        ColumnSpec::new("aml_transactions", "notes", "TEXT"),
        ColumnSpec::new("nvct_supply", "last_audit", "DATETIME"),
        ColumnSpec::new(
            "islamic_banking_products",
            "sharia_board_approved",
            "INTEGER NOT NULL DEFAULT 0",
        ),
    ]
}

/// Column-adding migrator
pub struct Migrator<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Migrator<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Danh sách cột hiện có của bảng; rỗng nếu bảng không tồn tại
    pub async fn existing_columns(&self, table: &str) -> PersistenceResult<Vec<String>> {
        validate_identifier(table)?;
        let columns = sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(self.pool)
            .await?;
        Ok(columns)
    }

    pub async fn has_column(&self, table: &str, column: &str) -> PersistenceResult<bool> {
        let columns = self.existing_columns(table).await?;
        if columns.is_empty() {
            return Err(PersistenceError::MissingTable(table.to_string()));
        }
        Ok(columns.iter().any(|c| c.eq_ignore_ascii_case(column)))
    }

    /// Thêm các cột còn thiếu
    pub async fn apply(&self, specs: &[ColumnSpec]) -> PersistenceResult<MigrationReport> {
        // Validate toàn bộ trước khi chạy ALTER nào
        for spec in specs {
            spec.validate()?;
        }

        let mut report = MigrationReport::default();
        for spec in specs {
            if self.has_column(&spec.table, &spec.column).await? {
                debug!(column = %spec.qualified_name(), "column already present");
                report.already_present.push(spec.qualified_name());
                continue;
            }

            let sql = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                spec.table,
                spec.column,
                spec.definition.trim()
            );
            sqlx::query(&sql).execute(self.pool).await?;
            info!(column = %spec.qualified_name(), "added column");
            report.added.push(spec.qualified_name());
        }
        Ok(report)
    }

    pub async fn apply_defaults(&self) -> PersistenceResult<MigrationReport> {
        self.apply(&default_columns()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("_tmp2").is_ok());
        assert!(validate_identifier("2fast").is_err());
        assert!(validate_identifier("users; DROP TABLE users").is_err());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("naïve").is_err());
    }

    #[test]
    fn test_definition_validation() {
        assert!(ColumnSpec::new("users", "note", "TEXT").validate().is_ok());
        assert!(ColumnSpec::new("users", "note", "TEXT; DROP TABLE users")
            .validate()
            .is_err());
        assert!(ColumnSpec::new("users", "note", "  ").validate().is_err());
    }

    #[test]
    fn test_default_columns_are_valid() {
        for spec in default_columns() {
            assert!(spec.validate().is_ok(), "{}", spec.qualified_name());
        }
    }
}
