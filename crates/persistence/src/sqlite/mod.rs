//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod migration;
pub mod repos;
pub mod schema;

pub use migration::{default_columns, ColumnSpec, MigrationReport, Migrator};
pub use repos::{
    create_memory_pool, create_pool, create_schema, init_database, AmlTransactionRepo,
    BankAccountRepo, ComplianceFrameworkRepo, IslamicProductRepo, NvctSupplyRepo,
    SovereignDebtRepo, UserRepo,
};
pub use schema::{
    AmlTransactionRow, BankAccountRow, ComplianceFrameworkRow, IslamicProductRow, NvctSupplyRow,
    SovereignDebtRow, UserRow, TABLES,
};
