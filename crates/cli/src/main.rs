//! NVC Bank CLI - administration from the command line
//!
//! Usage:
//! ```bash
//! nvcbank init --admin-username root --admin-email root@nvcbank.com
//! nvcbank migrate
//! nvcbank status
//! nvcbank user create alice alice@nvcbank.com --role customer --actor root
//! nvcbank user role alice compliance_officer --actor root
//! nvcbank rbac check auditor view_audit_log
//! nvcbank rbac matrix --format markdown --output matrix.md
//! nvcbank rbac nav customer --path /accounts
//! nvcbank lint templates/ --format csv
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use nvcbank_reports::ExportFormat;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod db;

use commands::{lint, rbac, user};

/// NVC Bank admin tooling - SQLite database, RBAC and template checks
#[derive(Parser)]
#[command(name = "nvcbank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/nvcbank.db", global = true)]
    pub db: PathBuf,

    /// Error log directory
    #[arg(long, default_value = "data/errors", global = true)]
    pub error_log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema, apply column migrations, optionally bootstrap a super admin
    Init {
        /// Username of the initial super admin
        #[arg(long, requires = "admin_email")]
        admin_username: Option<String>,
        /// Email of the initial super admin
        #[arg(long, requires = "admin_username")]
        admin_email: Option<String>,
    },

    /// Add missing columns to an existing database
    Migrate,

    /// Show database status
    Status,

    /// User management
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect the RBAC permission table
    Rbac {
        #[command(subcommand)]
        action: RbacAction,
    },

    /// Scan templates and scripts for unguarded links and client-side role checks
    Lint {
        /// Directory to scan
        dir: PathBuf,
        /// Report format
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Output file path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Create {
        username: String,
        email: String,
        /// Role (e.g. customer, bank_officer, auditor)
        #[arg(long, short, default_value = "customer")]
        role: String,
        /// Username performing the change
        #[arg(long)]
        actor: String,
    },
    /// List users
    List {
        /// Filter by role
        #[arg(long, short)]
        role: Option<String>,
    },
    /// Change a user's role
    Role {
        username: String,
        role: String,
        #[arg(long)]
        actor: String,
    },
    /// Deactivate a user
    Deactivate {
        username: String,
        #[arg(long)]
        actor: String,
    },
    /// Reactivate a user
    Activate {
        username: String,
        #[arg(long)]
        actor: String,
    },
}

#[derive(Subcommand)]
pub enum RbacAction {
    /// Check whether a role holds a permission
    Check { role: String, permission: String },
    /// List the permissions of a role
    Permissions { role: String },
    /// Role x permission matrix
    Matrix {
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Only these roles (comma-separated)
        #[arg(long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Navbar a role would see
    Nav {
        role: String,
        /// Current path, for the active section
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Dashboard layout of a role
    Dashboard { role: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn to_export_format(self) -> ExportFormat {
        match self {
            ReportFormat::Csv => ExportFormat::Csv,
            ReportFormat::Json => ExportFormat::Json,
            ReportFormat::Markdown => ExportFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nvcbank=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            admin_username,
            admin_email,
        } => {
            let db = db::open(&cli.db, &cli.error_log_dir).await?;
            db::init(&db, admin_username.as_deref().zip(admin_email.as_deref())).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Migrate => {
            let db = db::open(&cli.db, &cli.error_log_dir).await?;
            db::migrate(&db).await?;
        }

        Commands::Status => {
            db::show_status(&cli.db, &cli.error_log_dir).await?;
        }

        Commands::User { action } => {
            let db = db::open(&cli.db, &cli.error_log_dir).await?;
            user::handle(&db, action).await?;
        }

        Commands::Rbac { action } => {
            let db = db::open(&cli.db, &cli.error_log_dir).await?;
            rbac::handle(&db, action).await?;
        }

        Commands::Lint {
            dir,
            format,
            output,
        } => {
            let clean = lint::run(&dir, format, output.as_deref())?;
            if !clean {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["nvcbank", "status"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("data/nvcbank.db"));
        assert_eq!(cli.error_log_dir, PathBuf::from("data/errors"));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_admin_flags_come_in_pairs() {
        assert!(Cli::try_parse_from(["nvcbank", "init", "--admin-username", "root"]).is_err());
        let cli = Cli::try_parse_from([
            "nvcbank",
            "init",
            "--admin-username",
            "root",
            "--admin-email",
            "root@nvcbank.com",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Init { admin_username: Some(_), admin_email: Some(_) }
        ));
    }

    #[test]
    fn test_matrix_role_list() {
        let cli = Cli::try_parse_from([
            "nvcbank",
            "rbac",
            "matrix",
            "--format",
            "csv",
            "--roles",
            "auditor,customer",
        ])
        .unwrap();
        match cli.command {
            Commands::Rbac {
                action: RbacAction::Matrix { format, roles, .. },
            } => {
                assert_eq!(format, ReportFormat::Csv);
                assert_eq!(roles.unwrap(), vec!["auditor", "customer"]);
            }
            _ => panic!("expected rbac matrix"),
        }
    }

    #[test]
    fn test_global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["nvcbank", "migrate", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
    }
}
