//! RBAC inspection commands

use anyhow::{anyhow, Result};
use nvcbank_business::{DashboardManager, NavbarContextService, ServiceContext};
use nvcbank_core::{Permission, User, UserRole};
use nvcbank_persistence::Database;
use nvcbank_reports::PermissionMatrixReport;

use super::{parse_role, write_output};
use crate::RbacAction;

pub async fn handle(db: &Database, action: RbacAction) -> Result<()> {
    let ctx = ServiceContext::new(db);

    match action {
        RbacAction::Check { role, permission } => {
            let role = parse_role(&role)?;
            let permission = parse_permission(&permission)?;
            if ctx.permissions().has_permission(role, permission) {
                println!("✅ {} has {}", role, permission);
            } else {
                println!("❌ {} does not have {}", role, permission);
                let holders: Vec<&str> = ctx
                    .permissions()
                    .roles_with(permission)
                    .iter()
                    .map(|r| r.as_str())
                    .collect();
                println!("   Granted to: {}", holders.join(", "));
            }
        }

        RbacAction::Permissions { role } => {
            let role = parse_role(&role)?;
            let permissions = ctx.permissions().permissions_for(role);
            println!("{} ({} permissions)", role.label(), permissions.len());
            for p in permissions {
                let kind = if p.is_read_only() { "read" } else { "write" };
                println!("   {:<28} {}", p.as_str(), kind);
            }
        }

        RbacAction::Matrix {
            format,
            roles,
            output,
        } => {
            let mut report = PermissionMatrixReport::new("Role Permission Matrix", ctx.permissions());
            if let Some(roles) = roles {
                let roles = roles
                    .iter()
                    .map(|r| parse_role(r))
                    .collect::<Result<Vec<_>>>()?;
                report = report.only_roles(&roles);
            }
            for p in report.orphaned() {
                eprintln!("⚠️  {} is only held by super_admin", p);
            }
            let exporter = format.to_export_format().exporter();
            write_output(&exporter.export(&report), output.as_deref())?;
        }

        RbacAction::Nav { role, path } => {
            let user = preview_user(parse_role(&role)?);
            let nav = NavbarContextService::new(&ctx).build(Some(&user), &path);
            println!("{}", serde_json::to_string_pretty(&nav)?);
        }

        RbacAction::Dashboard { role } => {
            let user = preview_user(parse_role(&role)?);
            let config = DashboardManager::new(&ctx).config_for(&user)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn parse_permission(s: &str) -> Result<Permission> {
    Permission::from_str(s).ok_or_else(|| anyhow!("unknown permission '{}'", s))
}

/// User tạm, không lưu DB, chỉ để xem navbar/dashboard theo role
fn preview_user(role: UserRole) -> User {
    User::new(&format!("preview.{}", role.as_str()), "preview@nvcbank.com", role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permission() {
        assert_eq!(parse_permission("view_audit_log").unwrap(), Permission::ViewAuditLog);
        assert!(parse_permission("launch_missiles").is_err());
    }

    #[test]
    fn test_preview_user_is_active() {
        let user = preview_user(UserRole::Auditor);
        assert!(user.is_active);
        assert_eq!(user.role, UserRole::Auditor);
    }

    #[tokio::test]
    async fn test_matrix_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory(dir.path().join("errors")).await.unwrap();
        let output = dir.path().join("matrix.csv");

        handle(
            &db,
            RbacAction::Matrix {
                format: crate::ReportFormat::Csv,
                roles: Some(vec!["auditor".to_string(), "customer".to_string()]),
                output: Some(output.clone()),
            },
        )
        .await
        .unwrap();

        let csv = std::fs::read_to_string(&output).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.contains("auditor"));
        assert!(!header.contains("super_admin"));
    }
}
