//! Permission matrix - permissions × roles

use chrono::{DateTime, Utc};
use nvcbank_core::{Permission, PermissionTable, UserRole};

use crate::exporters::ReportData;

const GRANTED: &str = "x";

#[derive(Debug, Clone)]
pub struct PermissionMatrixReport {
    pub title: String,
    pub table: PermissionTable,
    pub roles: Vec<UserRole>,
    pub generated_at: DateTime<Utc>,
}

impl PermissionMatrixReport {
    /// Matrix cho toàn bộ roles
    pub fn new(title: &str, table: &PermissionTable) -> Self {
        Self {
            title: title.to_string(),
            table: table.clone(),
            roles: UserRole::ALL.to_vec(),
            generated_at: Utc::now(),
        }
    }

    /// Chỉ giữ các cột role cho trước
    pub fn only_roles(mut self, roles: &[UserRole]) -> Self {
        self.roles = UserRole::ALL
            .into_iter()
            .filter(|r| roles.contains(r))
            .collect();
        self
    }

    pub fn granted(&self, role: UserRole, permission: Permission) -> bool {
        self.table.has_permission(role, permission)
    }

    /// Permissions không role nào có (ngoài super_admin)
    pub fn orphaned(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| {
                self.table
                    .roles_with(*p)
                    .iter()
                    .all(|r| *r == UserRole::SuperAdmin)
            })
            .collect()
    }
}

impl ReportData for PermissionMatrixReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        std::iter::once("Permission".to_string())
            .chain(self.roles.iter().map(|r| r.as_str().to_string()))
            .collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        Permission::ALL
            .iter()
            .map(|perm| {
                std::iter::once(perm.as_str().to_string())
                    .chain(self.roles.iter().map(|role| {
                        if self.granted(*role, *perm) {
                            GRANTED.to_string()
                        } else {
                            String::new()
                        }
                    }))
                    .collect()
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut summary: Vec<(String, String)> = self
            .roles
            .iter()
            .map(|role| {
                (
                    role.label().to_string(),
                    self.table.permissions_for(*role).len().to_string(),
                )
            })
            .collect();
        let orphaned = self.orphaned();
        if !orphaned.is_empty() {
            let names: Vec<&str> = orphaned.iter().map(|p| p.as_str()).collect();
            summary.push(("Super admin only".to_string(), names.join(", ")));
        }
        summary.push(("Generated At".to_string(), self.generated_at.to_rfc3339()));
        summary
    }
}
