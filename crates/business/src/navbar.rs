//! Navbar context
//!
//! Dựng navbar theo quyền của user đang đăng nhập. Section chỉ hiện khi role
//! được cấp permission của section; item con được lọc theo permission riêng.

use crate::services::ServiceContext;
use nvcbank_core::{NavGroup, NavSection, Permission, User, UserRole, SECTIONS};
use serde::Serialize;

/// Thông tin user hiển thị góc navbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub initials: String,
    pub role: UserRole,
    pub role_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSectionView {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
    pub active: bool,
    pub items: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavGroupView {
    pub group: NavGroup,
    pub label: &'static str,
    pub sections: Vec<NavSectionView>,
}

/// Toàn bộ dữ liệu navbar cho một request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavbarContext {
    pub user: Option<NavUser>,
    pub groups: Vec<NavGroupView>,
    pub active_section: Option<&'static str>,
}

impl NavbarContext {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn section_keys(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .flat_map(|g| g.sections.iter().map(|s| s.key))
            .collect()
    }

    pub fn has_section(&self, key: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.sections.iter().any(|s| s.key == key))
    }
}

pub struct NavbarContextService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NavbarContextService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// User ẩn danh hoặc inactive không có quyền nào
    pub fn has_permission(&self, user: Option<&User>, permission: Permission) -> bool {
        user.map_or(false, |u| self.ctx.can(u, permission))
    }

    /// Các section user được thấy, theo thứ tự khai báo
    pub fn visible_sections(&self, user: Option<&User>) -> Vec<&'static NavSection> {
        SECTIONS
            .iter()
            .filter(|s| self.has_permission(user, s.required))
            .collect()
    }

    pub fn build(&self, user: Option<&User>, current_path: &str) -> NavbarContext {
        let Some(user) = user.filter(|u| u.is_active) else {
            return NavbarContext::default();
        };

        let visible = self.visible_sections(Some(user));

        // Section có URL là prefix dài nhất của path hiện tại
        let active_section = visible
            .iter()
            .filter(|s| s.matches_path(current_path))
            .max_by_key(|s| s.url.len())
            .map(|s| s.key);

        let groups = NavGroup::ALL
            .iter()
            .filter_map(|&group| {
                let sections: Vec<NavSectionView> = visible
                    .iter()
                    .filter(|s| s.group == group)
                    .map(|s| NavSectionView {
                        key: s.key,
                        label: s.label,
                        icon: s.icon,
                        url: s.url,
                        active: Some(s.key) == active_section,
                        items: s
                            .items
                            .iter()
                            .filter(|item| {
                                item.required
                                    .map_or(true, |p| self.has_permission(Some(user), p))
                            })
                            .map(|item| NavLink {
                                label: item.label,
                                url: item.url,
                            })
                            .collect(),
                    })
                    .collect();

                if sections.is_empty() {
                    None
                } else {
                    Some(NavGroupView {
                        group,
                        label: group.label(),
                        sections,
                    })
                }
            })
            .collect();

        NavbarContext {
            user: Some(NavUser {
                id: user.id.clone(),
                username: user.username.clone(),
                display_name: user.display_name().to_string(),
                initials: user.initials(),
                role: user.role,
                role_label: user.role.label(),
            }),
            groups,
            active_section,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_context;

    fn user(role: UserRole) -> User {
        User::new(&format!("{}.user", role.as_str()), "u@nvcbank.com", role)
    }

    #[tokio::test]
    async fn test_anonymous_and_inactive_get_nothing() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);

        assert!(svc.build(None, "/dashboard").is_empty());
        assert!(svc.build(None, "/dashboard").user.is_none());

        let mut admin = user(UserRole::SuperAdmin);
        admin.is_active = false;
        assert!(svc.build(Some(&admin), "/dashboard").is_empty());
        assert!(!svc.has_permission(Some(&admin), Permission::ViewDashboard));
    }

    #[tokio::test]
    async fn test_super_admin_sees_everything() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let nav = svc.build(Some(&user(UserRole::SuperAdmin)), "/");
        assert_eq!(nav.section_keys().len(), SECTIONS.len());
        assert_eq!(nav.groups.len(), NavGroup::ALL.len());
        assert_eq!(nav.active_section, None);
    }

    #[tokio::test]
    async fn test_customer_navbar_is_restricted() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let nav = svc.build(Some(&user(UserRole::Customer)), "/accounts");

        assert!(nav.has_section("accounts"));
        assert!(nav.has_section("nvct_stablecoin"));
        assert!(!nav.has_section("user_management"));
        assert!(!nav.has_section("compliance"));
        assert!(!nav.has_section("nvct_supply"));
        assert!(nav.groups.iter().all(|g| !g.sections.is_empty()));
        assert!(!nav.groups.iter().any(|g| g.group == NavGroup::Administration));
        assert_eq!(nav.active_section, Some("accounts"));
    }

    #[tokio::test]
    async fn test_groups_follow_declared_order() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let nav = svc.build(Some(&user(UserRole::ComplianceOfficer)), "/");
        let order: Vec<NavGroup> = nav.groups.iter().map(|g| g.group).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let nav = svc.build(Some(&user(UserRole::ComplianceOfficer)), "/compliance/aml/queue");
        assert_eq!(nav.active_section, Some("aml"));

        let active: Vec<&str> = nav
            .groups
            .iter()
            .flat_map(|g| g.sections.iter().filter(|s| s.active).map(|s| s.key))
            .collect();
        assert_eq!(active, vec!["aml"]);

        // "/compliancex" không thuộc "/compliance"
        let nav = svc.build(Some(&user(UserRole::ComplianceOfficer)), "/compliancex");
        assert_eq!(nav.active_section, None);
    }

    #[tokio::test]
    async fn test_child_items_filtered_by_permission() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let admin_nav = svc.build(Some(&user(UserRole::SuperAdmin)), "/");
        let customer_nav = svc.build(Some(&user(UserRole::Customer)), "/");

        let items = |nav: &NavbarContext, key: &str| -> usize {
            nav.groups
                .iter()
                .flat_map(|g| g.sections.iter())
                .find(|s| s.key == key)
                .map(|s| s.items.len())
                .unwrap_or(0)
        };
        assert!(items(&admin_nav, "accounts") > items(&customer_nav, "accounts"));
    }

    #[tokio::test]
    async fn test_nav_user_details() {
        let (ctx, _dir) = test_context().await;
        let svc = NavbarContextService::new(&ctx);
        let u = User::new("jane.doe", "jane@nvcbank.com", UserRole::Auditor);
        let nav = svc.build(Some(&u), "/reports");
        let nav_user = nav.user.unwrap();
        assert_eq!(nav_user.initials, "JD");
        assert_eq!(nav_user.role, UserRole::Auditor);
        assert_eq!(nav.active_section, Some("reports"));
    }
}
