//! User management - list, create, role changes, activation

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use chrono::Utc;
use nvcbank_core::{Permission, User, UserRole};
use nvcbank_persistence::UserRepo;
use tracing::{info, warn};

pub struct UserManagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserManagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<User>> {
        self.ctx.authorize(actor, Permission::ViewUsers)?;
        Ok(UserRepo::get_all(self.ctx.pool()).await?)
    }

    pub async fn get(&self, actor: &User, user_id: &str) -> BusinessResult<User> {
        self.ctx.authorize(actor, Permission::ViewUsers)?;
        self.load(user_id).await
    }

    /// Resolve user của request; user không tồn tại hoặc inactive bị từ chối
    pub async fn resolve_active(&self, user_id: &str) -> BusinessResult<User> {
        let user = UserRepo::get_by_id(self.ctx.pool(), user_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::AccessDenied("unknown user".to_string())
                } else {
                    BusinessError::from(e)
                }
            })?;
        if !user.is_active {
            return Err(BusinessError::InactiveUser(user.username).into());
        }
        Ok(user)
    }

    pub async fn record_login(&self, user_id: &str) -> BusinessResult<()> {
        UserRepo::record_login(self.ctx.pool(), user_id, Utc::now()).await?;
        Ok(())
    }

    /// Tạo user; cấp role admin/super_admin cần ManageRoles
    pub async fn create(
        &self,
        actor: &User,
        username: &str,
        email: &str,
        role: UserRole,
    ) -> BusinessResult<User> {
        self.ctx.authorize(actor, Permission::ManageUsers)?;
        if role.is_privileged() {
            self.ctx.authorize(actor, Permission::ManageRoles)?;
        }

        let user = User::new(username.trim(), email.trim(), role);
        user.validate().map_err(BusinessError::from)?;
        UserRepo::insert(self.ctx.pool(), &user)
            .await
            .map_err(BusinessError::from)?;

        info!(actor = %actor.username, user = %user.username, role = %role, "user created");
        Ok(user)
    }

    /// Bootstrap super admin đầu tiên (CLI `init`), không qua RBAC
    pub async fn bootstrap_admin(&self, username: &str, email: &str) -> BusinessResult<User> {
        if UserRepo::count_active_by_role(self.ctx.pool(), UserRole::SuperAdmin).await? > 0 {
            return Err(BusinessError::rule("an active super admin already exists").into());
        }
        let user = User::new(username.trim(), email.trim(), UserRole::SuperAdmin);
        user.validate().map_err(BusinessError::from)?;
        UserRepo::insert(self.ctx.pool(), &user)
            .await
            .map_err(BusinessError::from)?;
        warn!(user = %user.username, "bootstrap super admin created");
        Ok(user)
    }

    pub async fn change_role(
        &self,
        actor: &User,
        user_id: &str,
        role: UserRole,
    ) -> BusinessResult<User> {
        self.ctx.authorize(actor, Permission::ManageUsers)?;
        let mut user = self.load(user_id).await?;
        if user.role == role {
            return Ok(user);
        }
        if role.is_privileged() || user.role.is_privileged() {
            self.ctx.authorize(actor, Permission::ManageRoles)?;
        }
        if !UserRepo::update_role_keeping_super_admin(self.ctx.pool(), &user.id, role).await? {
            return Err(last_super_admin(&user).into());
        }
        info!(actor = %actor.username, user = %user.username, from = %user.role, to = %role, "role changed");
        user.role = role;
        Ok(user)
    }

    pub async fn deactivate(&self, actor: &User, user_id: &str) -> BusinessResult<User> {
        self.ctx.authorize(actor, Permission::ManageUsers)?;
        if actor.id == user_id {
            return Err(BusinessError::rule("users cannot deactivate themselves").into());
        }
        let mut user = self.load(user_id).await?;
        if !user.is_active {
            return Ok(user);
        }
        if user.role.is_privileged() {
            self.ctx.authorize(actor, Permission::ManageRoles)?;
        }
        if !UserRepo::deactivate_keeping_super_admin(self.ctx.pool(), &user.id).await? {
            return Err(last_super_admin(&user).into());
        }
        info!(actor = %actor.username, user = %user.username, "user deactivated");
        user.is_active = false;
        Ok(user)
    }

    pub async fn activate(&self, actor: &User, user_id: &str) -> BusinessResult<User> {
        self.ctx.authorize(actor, Permission::ManageUsers)?;
        let mut user = self.load(user_id).await?;
        if user.is_active {
            return Ok(user);
        }
        UserRepo::set_active(self.ctx.pool(), &user.id, true).await?;
        info!(actor = %actor.username, user = %user.username, "user activated");
        user.is_active = true;
        Ok(user)
    }

    async fn load(&self, user_id: &str) -> BusinessResult<User> {
        UserRepo::get_by_id(self.ctx.pool(), user_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    BusinessError::not_found("User", user_id)
                } else {
                    BusinessError::from(e)
                }
            })
            .map_err(Into::into)
    }
}

/// UPDATE có điều kiện không khớp row: user là super admin active cuối cùng
fn last_super_admin(user: &User) -> BusinessError {
    BusinessError::rule(format!("{} is the last active super admin", user.username))
}
