//! User management commands

use anyhow::{Context, Result};
use nvcbank_business::{ServiceContext, UserManagementService};
use nvcbank_core::User;
use nvcbank_persistence::{Database, UserRepo};

use super::parse_role;
use crate::UserAction;

pub async fn handle(db: &Database, action: UserAction) -> Result<()> {
    let ctx = ServiceContext::new(db);
    let svc = UserManagementService::new(&ctx);

    match action {
        UserAction::Create {
            username,
            email,
            role,
            actor,
        } => {
            let actor = load_actor(&ctx, &actor).await?;
            let user = svc.create(&actor, &username, &email, parse_role(&role)?).await?;
            println!("✅ Created {} ({}) as {}", user.username, user.id, user.role);
        }

        UserAction::List { role } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            let users: Vec<User> = UserRepo::get_all(ctx.pool())
                .await?
                .into_iter()
                .filter(|u| role.map_or(true, |r| u.role == r))
                .collect();
            print_users(&users);
        }

        UserAction::Role {
            username,
            role,
            actor,
        } => {
            let actor = load_actor(&ctx, &actor).await?;
            let target = load_user(&ctx, &username).await?;
            let user = svc.change_role(&actor, &target.id, parse_role(&role)?).await?;
            println!("✅ {} is now {}", user.username, user.role);
        }

        UserAction::Deactivate { username, actor } => {
            let actor = load_actor(&ctx, &actor).await?;
            let target = load_user(&ctx, &username).await?;
            svc.deactivate(&actor, &target.id).await?;
            println!("🔒 {} deactivated", target.username);
        }

        UserAction::Activate { username, actor } => {
            let actor = load_actor(&ctx, &actor).await?;
            let target = load_user(&ctx, &username).await?;
            svc.activate(&actor, &target.id).await?;
            println!("🔓 {} activated", target.username);
        }
    }

    Ok(())
}

async fn load_user(ctx: &ServiceContext, username: &str) -> Result<User> {
    UserRepo::get_by_username(ctx.pool(), username)
        .await
        .with_context(|| format!("user '{}' not found", username))
}

/// Actor phải tồn tại và đang active
async fn load_actor(ctx: &ServiceContext, username: &str) -> Result<User> {
    let user = load_user(ctx, username).await?;
    UserManagementService::new(ctx).resolve_active(&user.id).await
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }
    println!("{:<36}  {:<20}  {:<20}  {:<8}  {}", "ID", "USERNAME", "ROLE", "ACTIVE", "LAST LOGIN");
    for u in users {
        let last_login = u
            .last_login
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36}  {:<20}  {:<20}  {:<8}  {}",
            u.id,
            u.username,
            u.role.as_str(),
            if u.is_active { "yes" } else { "no" },
            last_login
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvcbank_core::UserRole;

    async fn setup() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory(dir.path().join("errors")).await.unwrap();
        let ctx = ServiceContext::new(&db);
        UserManagementService::new(&ctx)
            .bootstrap_admin("root", "root@nvcbank.com")
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn test_create_and_change_role() {
        let (db, _dir) = setup().await;
        handle(
            &db,
            UserAction::Create {
                username: "alice".to_string(),
                email: "alice@nvcbank.com".to_string(),
                role: "customer".to_string(),
                actor: "root".to_string(),
            },
        )
        .await
        .unwrap();

        handle(
            &db,
            UserAction::Role {
                username: "alice".to_string(),
                role: "auditor".to_string(),
                actor: "root".to_string(),
            },
        )
        .await
        .unwrap();

        let alice = UserRepo::get_by_username(db.pool(), "alice").await.unwrap();
        assert_eq!(alice.role, UserRole::Auditor);
    }

    #[tokio::test]
    async fn test_unknown_actor_is_rejected() {
        let (db, _dir) = setup().await;
        let result = handle(
            &db,
            UserAction::Create {
                username: "bob".to_string(),
                email: "bob@nvcbank.com".to_string(),
                role: "customer".to_string(),
                actor: "mallory".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
        assert!(UserRepo::get_by_username(db.pool(), "bob").await.is_err());
    }
}
