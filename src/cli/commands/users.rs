//! User administration command handlers

use crate::config::Config;
use crate::services::{SeaOrmUserService, UserAdminError, UserAdminService};
use crate::state::connect_store;

pub async fn cmd_users_list(config: &Config) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    let users = SeaOrmUserService::new(store).list_users().await?;

    if users.is_empty() {
        println!("No users yet. The first account to register becomes admin.");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let state = if user.approved { "approved" } else { "pending" };
        println!(
            "{:>4}  {:<32} {:<6} {:<9} {}",
            user.id, user.username, user.role, state, user.created_at
        );
    }

    Ok(())
}

pub async fn cmd_users_approve(config: &Config, id: i32) -> anyhow::Result<()> {
    let store = connect_store(config).await?;

    match SeaOrmUserService::new(store).approve(id).await {
        Ok(()) => {
            println!("✓ Approved user #{id}");
            Ok(())
        }
        Err(UserAdminError::NotFound) => {
            println!("User with ID {id} not found.");
            println!("Use 'telecombase users list' to see IDs");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
