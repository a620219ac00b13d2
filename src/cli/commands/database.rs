//! Schema and reference data command handlers

use crate::config::Config;
use crate::db::seed::seed_if_empty;
use crate::state::connect_store;

/// Connecting runs pending migrations, so there is nothing else to do.
pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    connect_store(config).await?;
    println!("✓ Migrations applied to {}", config.general.database_url);
    Ok(())
}

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    seed_if_empty(&store).await?;
    println!("✓ Demo data present");
    Ok(())
}
