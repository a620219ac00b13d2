//! Demo reference data so a fresh install is usable out of the box.
//!
//! Only empty tables are touched, so running it repeatedly is harmless.

use anyhow::{Context, Result};
use tracing::info;

use super::Store;

/// Seed a vendor, a location and a model when their tables are empty.
pub async fn seed_if_empty(store: &Store) -> Result<()> {
    if store.count_vendors().await.context("seed vendors count")? == 0 {
        store
            .create_vendor("Cisco", Some("US"))
            .await
            .context("seed vendors")?;
        info!("Seeded demo vendor");
    }

    if store.count_locations().await.context("seed locations count")? == 0 {
        store
            .create_location("Main office", Some("Default location"))
            .await
            .context("seed locations")?;
        info!("Seeded demo location");
    }

    if store
        .count_device_models()
        .await
        .context("seed models count")?
        == 0
    {
        let vendor_id = store
            .first_vendor_id()
            .await
            .context("seed models vendor")?
            .ok_or_else(|| anyhow::anyhow!("seed models: no vendor available"))?;

        store
            .create_device_model(vendor_id, "ISR 4321", Some("router"))
            .await
            .context("seed models")?;
        info!("Seeded demo device model");
    }

    Ok(())
}
