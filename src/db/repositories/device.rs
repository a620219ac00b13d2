use crate::db::queries::{self, QueryCatalog};
use crate::entities::{devices, prelude::*};
use crate::models::inventory::{Device, DeviceInput, DeviceListItem};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    Set, Statement, sea_query::Expr,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, FromQueryResult)]
struct DeviceListRow {
    id: i32,
    vendor_name: String,
    model_name: String,
    location_name: String,
    serial_number: String,
    inventory_number: String,
    status: String,
    installed_at: String,
}

/// Repository for device operations
pub struct DeviceRepository {
    conn: DatabaseConnection,
    queries: Arc<QueryCatalog>,
}

impl DeviceRepository {
    pub fn new(conn: DatabaseConnection, queries: Arc<QueryCatalog>) -> Self {
        Self { conn, queries }
    }

    fn map_model(d: devices::Model) -> Device {
        Device {
            id: d.id,
            model_id: d.model_id,
            location_id: d.location_id,
            serial_number: d.serial_number.unwrap_or_default(),
            inventory_number: d.inventory_number.unwrap_or_default(),
            status: d.status,
            installed_at: d.installed_at.unwrap_or_default(),
            description: d.description.unwrap_or_default(),
        }
    }

    /// Devices joined with vendor, model and location names.
    /// A blank `query` returns everything; otherwise it is a substring filter.
    pub async fn list(&self, query: &str) -> Result<Vec<DeviceListItem>> {
        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            self.queries.get(queries::LIST_DEVICES)?,
            [query.trim().into()],
        );

        let rows = DeviceListRow::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to list devices")?;

        Ok(rows
            .into_iter()
            .map(|r| DeviceListItem {
                id: r.id,
                vendor_name: r.vendor_name,
                model_name: r.model_name,
                location_name: r.location_name,
                serial_number: r.serial_number,
                inventory_number: r.inventory_number,
                status: r.status,
                installed_at: r.installed_at,
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Device>> {
        let device = Devices::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query device by ID")?;

        Ok(device.map(Self::map_model))
    }

    pub async fn create(&self, input: &DeviceInput) -> Result<i32> {
        let active_model = devices::ActiveModel {
            model_id: Set(input.model_id),
            location_id: Set(input.location_id),
            serial_number: Set(input.serial_number.clone()),
            inventory_number: Set(input.inventory_number.clone()),
            status: Set(input.status.clone()),
            installed_at: Set(input.installed_at.clone()),
            description: Set(input.description.clone()),
            ..Default::default()
        };

        let res = Devices::insert(active_model).exec(&self.conn).await?;
        info!(
            "Added device {} (model {})",
            res.last_insert_id, input.model_id
        );
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, input: &DeviceInput) -> Result<bool> {
        let result = Devices::update_many()
            .col_expr(devices::Column::ModelId, Expr::value(input.model_id))
            .col_expr(devices::Column::LocationId, Expr::value(input.location_id))
            .col_expr(
                devices::Column::SerialNumber,
                Expr::value(input.serial_number.clone()),
            )
            .col_expr(
                devices::Column::InventoryNumber,
                Expr::value(input.inventory_number.clone()),
            )
            .col_expr(devices::Column::Status, Expr::value(input.status.clone()))
            .col_expr(
                devices::Column::InstalledAt,
                Expr::value(input.installed_at.clone()),
            )
            .col_expr(
                devices::Column::Description,
                Expr::value(input.description.clone()),
            )
            .filter(devices::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Devices::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
