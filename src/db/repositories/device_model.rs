use crate::db::queries::{self, QueryCatalog};
use crate::entities::{device_models, prelude::*};
use crate::models::inventory::DeviceModel;
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, Set, Statement, sea_query::Expr,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, FromQueryResult)]
struct DeviceModelRow {
    id: i32,
    vendor_id: i32,
    vendor_name: String,
    name: String,
    device_type: String,
}

/// Repository for device model operations
pub struct DeviceModelRepository {
    conn: DatabaseConnection,
    queries: Arc<QueryCatalog>,
}

impl DeviceModelRepository {
    pub fn new(conn: DatabaseConnection, queries: Arc<QueryCatalog>) -> Self {
        Self { conn, queries }
    }

    /// All models with their vendor name, ordered by vendor then model name
    pub async fn list(&self) -> Result<Vec<DeviceModel>> {
        let stmt = Statement::from_string(
            self.conn.get_database_backend(),
            self.queries.get(queries::LIST_MODELS)?,
        );

        let rows = DeviceModelRow::find_by_statement(stmt)
            .all(&self.conn)
            .await
            .context("Failed to list device models")?;

        Ok(rows
            .into_iter()
            .map(|r| DeviceModel {
                id: r.id,
                vendor_id: r.vendor_id,
                vendor_name: r.vendor_name,
                name: r.name,
                device_type: r.device_type,
            })
            .collect())
    }

    pub async fn create(
        &self,
        vendor_id: i32,
        name: &str,
        device_type: Option<&str>,
    ) -> Result<i32> {
        let active_model = device_models::ActiveModel {
            vendor_id: Set(vendor_id),
            name: Set(name.to_string()),
            device_type: Set(device_type.map(str::to_string)),
            ..Default::default()
        };

        let res = DeviceModels::insert(active_model).exec(&self.conn).await?;
        info!(
            "Added device model {} for vendor {}: {}",
            res.last_insert_id, vendor_id, name
        );
        Ok(res.last_insert_id)
    }

    pub async fn update(
        &self,
        id: i32,
        vendor_id: i32,
        name: &str,
        device_type: Option<&str>,
    ) -> Result<bool> {
        let result = DeviceModels::update_many()
            .col_expr(device_models::Column::VendorId, Expr::value(vendor_id))
            .col_expr(device_models::Column::Name, Expr::value(name))
            .col_expr(
                device_models::Column::DeviceType,
                Expr::value(device_type.map(str::to_string)),
            )
            .filter(device_models::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = DeviceModels::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(DeviceModels::find().count(&self.conn).await?)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = DeviceModels::find()
            .filter(device_models::Column::Id.eq(id))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }
}
