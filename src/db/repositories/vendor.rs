use crate::entities::{prelude::*, vendors};
use crate::models::inventory::Vendor;
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use tracing::info;

/// Repository for vendor operations
pub struct VendorRepository {
    conn: DatabaseConnection,
}

impl VendorRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(v: vendors::Model) -> Vendor {
        Vendor {
            id: v.id,
            name: v.name,
            country: v.country.unwrap_or_default(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Vendor>> {
        let rows = Vendors::find()
            .order_by_asc(vendors::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list vendors")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn create(&self, name: &str, country: Option<&str>) -> Result<i32> {
        let active_model = vendors::ActiveModel {
            name: Set(name.to_string()),
            country: Set(country.map(str::to_string)),
            ..Default::default()
        };

        let res = Vendors::insert(active_model).exec(&self.conn).await?;
        info!("Added vendor {}: {}", res.last_insert_id, name);
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, name: &str, country: Option<&str>) -> Result<bool> {
        let result = Vendors::update_many()
            .col_expr(vendors::Column::Name, Expr::value(name))
            .col_expr(
                vendors::Column::Country,
                Expr::value(country.map(str::to_string)),
            )
            .filter(vendors::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Vendors::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Vendors::find().count(&self.conn).await?)
    }

    pub async fn first_id(&self) -> Result<Option<i32>> {
        let id = Vendors::find()
            .select_only()
            .column(vendors::Column::Id)
            .order_by_asc(vendors::Column::Id)
            .into_tuple::<i32>()
            .one(&self.conn)
            .await?;

        Ok(id)
    }
}
