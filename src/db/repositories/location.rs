use crate::entities::{locations, prelude::*};
use crate::models::inventory::Location;
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

/// Repository for location operations
pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(l: locations::Model) -> Location {
        Location {
            id: l.id,
            name: l.name,
            note: l.note.unwrap_or_default(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Location>> {
        let rows = Locations::find()
            .order_by_asc(locations::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list locations")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn create(&self, name: &str, note: Option<&str>) -> Result<i32> {
        let active_model = locations::ActiveModel {
            name: Set(name.to_string()),
            note: Set(note.map(str::to_string)),
            ..Default::default()
        };

        let res = Locations::insert(active_model).exec(&self.conn).await?;
        info!("Added location {}: {}", res.last_insert_id, name);
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, name: &str, note: Option<&str>) -> Result<bool> {
        let result = Locations::update_many()
            .col_expr(locations::Column::Name, Expr::value(name))
            .col_expr(locations::Column::Note, Expr::value(note.map(str::to_string)))
            .filter(locations::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Locations::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Locations::find().count(&self.conn).await?)
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Locations::find()
            .filter(locations::Column::Id.eq(id))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }
}
