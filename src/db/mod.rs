use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::models::inventory::{Device, DeviceInput, DeviceListItem, DeviceModel, Location, Vendor};
use crate::models::user::{User, UserCredentials, UserStatus};

pub mod migrator;
pub mod queries;
pub mod repositories;
pub mod seed;

pub use queries::QueryCatalog;
pub use repositories::user::InsertUserError;

/// Database constraint a failed write tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    ForeignKey,
}

/// Classifies a store error as a constraint violation, if it is one.
#[must_use]
pub fn violated_constraint(err: &anyhow::Error) -> Option<Constraint> {
    let db_err = err.downcast_ref::<DbErr>()?;
    match db_err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some(Constraint::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => Some(Constraint::ForeignKey),
        // SQLite reports RESTRICT failures (1811) under a code sea-orm does not classify.
        _ if db_err.to_string().contains("FOREIGN KEY constraint failed") => {
            Some(Constraint::ForeignKey)
        }
        _ => None,
    }
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,

    queries: Arc<QueryCatalog>,
}

impl Store {
    pub async fn new(db_url: &str, queries: Arc<QueryCatalog>) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1, queries).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        queries: Arc<QueryCatalog>,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn, queries })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone(), self.queries.clone())
    }

    fn vendor_repo(&self) -> repositories::vendor::VendorRepository {
        repositories::vendor::VendorRepository::new(self.conn.clone())
    }

    fn device_model_repo(&self) -> repositories::device_model::DeviceModelRepository {
        repositories::device_model::DeviceModelRepository::new(
            self.conn.clone(),
            self.queries.clone(),
        )
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn device_repo(&self) -> repositories::device::DeviceRepository {
        repositories::device::DeviceRepository::new(self.conn.clone(), self.queries.clone())
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub async fn find_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        self.user_repo().find_credentials(username).await
    }

    pub async fn find_user_status(&self, username: &str) -> Result<Option<UserStatus>> {
        self.user_repo().find_status(username).await
    }

    pub async fn insert_user_with_auto_role(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserStatus, InsertUserError> {
        self.user_repo()
            .insert_with_auto_role(username, password_hash)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn list_pending_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_pending().await
    }

    pub async fn set_user_approved(&self, id: i32, approved: bool) -> Result<bool> {
        self.user_repo().set_approved(id, approved).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // ------------------------------------------------------------------------
    // Vendors
    // ------------------------------------------------------------------------

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        self.vendor_repo().list().await
    }

    pub async fn create_vendor(&self, name: &str, country: Option<&str>) -> Result<i32> {
        self.vendor_repo().create(name, country).await
    }

    pub async fn update_vendor(&self, id: i32, name: &str, country: Option<&str>) -> Result<bool> {
        self.vendor_repo().update(id, name, country).await
    }

    pub async fn delete_vendor(&self, id: i32) -> Result<bool> {
        self.vendor_repo().delete(id).await
    }

    pub async fn count_vendors(&self) -> Result<u64> {
        self.vendor_repo().count().await
    }

    pub async fn first_vendor_id(&self) -> Result<Option<i32>> {
        self.vendor_repo().first_id().await
    }

    // ------------------------------------------------------------------------
    // Device models
    // ------------------------------------------------------------------------

    pub async fn list_device_models(&self) -> Result<Vec<DeviceModel>> {
        self.device_model_repo().list().await
    }

    pub async fn create_device_model(
        &self,
        vendor_id: i32,
        name: &str,
        device_type: Option<&str>,
    ) -> Result<i32> {
        self.device_model_repo()
            .create(vendor_id, name, device_type)
            .await
    }

    pub async fn update_device_model(
        &self,
        id: i32,
        vendor_id: i32,
        name: &str,
        device_type: Option<&str>,
    ) -> Result<bool> {
        self.device_model_repo()
            .update(id, vendor_id, name, device_type)
            .await
    }

    pub async fn delete_device_model(&self, id: i32) -> Result<bool> {
        self.device_model_repo().delete(id).await
    }

    pub async fn count_device_models(&self) -> Result<u64> {
        self.device_model_repo().count().await
    }

    pub async fn device_model_exists(&self, id: i32) -> Result<bool> {
        self.device_model_repo().exists(id).await
    }

    // ------------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------------

    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.location_repo().list().await
    }

    pub async fn create_location(&self, name: &str, note: Option<&str>) -> Result<i32> {
        self.location_repo().create(name, note).await
    }

    pub async fn update_location(&self, id: i32, name: &str, note: Option<&str>) -> Result<bool> {
        self.location_repo().update(id, name, note).await
    }

    pub async fn delete_location(&self, id: i32) -> Result<bool> {
        self.location_repo().delete(id).await
    }

    pub async fn count_locations(&self) -> Result<u64> {
        self.location_repo().count().await
    }

    pub async fn location_exists(&self, id: i32) -> Result<bool> {
        self.location_repo().exists(id).await
    }

    // ------------------------------------------------------------------------
    // Devices
    // ------------------------------------------------------------------------

    pub async fn list_devices(&self, query: &str) -> Result<Vec<DeviceListItem>> {
        self.device_repo().list(query).await
    }

    pub async fn get_device(&self, id: i32) -> Result<Option<Device>> {
        self.device_repo().get(id).await
    }

    pub async fn create_device(&self, input: &DeviceInput) -> Result<i32> {
        self.device_repo().create(input).await
    }

    pub async fn update_device(&self, id: i32, input: &DeviceInput) -> Result<bool> {
        self.device_repo().update(id, input).await
    }

    pub async fn delete_device(&self, id: i32) -> Result<bool> {
        self.device_repo().delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> Store {
        let path =
            std::env::temp_dir().join(format!("telecombase-store-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite:{}", path.display());
        Store::new(&url, Arc::new(QueryCatalog::builtin().unwrap()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_deleting_referenced_rows_is_a_foreign_key_violation() {
        let store = temp_store().await;
        let vendor = store.create_vendor("Cisco", None).await.unwrap();
        let model = store
            .create_device_model(vendor, "ISR 4321", None)
            .await
            .unwrap();
        let location = store.create_location("Main office", None).await.unwrap();
        store
            .create_device(&DeviceInput {
                model_id: model,
                location_id: Some(location),
                serial_number: Some("FGL2231".to_string()),
                inventory_number: None,
                status: "active".to_string(),
                installed_at: None,
                description: None,
            })
            .await
            .unwrap();

        let err = store.delete_vendor(vendor).await.unwrap_err();
        assert_eq!(violated_constraint(&err), Some(Constraint::ForeignKey));

        let err = store.delete_device_model(model).await.unwrap_err();
        assert_eq!(violated_constraint(&err), Some(Constraint::ForeignKey));

        let err = store.delete_location(location).await.unwrap_err();
        assert_eq!(violated_constraint(&err), Some(Constraint::ForeignKey));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_unique_violation() {
        let store = temp_store().await;
        store.insert_user_with_auto_role("alice", "h").await.unwrap();

        let backend = store.conn.get_database_backend();
        let err: anyhow::Error = store
            .conn
            .execute(Statement::from_string(
                backend,
                "INSERT INTO users (username, password_hash, role, approved, created_at) \
                 VALUES ('alice', 'h', 'user', 0, '2024-01-01T00:00:00Z')"
                    .to_string(),
            ))
            .await
            .unwrap_err()
            .into();
        assert_eq!(violated_constraint(&err), Some(Constraint::Unique));
    }

    #[tokio::test]
    async fn test_migration_indexes_foreign_keys() {
        let store = temp_store().await;
        let backend = store.conn.get_database_backend();
        let rows = store
            .conn
            .query_all(Statement::from_string(
                backend,
                "SELECT name FROM sqlite_master WHERE type = 'index'".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|row| row.try_get::<String>("", "name").unwrap())
            .collect();

        for index in [
            "idx_models_vendor_id",
            "idx_devices_model_id",
            "idx_devices_location_id",
        ] {
            assert!(names.iter().any(|n| n == index), "missing {index}");
        }
    }

    #[test]
    fn test_non_database_error_is_unclassified() {
        assert_eq!(violated_constraint(&anyhow::anyhow!("boom")), None);
    }
}
