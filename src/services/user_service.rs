//! Domain service for administering accounts.
//!
//! Callers are expected to have passed the admin guard already; the
//! invariants here hold regardless of who is asking.

use thiserror::Error;

use crate::models::user::User;

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("User not found")]
    NotFound,

    #[error("Admin accounts cannot be disabled")]
    CannotDisableAdmin,

    #[error("Admin accounts cannot be deleted")]
    CannotDeleteAdmin,

    #[error("Users cannot delete themselves")]
    CannotDeleteSelf,

    #[error("Store error: {0}")]
    Store(String),
}

impl From<anyhow::Error> for UserAdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait UserAdminService: Send + Sync {
    /// All accounts ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, UserAdminError>;

    /// Unapproved accounts, oldest first.
    async fn list_pending(&self) -> Result<Vec<User>, UserAdminError>;

    async fn approve(&self, id: i32) -> Result<(), UserAdminError>;

    /// # Errors
    ///
    /// Returns [`UserAdminError::CannotDisableAdmin`] when `approved` is false
    /// and the target currently holds the admin role.
    async fn set_approval(&self, id: i32, approved: bool) -> Result<(), UserAdminError>;

    /// Deletes `id` on behalf of `actor` (a username).
    async fn delete(&self, actor: &str, id: i32) -> Result<(), UserAdminError>;
}
