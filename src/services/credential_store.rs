//! The slice of user storage the auth gate depends on.

use async_trait::async_trait;

use crate::db::{InsertUserError, Store};
use crate::models::user::{UserCredentials, UserStatus};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserCredentials>>;

    async fn find_role_and_approval(&self, username: &str) -> anyhow::Result<Option<UserStatus>>;

    /// The first account ever becomes an approved admin; later ones are
    /// unapproved users.
    async fn insert_with_auto_role(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserStatus, InsertUserError>;
}

#[async_trait]
impl CredentialStore for Store {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserCredentials>> {
        self.find_user_credentials(username).await
    }

    async fn find_role_and_approval(&self, username: &str) -> anyhow::Result<Option<UserStatus>> {
        self.find_user_status(username).await
    }

    async fn insert_with_auto_role(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserStatus, InsertUserError> {
        self.insert_user_with_auto_role(username, password_hash)
            .await
    }
}
