//! `SeaORM` implementation of the `UserAdminService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::models::user::{Role, User};
use crate::services::user_service::{UserAdminError, UserAdminService};

pub struct SeaOrmUserService {
    store: Store,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_user(&self, id: i32) -> Result<User, UserAdminError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(UserAdminError::NotFound)
    }
}

#[async_trait]
impl UserAdminService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<User>, UserAdminError> {
        Ok(self.store.list_users().await?)
    }

    async fn list_pending(&self) -> Result<Vec<User>, UserAdminError> {
        Ok(self.store.list_pending_users().await?)
    }

    async fn approve(&self, id: i32) -> Result<(), UserAdminError> {
        if !self.store.set_user_approved(id, true).await? {
            return Err(UserAdminError::NotFound);
        }
        info!(user_id = id, "Approved user");
        Ok(())
    }

    async fn set_approval(&self, id: i32, approved: bool) -> Result<(), UserAdminError> {
        let target = self.require_user(id).await?;
        if target.role == Role::Admin && !approved {
            return Err(UserAdminError::CannotDisableAdmin);
        }

        if !self.store.set_user_approved(id, approved).await? {
            return Err(UserAdminError::NotFound);
        }
        info!(user_id = id, approved, "Changed user approval");
        Ok(())
    }

    async fn delete(&self, actor: &str, id: i32) -> Result<(), UserAdminError> {
        let target = self.require_user(id).await?;
        if target.username == actor {
            return Err(UserAdminError::CannotDeleteSelf);
        }
        if target.role == Role::Admin {
            return Err(UserAdminError::CannotDeleteAdmin);
        }

        if !self.store.delete_user(id).await? {
            return Err(UserAdminError::NotFound);
        }
        info!(user_id = id, username = %target.username, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::QueryCatalog;
    use std::sync::Arc;

    async fn setup() -> (SeaOrmUserService, Store, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("telecombase-users-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite:{}", path.display());
        let store = Store::new(&url, Arc::new(QueryCatalog::builtin().unwrap()))
            .await
            .unwrap();
        (SeaOrmUserService::new(store.clone()), store, path)
    }

    async fn user_id(store: &Store, username: &str) -> i32 {
        store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .find(|u| u.username == username)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_approval_lifecycle() {
        let (service, store, path) = setup().await;
        store.insert_user_with_auto_role("alice", "h").await.unwrap();
        store.insert_user_with_auto_role("bob", "h").await.unwrap();
        store.insert_user_with_auto_role("carol", "h").await.unwrap();

        let pending: Vec<_> = service
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(pending, vec!["bob", "carol"]);

        let bob = user_id(&store, "bob").await;
        service.approve(bob).await.unwrap();
        assert!(store.find_user_status("bob").await.unwrap().unwrap().approved);

        service.set_approval(bob, false).await.unwrap();
        assert!(!store.find_user_status("bob").await.unwrap().unwrap().approved);

        assert!(matches!(service.approve(9_999).await, Err(UserAdminError::NotFound)));
        assert!(matches!(
            service.set_approval(9_999, true).await,
            Err(UserAdminError::NotFound)
        ));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_admin_cannot_be_disabled() {
        let (service, store, path) = setup().await;
        store.insert_user_with_auto_role("alice", "h").await.unwrap();
        let alice = user_id(&store, "alice").await;

        assert!(matches!(
            service.set_approval(alice, false).await,
            Err(UserAdminError::CannotDisableAdmin)
        ));
        service.set_approval(alice, true).await.unwrap();

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let (service, store, path) = setup().await;
        store.insert_user_with_auto_role("alice", "h").await.unwrap();
        store.insert_user_with_auto_role("bob", "h").await.unwrap();
        let alice = user_id(&store, "alice").await;
        let bob = user_id(&store, "bob").await;

        assert!(matches!(
            service.delete("alice", alice).await,
            Err(UserAdminError::CannotDeleteSelf)
        ));
        assert!(matches!(
            service.delete("bob", alice).await,
            Err(UserAdminError::CannotDeleteAdmin)
        ));
        assert!(matches!(
            service.delete("alice", 9_999).await,
            Err(UserAdminError::NotFound)
        ));

        service.delete("alice", bob).await.unwrap();
        assert!(store.get_user(bob).await.unwrap().is_none());

        std::fs::remove_file(path).ok();
    }
}
