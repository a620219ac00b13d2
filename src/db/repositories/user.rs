use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, Statement,
};
use std::sync::Arc;

use crate::db::queries::{self, QueryCatalog};
use crate::db::{Constraint, violated_constraint};
use crate::entities::{prelude::*, users};
use crate::models::user::{User, UserCredentials, UserStatus};

#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    #[error("Username already exists")]
    UniqueViolation,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, FromQueryResult)]
struct RoleApprovedRow {
    role: String,
    approved: bool,
}

pub struct UserRepository {
    conn: DatabaseConnection,
    queries: Arc<QueryCatalog>,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, queries: Arc<QueryCatalog>) -> Self {
        Self { conn, queries }
    }

    fn map_status(role: &str, approved: bool) -> Result<UserStatus> {
        Ok(UserStatus {
            role: role.parse()?,
            approved,
        })
    }

    fn map_user(model: users::Model) -> Result<User> {
        Ok(User {
            id: model.id,
            role: model.role.parse()?,
            username: model.username,
            approved: model.approved,
            created_at: model.created_at,
        })
    }

    async fn find_model(&self, username: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    /// Get password hash, role and approval for a username
    pub async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let Some(user) = self.find_model(username).await? else {
            return Ok(None);
        };

        Ok(Some(UserCredentials {
            status: Self::map_status(&user.role, user.approved)?,
            password_hash: user.password_hash,
        }))
    }

    /// Get the live role and approval flag for a username
    pub async fn find_status(&self, username: &str) -> Result<Option<UserStatus>> {
        self.find_model(username)
            .await?
            .map(|user| Self::map_status(&user.role, user.approved))
            .transpose()
    }

    /// Insert a user, promoting them to approved admin when no admin exists yet.
    pub async fn insert_with_auto_role(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserStatus, InsertUserError> {
        let sql = self.queries.get(queries::CREATE_USER_AUTO_ADMIN)?;
        let now = chrono::Utc::now().to_rfc3339();

        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            sql,
            [username.into(), password_hash.into(), now.into()],
        );

        let row = match RoleApprovedRow::find_by_statement(stmt).one(&self.conn).await {
            Ok(row) => row,
            Err(e) => {
                let err = anyhow::Error::from(e);
                if violated_constraint(&err) == Some(Constraint::Unique) {
                    return Err(InsertUserError::UniqueViolation);
                }
                return Err(err.context("Failed to insert user").into());
            }
        };

        let row = row.ok_or_else(|| anyhow::anyhow!("Insert returned no row for {username}"))?;
        Ok(Self::map_status(&row.role, row.approved)?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?
            .map(Self::map_user)
            .transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?
            .into_iter()
            .map(Self::map_user)
            .collect()
    }

    pub async fn list_pending(&self) -> Result<Vec<User>> {
        Users::find()
            .filter(users::Column::Approved.eq(false))
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list pending users")?
            .into_iter()
            .map(Self::map_user)
            .collect()
    }

    pub async fn set_approved(&self, id: i32, approved: bool) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                users::Column::Approved,
                sea_orm::sea_query::Expr::value(approved),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update user approval")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}
