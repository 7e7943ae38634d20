//! Repository for the local `users` mirror.

use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::user::{CreateUser, User};
use crate::repositories::asset_repo::{AssetReference, AssetRepo};

const COLUMNS: &str = "id, username, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> DbResult<User> {
        validate_required("username", &input.username)?;
        let query = format!("INSERT INTO users (username) VALUES ($1) RETURNING {COLUMNS}");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY username");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Rename a user. Returns `None` if no row with `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &CreateUser) -> DbResult<Option<User>> {
        validate_required("username", &input.username)?;
        let query = format!("UPDATE users SET username = $2 WHERE id = $1 RETURNING {COLUMNS}");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a user. Assets they administer or approved are deleted with
    /// them; their events are kept without attribution.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        AssetRepo::delete_referencing(&mut tx, AssetReference::User, id).await?;
        sqlx::query("UPDATE event_logs SET user_id = NULL WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
