//! Repository for the `tags` table.

use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::reference::{CreateTag, Tag, UpdateTag};

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(pool: &PgPool, input: &CreateTag) -> DbResult<Tag> {
        validate_required("name", &input.name)?;
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {COLUMNS}");
        Ok(sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTag) -> DbResult<Option<Tag>> {
        if let Some(name) = &input.name {
            validate_required("name", name)?;
        }
        let query = format!(
            "UPDATE tags SET name = COALESCE($2, name) WHERE id = $1 RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a tag and its asset links. Tagged assets are kept.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM asset_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
