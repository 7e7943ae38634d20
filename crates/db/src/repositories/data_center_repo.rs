//! Repository for the `data_centers` table.

use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::reference::{CreateDataCenter, DataCenter, UpdateDataCenter};
use crate::repositories::asset_repo::{AssetReference, AssetRepo};

const COLUMNS: &str = "id, name, memo, created_at, updated_at";

pub struct DataCenterRepo;

impl DataCenterRepo {
    pub async fn create(pool: &PgPool, input: &CreateDataCenter) -> DbResult<DataCenter> {
        validate_required("name", &input.name)?;
        let query = format!(
            "INSERT INTO data_centers (name, memo) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, DataCenter>(&query)
            .bind(&input.name)
            .bind(input.memo.is_some())
            .bind(input.memo.as_deref())
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DataCenter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM data_centers WHERE id = $1");
        sqlx::query_as::<_, DataCenter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<DataCenter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM data_centers ORDER BY name");
        sqlx::query_as::<_, DataCenter>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDataCenter,
    ) -> DbResult<Option<DataCenter>> {
        if let Some(name) = &input.name {
            validate_required("name", name)?;
        }
        let query = format!(
            "UPDATE data_centers SET
                name = COALESCE($2, name),
                memo = CASE WHEN $3 THEN $4 ELSE memo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, DataCenter>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.memo.is_some())
            .bind(input.memo.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a data center and every asset housed in it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        AssetRepo::delete_referencing(&mut tx, AssetReference::DataCenter, id).await?;
        let result = sqlx::query("DELETE FROM data_centers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
