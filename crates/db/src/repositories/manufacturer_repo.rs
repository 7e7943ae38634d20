//! Repository for the `manufacturers` table.

use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::DbResult;
use crate::models::reference::{CreateManufacturer, Manufacturer, UpdateManufacturer};
use crate::repositories::asset_repo::{AssetReference, AssetRepo};

const COLUMNS: &str = "id, name, telephone, memo, created_at, updated_at";

pub struct ManufacturerRepo;

impl ManufacturerRepo {
    pub async fn create(pool: &PgPool, input: &CreateManufacturer) -> DbResult<Manufacturer> {
        validate_required("name", &input.name)?;
        let query = format!(
            "INSERT INTO manufacturers (name, telephone, memo)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Manufacturer>(&query)
            .bind(&input.name)
            .bind(input.telephone.is_some())
            .bind(input.telephone.as_deref())
            .bind(input.memo.is_some())
            .bind(input.memo.as_deref())
            .fetch_one(pool)
            .await?)
    }

    /// Return the manufacturer with this name, creating it if needed.
    pub async fn get_or_create(pool: &PgPool, name: &str) -> DbResult<Manufacturer> {
        validate_required("name", name)?;
        let mut conn = pool.acquire().await?;
        Ok(Self::get_or_create_inner(&mut conn, name).await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers WHERE id = $1");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers WHERE name = $1");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all manufacturers ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers ORDER BY name");
        sqlx::query_as::<_, Manufacturer>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a manufacturer. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateManufacturer,
    ) -> DbResult<Option<Manufacturer>> {
        if let Some(name) = &input.name {
            validate_required("name", name)?;
        }
        let query = format!(
            "UPDATE manufacturers SET
                name = COALESCE($2, name),
                telephone = CASE WHEN $3 THEN $4 ELSE telephone END,
                memo = CASE WHEN $5 THEN $6 ELSE memo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.telephone.is_some())
            .bind(input.telephone.as_ref().and_then(|v| v.as_deref()))
            .bind(input.memo.is_some())
            .bind(input.memo.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a manufacturer and every asset it made.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        AssetRepo::delete_referencing(&mut tx, AssetReference::Manufacturer, id).await?;
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn get_or_create_inner(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Manufacturer, sqlx::Error> {
        sqlx::query("INSERT INTO manufacturers (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut *conn)
            .await?;
        let query = format!("SELECT {COLUMNS} FROM manufacturers WHERE name = $1");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(name)
            .fetch_one(&mut *conn)
            .await
    }
}
