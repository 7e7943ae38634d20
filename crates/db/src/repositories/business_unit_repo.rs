//! Repository for the `business_units` tree.

use cmdb_core::error::CoreError;
use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::reference::{BusinessUnit, CreateBusinessUnit, UpdateBusinessUnit};
use crate::repositories::asset_repo::{AssetReference, AssetRepo};

const COLUMNS: &str = "id, parent_id, name, memo, created_at, updated_at";

pub struct BusinessUnitRepo;

impl BusinessUnitRepo {
    pub async fn create(pool: &PgPool, input: &CreateBusinessUnit) -> DbResult<BusinessUnit> {
        validate_required("name", &input.name)?;
        let query = format!(
            "INSERT INTO business_units (parent_id, name, memo)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, BusinessUnit>(&query)
            .bind(input.parent_id)
            .bind(&input.name)
            .bind(&input.memo)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BusinessUnit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_units WHERE id = $1");
        sqlx::query_as::<_, BusinessUnit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<BusinessUnit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_units ORDER BY name");
        sqlx::query_as::<_, BusinessUnit>(&query)
            .fetch_all(pool)
            .await
    }

    /// Direct children of a unit, ordered by name.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<BusinessUnit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_units WHERE parent_id = $1 ORDER BY name");
        sqlx::query_as::<_, BusinessUnit>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Update a unit. Moving a unit under one of its own descendants is
    /// rejected.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBusinessUnit,
    ) -> DbResult<Option<BusinessUnit>> {
        if let Some(name) = &input.name {
            validate_required("name", name)?;
        }

        let mut tx = pool.begin().await?;
        if let Some(Some(parent_id)) = input.parent_id {
            let ancestors = sqlx::query_scalar::<_, DbId>(
                "WITH RECURSIVE up (id, parent_id) AS (
                    SELECT id, parent_id FROM business_units WHERE id = $1
                    UNION
                    SELECT b.id, b.parent_id FROM business_units b JOIN up ON b.id = up.parent_id
                 )
                 SELECT id FROM up",
            )
            .bind(parent_id)
            .fetch_all(&mut *tx)
            .await?;
            if ancestors.contains(&id) {
                return Err(CoreError::InvalidReference(format!(
                    "business unit {id} cannot be placed under its own descendant {parent_id}"
                ))
                .into());
            }
        }

        let query = format!(
            "UPDATE business_units SET
                parent_id = CASE WHEN $2 THEN $3 ELSE parent_id END,
                name = COALESCE($4, name),
                memo = CASE WHEN $5 THEN $6 ELSE memo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let unit = sqlx::query_as::<_, BusinessUnit>(&query)
            .bind(id)
            .bind(input.parent_id.is_some())
            .bind(input.parent_id.flatten())
            .bind(&input.name)
            .bind(input.memo.is_some())
            .bind(input.memo.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(unit)
    }

    /// Delete a unit and every asset it owns. Child units are detached.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        AssetRepo::delete_referencing(&mut tx, AssetReference::BusinessUnit, id).await?;
        sqlx::query("UPDATE business_units SET parent_id = NULL WHERE parent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM business_units WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
