//! Repository for the `software` table.

use cmdb_core::choices::SoftwareSubType;
use cmdb_core::error::CoreError;
use cmdb_core::kind::validate_required;
use cmdb_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::software::{CreateSoftware, Software, UpdateSoftware};

const COLUMNS: &str =
    "id, sub_type, version, license_key, license_count, created_at, updated_at";

fn validate_license_count(count: i16) -> Result<(), CoreError> {
    if count < 1 {
        return Err(CoreError::Validation(format!(
            "license_count must be at least 1, got {count}"
        )));
    }
    Ok(())
}

pub struct SoftwareRepo;

impl SoftwareRepo {
    pub async fn create(pool: &PgPool, input: &CreateSoftware) -> DbResult<Software> {
        validate_required("version", &input.version)?;
        validate_license_count(input.license_count)?;
        let query = format!(
            "INSERT INTO software (sub_type, version, license_key, license_count)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Software>(&query)
            .bind(input.sub_type.code())
            .bind(&input.version)
            .bind(input.license_key.is_some())
            .bind(input.license_key.as_deref())
            .bind(input.license_count)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Software>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM software WHERE id = $1");
        sqlx::query_as::<_, Software>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Software>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM software ORDER BY version");
        sqlx::query_as::<_, Software>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSoftware,
    ) -> DbResult<Option<Software>> {
        if let Some(version) = &input.version {
            validate_required("version", version)?;
        }
        if let Some(count) = input.license_count {
            validate_license_count(count)?;
        }
        let query = format!(
            "UPDATE software SET
                sub_type = COALESCE($2, sub_type),
                version = COALESCE($3, version),
                license_key = CASE WHEN $4 THEN $5 ELSE license_key END,
                license_count = COALESCE($6, license_count)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Software>(&query)
            .bind(id)
            .bind(input.sub_type.map(SoftwareSubType::code))
            .bind(&input.version)
            .bind(&input.license_key)
            .bind(input.license_count)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM software WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
