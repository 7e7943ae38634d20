//! Repository for the `contracts` table.

use cmdb_core::error::CoreError;
use cmdb_core::kind::validate_required;
use cmdb_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::reference::{Contract, CreateContract, UpdateContract};
use crate::repositories::asset_repo::{AssetReference, AssetRepo};

const COLUMNS: &str = "id, serial_number, name, price, description, memo, start_date, end_date, \
    created_at, updated_at";

fn validate_dates(start: Option<Date>, end: Option<Date>) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CoreError::Validation(format!(
                "contract start_date {start} is after end_date {end}"
            )));
        }
    }
    Ok(())
}

pub struct ContractRepo;

impl ContractRepo {
    pub async fn create(pool: &PgPool, input: &CreateContract) -> DbResult<Contract> {
        validate_required("serial_number", &input.serial_number)?;
        validate_required("name", &input.name)?;
        validate_dates(input.start_date, input.end_date)?;
        let query = format!(
            "INSERT INTO contracts (serial_number, name, price, description, memo,
                start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Contract>(&query)
            .bind(&input.serial_number)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .bind(input.memo.is_some())
            .bind(input.memo.as_deref())
            .bind(input.start_date.is_some())
            .bind(input.start_date)
            .bind(input.end_date.is_some())
            .bind(input.end_date)
            .fetch_one(pool)
            .await?)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Contract>(&query).fetch_all(pool).await
    }

    /// Update a contract. The date-order check runs in the store against
    /// the merged row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> DbResult<Option<Contract>> {
        if let Some(serial) = &input.serial_number {
            validate_required("serial_number", serial)?;
        }
        validate_dates(input.start_date.flatten(), input.end_date.flatten())?;
        let query = format!(
            "UPDATE contracts SET
                serial_number = COALESCE($2, serial_number),
                name = COALESCE($3, name),
                price = COALESCE($4, price),
                description = CASE WHEN $5 THEN $6 ELSE description END,
                memo = CASE WHEN $7 THEN $8 ELSE memo END,
                start_date = CASE WHEN $9 THEN $10 ELSE start_date END,
                end_date = CASE WHEN $11 THEN $12 ELSE end_date END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.serial_number)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.memo.is_some())
            .bind(input.memo.as_ref().and_then(|v| v.as_deref()))
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.end_date.is_some())
            .bind(input.end_date.flatten())
            .fetch_optional(pool)
            .await?)
    }

    /// Delete a contract and every asset bound to it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        AssetRepo::delete_referencing(&mut tx, AssetReference::Contract, id).await?;
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
