//! Repository for the `assets` table and its tag links.
//!
//! Asset deletion is an explicit multi-step cascade run inside one
//! transaction; reference-data repositories reuse it through
//! [`AssetRepo::delete_referencing`].

use cmdb_core::choices::{AssetStatus, AssetType};
use cmdb_core::error::CoreError;
use cmdb_core::kind::{validate_required, AssetKind};
use cmdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use cmdb_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::DbResult;
use crate::models::asset::{Asset, AssetDetail, AssetListParams, CreateAsset, UpdateAsset};
use crate::repositories::component_repo::ComponentRepo;
use crate::repositories::specialization_repo::SpecializationRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, asset_type, name, serial_number, business_unit_id, status, \
    manufacturer_id, management_ip, admin_id, data_center_id, contract_id, \
    purchase_date, expire_date, price, approver_id, memo, created_at, updated_at";

/// Asset columns that reference another table. Deleting the referenced row
/// deletes every asset pointing at it.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AssetReference {
    BusinessUnit,
    Manufacturer,
    DataCenter,
    Contract,
    User,
}

impl AssetReference {
    fn condition(self) -> &'static str {
        match self {
            AssetReference::BusinessUnit => "business_unit_id = $1",
            AssetReference::Manufacturer => "manufacturer_id = $1",
            AssetReference::DataCenter => "data_center_id = $1",
            AssetReference::Contract => "contract_id = $1",
            AssetReference::User => "admin_id = $1 OR approver_id = $1",
        }
    }
}

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert an asset together with its specialization and tag links.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> DbResult<AssetDetail> {
        validate_required("name", &input.name)?;
        validate_required("serial_number", &input.serial_number)?;
        input.kind.validate()?;

        let mut tx = pool.begin().await?;
        let asset = Self::insert_inner(&mut tx, input).await?;
        if let AssetKind::Server(spec) = &input.kind {
            if let Some(host) = spec.host_asset_id {
                SpecializationRepo::ensure_server_inner(&mut tx, host).await?;
            }
        }
        let specialization = SpecializationRepo::insert_inner(&mut tx, asset.id, &input.kind).await?;
        Self::set_tags_inner(&mut tx, asset.id, &input.tag_ids).await?;
        tx.commit().await?;

        Ok(AssetDetail {
            asset,
            specialization,
            tag_ids: input.tag_ids.clone(),
        })
    }

    /// Find an asset by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an asset by its unique serial number.
    pub async fn find_by_serial(
        pool: &PgPool,
        serial_number: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE serial_number = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(serial_number)
            .fetch_optional(pool)
            .await
    }

    /// Load an asset with its specialization and tag ids.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> DbResult<AssetDetail> {
        let mut conn = pool.acquire().await?;
        let asset = Self::find_inner(&mut conn, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Asset", id))?;
        let specialization =
            SpecializationRepo::find_inner(&mut conn, asset.id, asset.asset_type).await?;
        let tag_ids = Self::tag_ids_inner(&mut conn, asset.id).await?;
        Ok(AssetDetail {
            asset,
            specialization,
            tag_ids,
        })
    }

    /// List assets with optional filters, newest first.
    pub async fn list(pool: &PgPool, params: &AssetListParams) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE ($1::SMALLINT IS NULL OR asset_type = $1)
               AND ($2::SMALLINT IS NULL OR status = $2)
               AND ($3::BIGINT IS NULL OR business_unit_id = $3)
               AND ($4::BIGINT IS NULL OR manufacturer_id = $4)
               AND ($5::BIGINT IS NULL OR data_center_id = $5)
               AND ($6::BIGINT IS NULL OR contract_id = $6)
               AND ($7::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM asset_tags t WHERE t.asset_id = assets.id AND t.tag_id = $7))
               AND ($8::TEXT IS NULL OR name ILIKE '%' || $8 || '%')
             ORDER BY created_at DESC, id DESC
             LIMIT $9 OFFSET $10"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(params.asset_type.map(AssetType::code))
            .bind(params.status.map(AssetStatus::code))
            .bind(params.business_unit_id)
            .bind(params.manufacturer_id)
            .bind(params.data_center_id)
            .bind(params.contract_id)
            .bind(params.tag_id)
            .bind(params.name.as_deref())
            .bind(clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// All assets of one type, newest first.
    pub async fn find_by_type(
        pool: &PgPool,
        asset_type: AssetType,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE asset_type = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_type.code())
            .fetch_all(pool)
            .await
    }

    /// All assets in one status, newest first.
    pub async fn find_by_status(
        pool: &PgPool,
        status: AssetStatus,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE status = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(status.code())
            .fetch_all(pool)
            .await
    }

    /// All assets owned by one business unit, newest first.
    pub async fn find_by_business_unit(
        pool: &PgPool,
        business_unit_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE business_unit_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(business_unit_id)
            .fetch_all(pool)
            .await
    }

    /// Update an asset. Absent fields keep their value; nullable fields sent
    /// as `null` are cleared.
    ///
    /// When `tag_ids` is present the tag set is replaced in the same
    /// transaction.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateAsset) -> DbResult<Asset> {
        if let Some(name) = &input.name {
            validate_required("name", name)?;
        }
        if let Some(serial) = &input.serial_number {
            validate_required("serial_number", serial)?;
        }

        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                serial_number = COALESCE($3, serial_number),
                status = COALESCE($4, status),
                business_unit_id = CASE WHEN $5 THEN $6 ELSE business_unit_id END,
                manufacturer_id = CASE WHEN $7 THEN $8 ELSE manufacturer_id END,
                management_ip = CASE WHEN $9 THEN $10 ELSE management_ip END,
                admin_id = CASE WHEN $11 THEN $12 ELSE admin_id END,
                data_center_id = CASE WHEN $13 THEN $14 ELSE data_center_id END,
                contract_id = CASE WHEN $15 THEN $16 ELSE contract_id END,
                purchase_date = CASE WHEN $17 THEN $18 ELSE purchase_date END,
                expire_date = CASE WHEN $19 THEN $20 ELSE expire_date END,
                price = CASE WHEN $21 THEN $22 ELSE price END,
                approver_id = CASE WHEN $23 THEN $24 ELSE approver_id END,
                memo = CASE WHEN $25 THEN $26 ELSE memo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.serial_number)
            .bind(input.status.map(AssetStatus::code))
            .bind(input.business_unit_id.is_some())
            .bind(input.business_unit_id.flatten())
            .bind(input.manufacturer_id.is_some())
            .bind(input.manufacturer_id.flatten())
            .bind(input.management_ip.is_some())
            .bind(input.management_ip.flatten().map(|ip| ip.to_string()))
            .bind(input.admin_id.is_some())
            .bind(input.admin_id.flatten())
            .bind(input.data_center_id.is_some())
            .bind(input.data_center_id.flatten())
            .bind(input.contract_id.is_some())
            .bind(input.contract_id.flatten())
            .bind(input.purchase_date.is_some())
            .bind(input.purchase_date.flatten())
            .bind(input.expire_date.is_some())
            .bind(input.expire_date.flatten())
            .bind(input.price.is_some())
            .bind(input.price.flatten())
            .bind(input.approver_id.is_some())
            .bind(input.approver_id.flatten())
            .bind(input.memo.is_some())
            .bind(input.memo.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::not_found("Asset", id))?;

        if let Some(tag_ids) = &input.tag_ids {
            Self::set_tags_inner(&mut tx, id, tag_ids).await?;
        }
        tx.commit().await?;
        Ok(asset)
    }

    /// Delete an asset and everything that belongs to it.
    ///
    /// Returns `true` if the asset existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let deleted = Self::delete_inner(&mut tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    /// Replace the asset's tag set.
    pub async fn set_tags(pool: &PgPool, id: DbId, tag_ids: &[DbId]) -> DbResult<Vec<DbId>> {
        let mut tx = pool.begin().await?;
        Self::find_inner(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Asset", id))?;
        Self::set_tags_inner(&mut tx, id, tag_ids).await?;
        let tag_ids = Self::tag_ids_inner(&mut tx, id).await?;
        tx.commit().await?;
        Ok(tag_ids)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    pub(crate) async fn find_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Insert the asset row only.
    pub(crate) async fn insert_inner(
        conn: &mut PgConnection,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (asset_type, name, serial_number, business_unit_id, status,
                manufacturer_id, management_ip, admin_id, data_center_id, contract_id,
                purchase_date, expire_date, price, approver_id, memo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.kind.asset_type().code())
            .bind(&input.name)
            .bind(&input.serial_number)
            .bind(input.business_unit_id)
            .bind(input.status.code())
            .bind(input.manufacturer_id)
            .bind(input.management_ip.map(|ip| ip.to_string()))
            .bind(input.admin_id)
            .bind(input.data_center_id)
            .bind(input.contract_id)
            .bind(input.purchase_date)
            .bind(input.expire_date)
            .bind(input.price)
            .bind(input.approver_id)
            .bind(&input.memo)
            .fetch_one(&mut *conn)
            .await
    }

    async fn tag_ids_inner(conn: &mut PgConnection, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT tag_id FROM asset_tags WHERE asset_id = $1 ORDER BY tag_id",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await
    }

    async fn set_tags_inner(
        conn: &mut PgConnection,
        id: DbId,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM asset_tags WHERE asset_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        for &tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO asset_tags (asset_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Run the asset delete cascade inside an existing transaction.
    pub(crate) async fn delete_inner(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        // Event history survives the asset.
        sqlx::query("UPDATE event_logs SET asset_id = NULL WHERE asset_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        // Guests of a deleted host become unhosted.
        sqlx::query("UPDATE servers SET host_asset_id = NULL WHERE host_asset_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        ComponentRepo::delete_for_asset_inner(conn, id).await?;
        SpecializationRepo::delete_for_asset_inner(conn, id).await?;

        sqlx::query("DELETE FROM asset_tags WHERE asset_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(asset_id = id, "Asset deleted with dependents");
        }
        Ok(deleted)
    }

    /// Delete every asset that references `id` through `reference`.
    ///
    /// Returns the number of assets deleted.
    pub(crate) async fn delete_referencing(
        conn: &mut PgConnection,
        reference: AssetReference,
        id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "SELECT id FROM assets WHERE {} ORDER BY id",
            reference.condition()
        );
        let asset_ids = sqlx::query_scalar::<_, DbId>(&query)
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;

        let mut deleted = 0;
        for asset_id in asset_ids {
            if Self::delete_inner(conn, asset_id).await? {
                deleted += 1;
            }
        }
        if deleted > 0 {
            tracing::debug!(?reference, id, deleted, "Cascaded asset deletion");
        }
        Ok(deleted)
    }
}
