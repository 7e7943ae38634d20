//! Repository for the type specialization tables (`servers`,
//! `network_devices`, `storage_devices`, `security_devices`).

use cmdb_core::choices::AssetType;
use cmdb_core::error::CoreError;
use cmdb_core::hosting::validate_host_assignment;
use cmdb_core::kind::AssetKind;
use cmdb_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::DbResult;
use crate::models::specialization::{
    NetworkDeviceRecord, SecurityDeviceRecord, ServerRecord, Specialization, StorageDeviceRecord,
    UpdateNetworkDevice, UpdateSecurityDevice, UpdateServer, UpdateSpecialization,
    UpdateStorageDevice,
};
use crate::repositories::asset_repo::AssetRepo;

const SERVER_COLUMNS: &str = "id, asset_id, sub_type, creation_mode, host_asset_id, model, \
    raid_type, os_type, os_name, os_release, created_at, updated_at";

const NETWORK_DEVICE_COLUMNS: &str = "id, asset_id, sub_type, model, vlan_ip, intranet_ip, \
    firmware, port_count, config_detail, created_at, updated_at";

const STORAGE_DEVICE_COLUMNS: &str = "id, asset_id, sub_type, model, created_at, updated_at";

const SECURITY_DEVICE_COLUMNS: &str = "id, asset_id, sub_type, model, created_at, updated_at";

/// Advisory lock key serializing host assignments across transactions.
const HOSTING_LOCK_KEY: i64 = 0x636d_6462_686f_7374;

/// Upper bound on hosting-chain traversal.
const MAX_CHAIN_DEPTH: i32 = 10_000;

pub struct SpecializationRepo;

impl SpecializationRepo {
    /// Load the specialization stored for an asset.
    ///
    /// Software assets have none and return `Ok(None)`.
    pub async fn find_for_asset(pool: &PgPool, asset_id: DbId) -> DbResult<Option<Specialization>> {
        let mut conn = pool.acquire().await?;
        let asset = AssetRepo::find_inner(&mut conn, asset_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Asset", asset_id))?;
        Ok(Self::find_inner(&mut conn, asset.id, asset.asset_type).await?)
    }

    /// Apply a patch to whichever specialization the payload names.
    pub async fn update(
        pool: &PgPool,
        asset_id: DbId,
        patch: &UpdateSpecialization,
    ) -> DbResult<Specialization> {
        Ok(match patch {
            UpdateSpecialization::Server(p) => {
                Specialization::Server(Self::update_server(pool, asset_id, p).await?)
            }
            UpdateSpecialization::NetworkDevice(p) => {
                Specialization::NetworkDevice(Self::update_network_device(pool, asset_id, p).await?)
            }
            UpdateSpecialization::StorageDevice(p) => {
                Specialization::StorageDevice(Self::update_storage_device(pool, asset_id, p).await?)
            }
            UpdateSpecialization::SecurityDevice(p) => Specialization::SecurityDevice(
                Self::update_security_device(pool, asset_id, p).await?,
            ),
        })
    }

    /// Patch a server specialization. Hosting is changed through
    /// [`SpecializationRepo::set_server_host`].
    pub async fn update_server(
        pool: &PgPool,
        asset_id: DbId,
        patch: &UpdateServer,
    ) -> DbResult<ServerRecord> {
        let query = format!(
            "UPDATE servers SET
                sub_type = COALESCE($2, sub_type),
                creation_mode = COALESCE($3, creation_mode),
                model = CASE WHEN $4 THEN $5 ELSE model END,
                raid_type = CASE WHEN $6 THEN $7 ELSE raid_type END,
                os_type = CASE WHEN $8 THEN $9 ELSE os_type END,
                os_name = CASE WHEN $10 THEN $11 ELSE os_name END,
                os_release = CASE WHEN $12 THEN $13 ELSE os_release END
             WHERE asset_id = $1
             RETURNING {SERVER_COLUMNS}"
        );
        sqlx::query_as::<_, ServerRecord>(&query)
            .bind(asset_id)
            .bind(patch.sub_type.map(|v| v.code()))
            .bind(patch.creation_mode.map(|v| v.code()))
            .bind(patch.model.is_some())
            .bind(patch.model.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.raid_type.is_some())
            .bind(patch.raid_type.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.os_type.is_some())
            .bind(patch.os_type.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.os_name.is_some())
            .bind(patch.os_name.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.os_release.is_some())
            .bind(patch.os_release.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found("Server", asset_id).into())
    }

    pub async fn update_network_device(
        pool: &PgPool,
        asset_id: DbId,
        patch: &UpdateNetworkDevice,
    ) -> DbResult<NetworkDeviceRecord> {
        if let Some(Some(ports)) = patch.port_count {
            if ports < 0 {
                return Err(CoreError::Validation(format!(
                    "port_count must not be negative, got {ports}"
                ))
                .into());
            }
        }
        let query = format!(
            "UPDATE network_devices SET
                sub_type = COALESCE($2, sub_type),
                model = CASE WHEN $3 THEN $4 ELSE model END,
                vlan_ip = CASE WHEN $5 THEN $6 ELSE vlan_ip END,
                intranet_ip = CASE WHEN $7 THEN $8 ELSE intranet_ip END,
                firmware = CASE WHEN $9 THEN $10 ELSE firmware END,
                port_count = CASE WHEN $11 THEN $12 ELSE port_count END,
                config_detail = CASE WHEN $13 THEN $14 ELSE config_detail END
             WHERE asset_id = $1
             RETURNING {NETWORK_DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, NetworkDeviceRecord>(&query)
            .bind(asset_id)
            .bind(patch.sub_type.map(|v| v.code()))
            .bind(patch.model.is_some())
            .bind(patch.model.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.vlan_ip.is_some())
            .bind(patch.vlan_ip.flatten().map(|ip| ip.to_string()))
            .bind(patch.intranet_ip.is_some())
            .bind(patch.intranet_ip.flatten().map(|ip| ip.to_string()))
            .bind(patch.firmware.is_some())
            .bind(patch.firmware.as_ref().and_then(|v| v.as_deref()))
            .bind(patch.port_count.is_some())
            .bind(patch.port_count.flatten())
            .bind(patch.config_detail.is_some())
            .bind(patch.config_detail.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found("NetworkDevice", asset_id).into())
    }

    pub async fn update_storage_device(
        pool: &PgPool,
        asset_id: DbId,
        patch: &UpdateStorageDevice,
    ) -> DbResult<StorageDeviceRecord> {
        let query = format!(
            "UPDATE storage_devices SET
                sub_type = COALESCE($2, sub_type),
                model = CASE WHEN $3 THEN $4 ELSE model END
             WHERE asset_id = $1
             RETURNING {STORAGE_DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, StorageDeviceRecord>(&query)
            .bind(asset_id)
            .bind(patch.sub_type.map(|v| v.code()))
            .bind(patch.model.is_some())
            .bind(patch.model.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found("StorageDevice", asset_id).into())
    }

    pub async fn update_security_device(
        pool: &PgPool,
        asset_id: DbId,
        patch: &UpdateSecurityDevice,
    ) -> DbResult<SecurityDeviceRecord> {
        let query = format!(
            "UPDATE security_devices SET
                sub_type = COALESCE($2, sub_type),
                model = CASE WHEN $3 THEN $4 ELSE model END
             WHERE asset_id = $1
             RETURNING {SECURITY_DEVICE_COLUMNS}"
        );
        sqlx::query_as::<_, SecurityDeviceRecord>(&query)
            .bind(asset_id)
            .bind(patch.sub_type.map(|v| v.code()))
            .bind(patch.model.is_some())
            .bind(patch.model.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found("SecurityDevice", asset_id).into())
    }

    /// Assign or clear the host of a server.
    ///
    /// The host must itself be a server, and following host links from it
    /// must never lead back to `asset_id`. Assignments are serialized with a
    /// transaction-scoped advisory lock so concurrent assignments cannot
    /// jointly close a cycle.
    pub async fn set_server_host(
        pool: &PgPool,
        asset_id: DbId,
        host_asset_id: Option<DbId>,
    ) -> DbResult<ServerRecord> {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(HOSTING_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM servers WHERE asset_id = $1 FOR UPDATE")
                .bind(asset_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(CoreError::not_found("Server", asset_id).into());
        }

        if let Some(host) = host_asset_id {
            Self::ensure_server_inner(&mut tx, host).await?;
            let chain = Self::hosting_chain_inner(&mut tx, host).await?;
            validate_host_assignment(asset_id, host, &chain)?;
        }

        let query = format!(
            "UPDATE servers SET host_asset_id = $2 WHERE asset_id = $1 RETURNING {SERVER_COLUMNS}"
        );
        let server = sqlx::query_as::<_, ServerRecord>(&query)
            .bind(asset_id)
            .bind(host_asset_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(server)
    }

    /// Servers hosted directly on `host_asset_id`.
    pub async fn list_hosted(
        pool: &PgPool,
        host_asset_id: DbId,
    ) -> Result<Vec<ServerRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVER_COLUMNS} FROM servers WHERE host_asset_id = $1 ORDER BY asset_id"
        );
        sqlx::query_as::<_, ServerRecord>(&query)
            .bind(host_asset_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert the specialization row implied by `kind`.
    pub(crate) async fn insert_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
        kind: &AssetKind,
    ) -> Result<Option<Specialization>, sqlx::Error> {
        let specialization = match kind {
            AssetKind::Server(spec) => {
                let query = format!(
                    "INSERT INTO servers (asset_id, sub_type, creation_mode, host_asset_id,
                        model, raid_type, os_type, os_name, os_release)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                     RETURNING {SERVER_COLUMNS}"
                );
                let row = sqlx::query_as::<_, ServerRecord>(&query)
                    .bind(asset_id)
                    .bind(spec.sub_type.code())
                    .bind(spec.creation_mode.code())
                    .bind(spec.host_asset_id)
                    .bind(&spec.model)
                    .bind(&spec.raid_type)
                    .bind(&spec.os_type)
                    .bind(&spec.os_name)
                    .bind(&spec.os_release)
                    .fetch_one(&mut *conn)
                    .await?;
                Specialization::Server(row)
            }
            AssetKind::NetworkDevice(spec) => {
                let query = format!(
                    "INSERT INTO network_devices (asset_id, sub_type, model, vlan_ip,
                        intranet_ip, firmware, port_count, config_detail)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                     RETURNING {NETWORK_DEVICE_COLUMNS}"
                );
                let row = sqlx::query_as::<_, NetworkDeviceRecord>(&query)
                    .bind(asset_id)
                    .bind(spec.sub_type.code())
                    .bind(&spec.model)
                    .bind(spec.vlan_ip.map(|ip| ip.to_string()))
                    .bind(spec.intranet_ip.map(|ip| ip.to_string()))
                    .bind(&spec.firmware)
                    .bind(spec.port_count)
                    .bind(&spec.config_detail)
                    .fetch_one(&mut *conn)
                    .await?;
                Specialization::NetworkDevice(row)
            }
            AssetKind::StorageDevice(spec) => {
                let query = format!(
                    "INSERT INTO storage_devices (asset_id, sub_type, model)
                     VALUES ($1, $2, $3)
                     RETURNING {STORAGE_DEVICE_COLUMNS}"
                );
                let row = sqlx::query_as::<_, StorageDeviceRecord>(&query)
                    .bind(asset_id)
                    .bind(spec.sub_type.code())
                    .bind(&spec.model)
                    .fetch_one(&mut *conn)
                    .await?;
                Specialization::StorageDevice(row)
            }
            AssetKind::SecurityDevice(spec) => {
                let query = format!(
                    "INSERT INTO security_devices (asset_id, sub_type, model)
                     VALUES ($1, $2, $3)
                     RETURNING {SECURITY_DEVICE_COLUMNS}"
                );
                let row = sqlx::query_as::<_, SecurityDeviceRecord>(&query)
                    .bind(asset_id)
                    .bind(spec.sub_type.code())
                    .bind(&spec.model)
                    .fetch_one(&mut *conn)
                    .await?;
                Specialization::SecurityDevice(row)
            }
            AssetKind::Software => return Ok(None),
        };
        Ok(Some(specialization))
    }

    pub(crate) async fn find_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
        asset_type: AssetType,
    ) -> Result<Option<Specialization>, sqlx::Error> {
        let specialization = match asset_type {
            AssetType::Server => {
                let query = format!("SELECT {SERVER_COLUMNS} FROM servers WHERE asset_id = $1");
                sqlx::query_as::<_, ServerRecord>(&query)
                    .bind(asset_id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Specialization::Server)
            }
            AssetType::NetworkDevice => {
                let query = format!(
                    "SELECT {NETWORK_DEVICE_COLUMNS} FROM network_devices WHERE asset_id = $1"
                );
                sqlx::query_as::<_, NetworkDeviceRecord>(&query)
                    .bind(asset_id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Specialization::NetworkDevice)
            }
            AssetType::StorageDevice => {
                let query = format!(
                    "SELECT {STORAGE_DEVICE_COLUMNS} FROM storage_devices WHERE asset_id = $1"
                );
                sqlx::query_as::<_, StorageDeviceRecord>(&query)
                    .bind(asset_id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Specialization::StorageDevice)
            }
            AssetType::SecurityDevice => {
                let query = format!(
                    "SELECT {SECURITY_DEVICE_COLUMNS} FROM security_devices WHERE asset_id = $1"
                );
                sqlx::query_as::<_, SecurityDeviceRecord>(&query)
                    .bind(asset_id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Specialization::SecurityDevice)
            }
            AssetType::Software => None,
        };
        Ok(specialization)
    }

    /// Fail with `InvalidReference` unless `asset_id` has a server row.
    pub(crate) async fn ensure_server_inner(conn: &mut PgConnection, asset_id: DbId) -> DbResult<()> {
        let found: Option<DbId> = sqlx::query_scalar("SELECT id FROM servers WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_optional(&mut *conn)
            .await?;
        match found {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidReference(format!(
                "host asset {asset_id} is not a server"
            ))
            .into()),
        }
    }

    /// The stored hosting chain starting at `asset_id`: the server itself,
    /// its host, that host's host, and so on.
    async fn hosting_chain_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "WITH RECURSIVE chain (asset_id, host_asset_id, depth) AS (
                SELECT asset_id, host_asset_id, 0 FROM servers WHERE asset_id = $1
                UNION ALL
                SELECT s.asset_id, s.host_asset_id, c.depth + 1
                FROM servers s
                JOIN chain c ON s.asset_id = c.host_asset_id
                WHERE c.depth < $2
             )
             SELECT asset_id FROM chain ORDER BY depth",
        )
        .bind(asset_id)
        .bind(MAX_CHAIN_DEPTH)
        .fetch_all(&mut *conn)
        .await
    }

    pub(crate) async fn delete_for_asset_inner(
        conn: &mut PgConnection,
        asset_id: DbId,
    ) -> Result<(), sqlx::Error> {
        for table in ["servers", "network_devices", "storage_devices", "security_devices"] {
            let query = format!("DELETE FROM {table} WHERE asset_id = $1");
            sqlx::query(&query).bind(asset_id).execute(&mut *conn).await?;
        }
        Ok(())
    }
}
