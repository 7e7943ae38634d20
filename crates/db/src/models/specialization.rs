//! Type specialization rows and patches.

use std::net::IpAddr;

use cmdb_core::choices::{
    AssetType, CreationMode, NetworkDeviceSubType, SecurityDeviceSubType, ServerSubType,
    StorageDeviceSubType,
};
use cmdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `servers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServerRecord {
    pub id: DbId,
    pub asset_id: DbId,
    #[sqlx(try_from = "i16")]
    pub sub_type: ServerSubType,
    #[sqlx(try_from = "i16")]
    pub creation_mode: CreationMode,
    pub host_asset_id: Option<DbId>,
    pub model: Option<String>,
    pub raid_type: Option<String>,
    pub os_type: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `network_devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NetworkDeviceRecord {
    pub id: DbId,
    pub asset_id: DbId,
    #[sqlx(try_from = "i16")]
    pub sub_type: NetworkDeviceSubType,
    pub model: Option<String>,
    pub vlan_ip: Option<String>,
    pub intranet_ip: Option<String>,
    pub firmware: Option<String>,
    pub port_count: Option<i16>,
    pub config_detail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `storage_devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StorageDeviceRecord {
    pub id: DbId,
    pub asset_id: DbId,
    #[sqlx(try_from = "i16")]
    pub sub_type: StorageDeviceSubType,
    pub model: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `security_devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SecurityDeviceRecord {
    pub id: DbId,
    pub asset_id: DbId,
    #[sqlx(try_from = "i16")]
    pub sub_type: SecurityDeviceSubType,
    pub model: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The stored specialization of an asset, tagged by asset type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "asset_type", rename_all = "lowercase")]
pub enum Specialization {
    Server(ServerRecord),
    NetworkDevice(NetworkDeviceRecord),
    StorageDevice(StorageDeviceRecord),
    SecurityDevice(SecurityDeviceRecord),
}

impl Specialization {
    pub fn asset_type(&self) -> AssetType {
        match self {
            Specialization::Server(_) => AssetType::Server,
            Specialization::NetworkDevice(_) => AssetType::NetworkDevice,
            Specialization::StorageDevice(_) => AssetType::StorageDevice,
            Specialization::SecurityDevice(_) => AssetType::SecurityDevice,
        }
    }

    pub fn asset_id(&self) -> DbId {
        match self {
            Specialization::Server(r) => r.asset_id,
            Specialization::NetworkDevice(r) => r.asset_id,
            Specialization::StorageDevice(r) => r.asset_id,
            Specialization::SecurityDevice(r) => r.asset_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// Patch for a server specialization. Hosting is changed separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServer {
    pub sub_type: Option<ServerSubType>,
    pub creation_mode: Option<CreationMode>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub model: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub raid_type: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub os_type: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub os_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub os_release: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNetworkDevice {
    pub sub_type: Option<NetworkDeviceSubType>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub model: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub vlan_ip: Option<Option<IpAddr>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub intranet_ip: Option<Option<IpAddr>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub firmware: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub port_count: Option<Option<i16>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub config_detail: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStorageDevice {
    pub sub_type: Option<StorageDeviceSubType>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub model: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSecurityDevice {
    pub sub_type: Option<SecurityDeviceSubType>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub model: Option<Option<String>>,
}

/// A specialization patch, tagged by asset type.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "asset_type", rename_all = "lowercase")]
pub enum UpdateSpecialization {
    Server(UpdateServer),
    NetworkDevice(UpdateNetworkDevice),
    StorageDevice(UpdateStorageDevice),
    SecurityDevice(UpdateSecurityDevice),
}

/// Request to (re)assign or clear a server's host.
#[derive(Debug, Clone, Deserialize)]
pub struct SetHost {
    pub host_asset_id: Option<DbId>,
}
