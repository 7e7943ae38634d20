//! Asset kind: the asset type and its specialization payload as one value.
//!
//! An asset's `asset_type` is derived from its [`AssetKind`], so it is not
//! possible to describe a server asset carrying a network-device payload.
//! Software assets have no specialization table.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::choices::{
    AssetType, CreationMode, NetworkDeviceSubType, SecurityDeviceSubType, ServerSubType,
    StorageDeviceSubType,
};
use crate::error::CoreError;
use crate::types::DbId;

/// Server specialization payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSpec {
    pub sub_type: ServerSubType,
    pub creation_mode: CreationMode,
    /// Asset id of the physical server hosting this one (virtual machines).
    pub host_asset_id: Option<DbId>,
    pub model: Option<String>,
    pub raid_type: Option<String>,
    pub os_type: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
}

/// Network device specialization payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDeviceSpec {
    pub sub_type: NetworkDeviceSubType,
    pub model: Option<String>,
    pub vlan_ip: Option<IpAddr>,
    pub intranet_ip: Option<IpAddr>,
    pub firmware: Option<String>,
    pub port_count: Option<i16>,
    pub config_detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageDeviceSpec {
    pub sub_type: StorageDeviceSubType,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityDeviceSpec {
    pub sub_type: SecurityDeviceSubType,
    pub model: Option<String>,
}

/// Asset type together with its specialization payload.
///
/// Serialized with an internal `asset_type` tag, e.g.
/// `{"asset_type": "server", "sub_type": "blade", "model": "R740"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "asset_type", rename_all = "lowercase")]
pub enum AssetKind {
    Server(ServerSpec),
    NetworkDevice(NetworkDeviceSpec),
    StorageDevice(StorageDeviceSpec),
    SecurityDevice(SecurityDeviceSpec),
    Software,
}

impl AssetKind {
    /// The asset type implied by this kind.
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetKind::Server(_) => AssetType::Server,
            AssetKind::NetworkDevice(_) => AssetType::NetworkDevice,
            AssetKind::StorageDevice(_) => AssetType::StorageDevice,
            AssetKind::SecurityDevice(_) => AssetType::SecurityDevice,
            AssetKind::Software => AssetType::Software,
        }
    }

    /// A kind with default payload for the given type.
    pub fn default_for(asset_type: AssetType) -> Self {
        match asset_type {
            AssetType::Server => AssetKind::Server(ServerSpec::default()),
            AssetType::NetworkDevice => AssetKind::NetworkDevice(NetworkDeviceSpec::default()),
            AssetType::StorageDevice => AssetKind::StorageDevice(StorageDeviceSpec::default()),
            AssetType::SecurityDevice => AssetKind::SecurityDevice(SecurityDeviceSpec::default()),
            AssetType::Software => AssetKind::Software,
        }
    }

    /// Validate payload fields that the database cannot check on its own.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let AssetKind::NetworkDevice(spec) = self {
            if let Some(ports) = spec.port_count {
                if ports < 0 {
                    return Err(CoreError::Validation(format!(
                        "port_count must not be negative, got {ports}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Validate that a required identity field (name, serial number) is not blank.
pub fn validate_required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_type_follows_the_variant() {
        assert_eq!(
            AssetKind::Server(ServerSpec::default()).asset_type(),
            AssetType::Server
        );
        assert_eq!(AssetKind::Software.asset_type(), AssetType::Software);
        for t in AssetType::ALL {
            assert_eq!(AssetKind::default_for(*t).asset_type(), *t);
        }
    }

    #[test]
    fn deserializes_tagged_payload() {
        let kind: AssetKind = serde_json::from_value(serde_json::json!({
            "asset_type": "server",
            "sub_type": "blade",
            "model": "PowerEdge M640"
        }))
        .unwrap();
        match kind {
            AssetKind::Server(spec) => {
                assert_eq!(spec.sub_type, ServerSubType::Blade);
                assert_eq!(spec.creation_mode, CreationMode::Auto);
                assert_eq!(spec.model.as_deref(), Some("PowerEdge M640"));
            }
            other => panic!("expected server, got {other:?}"),
        }

        let software: AssetKind =
            serde_json::from_value(serde_json::json!({"asset_type": "software"})).unwrap();
        assert_eq!(software, AssetKind::Software);
    }

    #[test]
    fn network_device_ips_are_typed() {
        let kind: Result<AssetKind, _> = serde_json::from_value(serde_json::json!({
            "asset_type": "networkdevice",
            "vlan_ip": "not-an-ip"
        }));
        assert!(kind.is_err());
    }

    #[test]
    fn negative_port_count_rejected() {
        let kind = AssetKind::NetworkDevice(NetworkDeviceSpec {
            port_count: Some(-1),
            ..Default::default()
        });
        assert!(kind.validate().is_err());
    }

    #[test]
    fn blank_identity_rejected() {
        assert!(validate_required("name", "  ").is_err());
        assert!(validate_required("name", "web-01").is_ok());
    }
}
