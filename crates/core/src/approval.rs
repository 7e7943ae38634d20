//! Approval workflow for newly discovered assets.
//!
//! An approval entry starts `Pending` and moves to `Approved` exactly once,
//! when it is promoted into the asset table. There is no way back.

use serde::{Deserialize, Serialize};

use crate::choices::{AssetType, CreationMode, ServerSubType};
use crate::error::CoreError;
use crate::kind::{
    AssetKind, NetworkDeviceSpec, SecurityDeviceSpec, ServerSpec, StorageDeviceSpec,
};
use crate::types::DbId;

/// Lifecycle state of an approval entry, derived from its `approved` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    pub fn from_flag(approved: bool) -> Self {
        if approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }

    /// The single transition `Pending -> Approved`.
    pub fn approve(self, entry_id: DbId) -> Result<ApprovalState, CoreError> {
        match self {
            ApprovalState::Pending => Ok(ApprovalState::Approved),
            ApprovalState::Approved => Err(CoreError::AlreadyApproved { id: entry_id }),
        }
    }
}

/// Model and operating-system facts carried on a discovered entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredFacts {
    pub model: Option<String>,
    pub os_type: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
}

/// Build the specialization for a promoted entry.
///
/// Discovered servers are recorded as auto-created PC servers with the
/// discovered OS; other device types only carry the model.
pub fn promoted_kind(asset_type: AssetType, facts: DiscoveredFacts) -> AssetKind {
    match asset_type {
        AssetType::Server => AssetKind::Server(ServerSpec {
            sub_type: ServerSubType::Pc,
            creation_mode: CreationMode::Auto,
            host_asset_id: None,
            model: facts.model,
            raid_type: None,
            os_type: facts.os_type,
            os_name: facts.os_name,
            os_release: facts.os_release,
        }),
        AssetType::NetworkDevice => AssetKind::NetworkDevice(NetworkDeviceSpec {
            model: facts.model,
            ..Default::default()
        }),
        AssetType::StorageDevice => AssetKind::StorageDevice(StorageDeviceSpec {
            model: facts.model,
            ..Default::default()
        }),
        AssetType::SecurityDevice => AssetKind::SecurityDevice(SecurityDeviceSpec {
            model: facts.model,
            ..Default::default()
        }),
        AssetType::Software => AssetKind::Software,
    }
}

/// Name given to a promoted asset when the approver does not supply one.
pub fn default_asset_name(serial_number: &str) -> String {
    serial_number.trim().to_string()
}

/// Validate the CPU counts reported by discovery.
pub fn validate_cpu_counts(cpu_count: i16, cpu_core_count: i16) -> Result<(), CoreError> {
    if cpu_count < 1 || cpu_core_count < 1 {
        return Err(CoreError::Validation(format!(
            "cpu_count and cpu_core_count must be at least 1, got {cpu_count}/{cpu_core_count}"
        )));
    }
    Ok(())
}

/// Event log detail recorded when an entry is promoted.
pub fn approval_event_detail(serial_number: &str, asset_type: AssetType) -> String {
    format!("Approved pending asset {serial_number} ({asset_type:?}) into the inventory")
}
