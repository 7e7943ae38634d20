//! Approval zone models: discovered assets awaiting promotion.

use cmdb_core::approval::{ApprovalState, DiscoveredFacts};
use cmdb_core::choices::AssetType;
use cmdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::asset::Asset;
use crate::models::event_log::EventLog;

/// A row from the `approval_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalEntry {
    pub id: DbId,
    #[sqlx(try_from = "i16")]
    pub asset_type: AssetType,
    pub serial_number: String,
    /// Manufacturer name as reported by discovery.
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub ram_size_gb: Option<i32>,
    pub cpu_model: Option<String>,
    pub cpu_count: i16,
    pub cpu_core_count: i16,
    pub os_type: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
    /// Opaque payload reported by the discovery agent.
    pub raw_data: String,
    pub approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ApprovalEntry {
    pub fn state(&self) -> ApprovalState {
        ApprovalState::from_flag(self.approved)
    }

    /// The model and OS facts carried over to the promoted asset.
    pub fn facts(&self) -> DiscoveredFacts {
        DiscoveredFacts {
            model: self.model.clone(),
            os_type: self.os_type.clone(),
            os_name: self.os_name.clone(),
            os_release: self.os_release.clone(),
        }
    }
}

fn one() -> i16 {
    1
}

/// DTO for submitting a discovered asset into the approval zone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApprovalEntry {
    #[serde(default)]
    pub asset_type: AssetType,
    pub serial_number: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub ram_size_gb: Option<i32>,
    pub cpu_model: Option<String>,
    #[serde(default = "one")]
    pub cpu_count: i16,
    #[serde(default = "one")]
    pub cpu_core_count: i16,
    pub os_type: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
    #[serde(default)]
    pub raw_data: String,
}

impl CreateApprovalEntry {
    pub fn new(asset_type: AssetType, serial_number: impl Into<String>) -> Self {
        Self {
            asset_type,
            serial_number: serial_number.into(),
            manufacturer: None,
            model: None,
            ram_size_gb: None,
            cpu_model: None,
            cpu_count: 1,
            cpu_core_count: 1,
            os_type: None,
            os_name: None,
            os_release: None,
            raw_data: String::new(),
        }
    }
}

/// Query parameters for listing approval entries. Newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalListParams {
    /// Only entries that have not been approved yet.
    #[serde(default)]
    pub pending_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Values supplied by the approver when promoting an entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApproveOptions {
    /// Asset name; defaults to the serial number.
    pub name: Option<String>,
    pub approver_id: Option<DbId>,
    pub business_unit_id: Option<DbId>,
    pub data_center_id: Option<DbId>,
}

/// Result of a successful promotion.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    pub entry: ApprovalEntry,
    pub asset: Asset,
    pub event: EventLog,
}
