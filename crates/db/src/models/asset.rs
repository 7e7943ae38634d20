//! Asset registry models and DTOs.

use std::net::IpAddr;

use cmdb_core::choices::{AssetStatus, AssetType};
use cmdb_core::kind::AssetKind;
use cmdb_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::specialization::Specialization;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    #[sqlx(try_from = "i16")]
    pub asset_type: AssetType,
    pub name: String,
    pub serial_number: String,
    pub business_unit_id: Option<DbId>,
    #[sqlx(try_from = "i16")]
    pub status: AssetStatus,
    pub manufacturer_id: Option<DbId>,
    pub management_ip: Option<String>,
    pub admin_id: Option<DbId>,
    pub data_center_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub purchase_date: Option<Date>,
    pub expire_date: Option<Date>,
    pub price: Option<f64>,
    pub approver_id: Option<DbId>,
    pub memo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An asset with its specialization payload and tag ids.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub specialization: Option<Specialization>,
    pub tag_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating an asset together with its specialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub name: String,
    pub serial_number: String,
    /// Asset type and specialization payload.
    pub kind: AssetKind,
    #[serde(default)]
    pub status: AssetStatus,
    pub business_unit_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub management_ip: Option<IpAddr>,
    pub admin_id: Option<DbId>,
    pub data_center_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub purchase_date: Option<Date>,
    pub expire_date: Option<Date>,
    pub price: Option<f64>,
    pub approver_id: Option<DbId>,
    pub memo: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

impl CreateAsset {
    /// Minimal input: name, serial number and kind; everything else empty.
    pub fn new(name: impl Into<String>, serial_number: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            serial_number: serial_number.into(),
            kind,
            status: AssetStatus::default(),
            business_unit_id: None,
            manufacturer_id: None,
            management_ip: None,
            admin_id: None,
            data_center_id: None,
            contract_id: None,
            purchase_date: None,
            expire_date: None,
            price: None,
            approver_id: None,
            memo: None,
            tag_ids: Vec::new(),
        }
    }
}

/// DTO for updating an existing asset. The asset type cannot change.
///
/// Nullable columns are `Option<Option<T>>`: an absent field keeps the stored
/// value, an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<AssetStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub business_unit_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub manufacturer_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub management_ip: Option<Option<IpAddr>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub admin_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub data_center_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub contract_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub purchase_date: Option<Option<Date>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expire_date: Option<Option<Date>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub price: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub approver_id: Option<Option<DbId>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub memo: Option<Option<String>>,
    /// When present, replaces the asset's tag set.
    pub tag_ids: Option<Vec<DbId>>,
}

/// Query parameters for listing assets. Results are newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    pub asset_type: Option<AssetType>,
    pub status: Option<AssetStatus>,
    pub business_unit_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub data_center_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
