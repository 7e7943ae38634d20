//! Reference data: manufacturers, data centers, business units, contracts
//! and tags.

use cmdb_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Manufacturer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Manufacturer {
    pub id: DbId,
    pub name: String,
    pub telephone: Option<String>,
    pub memo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateManufacturer {
    pub name: String,
    pub telephone: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateManufacturer {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub telephone: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub memo: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// DataCenter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DataCenter {
    pub id: DbId,
    pub name: String,
    pub memo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataCenter {
    pub name: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDataCenter {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub memo: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// BusinessUnit
// ---------------------------------------------------------------------------

/// A business unit. Units form a tree through `parent_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessUnit {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub memo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusinessUnit {
    pub parent_id: Option<DbId>,
    pub name: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBusinessUnit {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<DbId>>,
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub memo: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub serial_number: String,
    pub name: String,
    /// Contract value in whole currency units.
    pub price: i64,
    pub description: Option<String>,
    pub memo: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub serial_number: String,
    pub name: String,
    #[serde(default)]
    pub price: i64,
    pub description: Option<String>,
    pub memo: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContract {
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub price: Option<i64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub memo: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<Date>>,
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
}
