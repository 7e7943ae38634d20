//! Licensed software records.

use cmdb_core::choices::SoftwareSubType;
use cmdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `software` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Software {
    pub id: DbId,
    #[sqlx(try_from = "i16")]
    pub sub_type: SoftwareSubType,
    pub version: String,
    pub license_key: Option<String>,
    pub license_count: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn one() -> i16 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSoftware {
    #[serde(default)]
    pub sub_type: SoftwareSubType,
    pub version: String,
    pub license_key: Option<String>,
    #[serde(default = "one")]
    pub license_count: i16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSoftware {
    pub sub_type: Option<SoftwareSubType>,
    pub version: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub license_key: Option<Option<String>>,
    pub license_count: Option<i16>,
}
