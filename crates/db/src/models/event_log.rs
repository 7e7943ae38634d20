//! Append-only event log models.

use cmdb_core::choices::EventType;
use cmdb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `event_logs` table. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventLog {
    pub id: DbId,
    pub name: String,
    pub asset_id: Option<DbId>,
    #[sqlx(try_from = "i16")]
    pub event_type: EventType,
    pub pending_asset_id: Option<DbId>,
    pub component: Option<String>,
    pub detail: String,
    pub user_id: Option<DbId>,
    pub memo: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventLog {
    pub name: String,
    pub asset_id: Option<DbId>,
    #[serde(default)]
    pub event_type: EventType,
    pub pending_asset_id: Option<DbId>,
    pub component: Option<String>,
    pub detail: String,
    pub user_id: Option<DbId>,
    pub memo: Option<String>,
}

impl CreateEventLog {
    /// An event about a registered asset.
    pub fn for_asset(
        asset_id: DbId,
        event_type: EventType,
        name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            asset_id: Some(asset_id),
            event_type,
            pending_asset_id: None,
            component: None,
            detail: detail.into(),
            user_id: None,
            memo: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_user(mut self, user_id: Option<DbId>) -> Self {
        self.user_id = user_id;
        self
    }
}

/// Query parameters for listing events. Newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLogListParams {
    pub event_type: Option<EventType>,
    pub asset_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
