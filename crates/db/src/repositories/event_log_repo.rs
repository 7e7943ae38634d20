//! Repository for the append-only `event_logs` table.

use cmdb_core::choices::EventType;
use cmdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use cmdb_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::event_log::{CreateEventLog, EventLog, EventLogListParams};

const COLUMNS: &str = "id, name, asset_id, event_type, pending_asset_id, component, detail, \
    user_id, memo, created_at";

/// Records and queries events. There is no update or delete.
pub struct EventLogRepo;

impl EventLogRepo {
    /// Append an event.
    pub async fn record(pool: &PgPool, input: &CreateEventLog) -> Result<EventLog, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::record_inner(&mut conn, input).await
    }

    /// Events about one asset, newest first.
    pub async fn list_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<EventLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_logs WHERE asset_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EventLog>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// Events about one approval entry, newest first.
    pub async fn list_for_entry(
        pool: &PgPool,
        entry_id: DbId,
    ) -> Result<Vec<EventLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_logs WHERE pending_asset_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EventLog>(&query)
            .bind(entry_id)
            .fetch_all(pool)
            .await
    }

    /// List events with optional filters, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &EventLogListParams,
    ) -> Result<Vec<EventLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_logs
             WHERE ($1::SMALLINT IS NULL OR event_type = $1)
               AND ($2::BIGINT IS NULL OR asset_id = $2)
               AND ($3::BIGINT IS NULL OR user_id = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, EventLog>(&query)
            .bind(params.event_type.map(EventType::code))
            .bind(params.asset_id)
            .bind(params.user_id)
            .bind(clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub(crate) async fn record_inner(
        conn: &mut PgConnection,
        input: &CreateEventLog,
    ) -> Result<EventLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_logs (name, asset_id, event_type, pending_asset_id, component,
                detail, user_id, memo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventLog>(&query)
            .bind(&input.name)
            .bind(input.asset_id)
            .bind(input.event_type.code())
            .bind(input.pending_asset_id)
            .bind(&input.component)
            .bind(&input.detail)
            .bind(input.user_id)
            .bind(&input.memo)
            .fetch_one(&mut *conn)
            .await
    }
}
