//! Handlers for the append-only event log.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cmdb_db::models::event_log::{CreateEventLog, EventLogListParams};
use cmdb_db::repositories::EventLogRepo;
use cmdb_db::DbError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events
///
/// Filter by `event_type`, `asset_id` or `user_id`; newest first.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventLogListParams>,
) -> AppResult<impl IntoResponse> {
    let events = EventLogRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
///
/// Record a manual event such as a maintenance window. Unknown asset or
/// user ids are rejected as invalid references.
pub async fn record_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEventLog>,
) -> AppResult<impl IntoResponse> {
    let event = EventLogRepo::record(&state.pool, &input)
        .await
        .map_err(DbError::from)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}
