//! Handlers for the approval zone: discovered devices awaiting promotion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cmdb_core::error::CoreError;
use cmdb_core::types::DbId;
use cmdb_db::models::approval::{ApprovalListParams, ApproveOptions, CreateApprovalEntry};
use cmdb_db::repositories::ApprovalZoneRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/approvals
///
/// Supports `?pending_only=true&limit=&offset=`.
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ApprovalListParams>,
) -> AppResult<impl IntoResponse> {
    let entries = ApprovalZoneRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/approvals
///
/// Submit a discovered device for review.
pub async fn submit_entry(
    State(state): State<AppState>,
    Json(input): Json<CreateApprovalEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = ApprovalZoneRepo::submit(&state.pool, &input).await?;

    tracing::info!(
        entry_id = entry.id,
        serial_number = %entry.serial_number,
        "Approval entry submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/approvals/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = ApprovalZoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ApprovalEntry", id)))?;
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/approvals/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ApprovalZoneRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("ApprovalEntry", id)));
    }
    tracing::info!(entry_id = id, "Approval entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/approvals/{id}/approve
///
/// Promote the entry into a registered asset. The promotion, the approved
/// flag and the online event commit together or not at all.
pub async fn approve_entry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(options): Json<ApproveOptions>,
) -> AppResult<impl IntoResponse> {
    let outcome = ApprovalZoneRepo::approve(&state.pool, id, &options).await?;

    tracing::info!(
        entry_id = id,
        asset_id = outcome.asset.id,
        approver_id = ?options.approver_id,
        "Approval entry promoted",
    );

    Ok(Json(DataResponse { data: outcome }))
}
