//! Handlers for software catalogue entries.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cmdb_core::error::CoreError;
use cmdb_core::types::DbId;
use cmdb_db::models::software::{CreateSoftware, UpdateSoftware};
use cmdb_db::repositories::SoftwareRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/software
pub async fn list_software(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = SoftwareRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/software
pub async fn create_software(
    State(state): State<AppState>,
    Json(input): Json<CreateSoftware>,
) -> AppResult<impl IntoResponse> {
    let software = SoftwareRepo::create(&state.pool, &input).await?;
    tracing::info!(software_id = software.id, version = %software.version, "Software created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: software })))
}

/// GET /api/v1/software/{id}
pub async fn get_software(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let software = SoftwareRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Software", id)))?;
    Ok(Json(DataResponse { data: software }))
}

/// PUT /api/v1/software/{id}
pub async fn update_software(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSoftware>,
) -> AppResult<impl IntoResponse> {
    let software = SoftwareRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Software", id)))?;
    Ok(Json(DataResponse { data: software }))
}

/// DELETE /api/v1/software/{id}
pub async fn delete_software(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !SoftwareRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Software", id)));
    }
    tracing::info!(software_id = id, "Software deleted");
    Ok(StatusCode::NO_CONTENT)
}
