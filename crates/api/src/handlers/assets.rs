//! Handlers for the asset registry, specializations, hosting and components.
//!
//! Every mutation appends an event log row once the change is committed. A
//! failed event write is logged and does not fail the request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cmdb_core::choices::{AssetStatus, EventType};
use cmdb_core::error::CoreError;
use cmdb_core::types::DbId;
use cmdb_db::models::asset::{AssetListParams, CreateAsset, UpdateAsset};
use cmdb_db::models::component::{ComponentKind, NewComponent};
use cmdb_db::models::event_log::CreateEventLog;
use cmdb_db::models::specialization::{SetHost, UpdateSpecialization};
use cmdb_db::repositories::{AssetRepo, ComponentRepo, EventLogRepo, SpecializationRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Append an event, logging instead of failing when the write errors.
pub(crate) async fn record_event(state: &AppState, event: CreateEventLog) {
    if let Err(e) = EventLogRepo::record(&state.pool, &event).await {
        tracing::warn!(
            error = %e,
            asset_id = ?event.asset_id,
            event_type = ?event.event_type,
            "Failed to record event log",
        );
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// GET /api/v1/assets
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/assets
///
/// Creates the asset, its specialization and tag links in one transaction.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    let detail = AssetRepo::create(&state.pool, &input).await?;

    tracing::info!(
        asset_id = detail.asset.id,
        asset_type = ?detail.asset.asset_type,
        "Asset created",
    );
    record_event(
        &state,
        CreateEventLog::for_asset(
            detail.asset.id,
            EventType::Change,
            "Asset created",
            format!("registered {}", detail.asset.serial_number),
        )
        .with_user(detail.asset.admin_id),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/assets/{id}
///
/// Returns the asset with its specialization payload and tag ids.
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = AssetRepo::find_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// Event type logged when an asset moves into `status`.
fn status_event_type(status: AssetStatus) -> EventType {
    match status {
        AssetStatus::Online => EventType::Online,
        AssetStatus::Offline => EventType::Offline,
        AssetStatus::Standby | AssetStatus::Faulty => EventType::Maintenance,
        AssetStatus::Unknown => EventType::Change,
    }
}

/// PUT /api/v1/assets/{id}
///
/// A status event is logged only when the stored status actually changes.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    let previous = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Asset", id)))?;
    let asset = AssetRepo::update(&state.pool, id, &input).await?;

    let event = if asset.status != previous.status {
        CreateEventLog::for_asset(
            id,
            status_event_type(asset.status),
            "Asset status changed",
            format!("status changed from {:?} to {:?}", previous.status, asset.status),
        )
    } else {
        CreateEventLog::for_asset(id, EventType::Change, "Asset updated", "fields updated")
    };
    record_event(&state, event.with_user(asset.admin_id)).await;

    tracing::info!(asset_id = id, "Asset updated");
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// Runs the full cascade. Existing events keep their history with the
/// asset reference cleared.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Asset", id)))?;

    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Asset", id)));
    }

    record_event(
        &state,
        CreateEventLog {
            name: "Asset deleted".into(),
            asset_id: None,
            event_type: EventType::Other,
            pending_asset_id: None,
            component: None,
            detail: format!("deleted {} ({})", asset.name, asset.serial_number),
            user_id: None,
            memo: None,
        },
    )
    .await;

    tracing::info!(asset_id = id, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Specialization and hosting
// ---------------------------------------------------------------------------

/// PUT /api/v1/assets/{id}/specialization
pub async fn update_specialization(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UpdateSpecialization>,
) -> AppResult<impl IntoResponse> {
    let specialization = SpecializationRepo::update(&state.pool, id, &patch).await?;

    record_event(
        &state,
        CreateEventLog::for_asset(
            id,
            EventType::Change,
            "Specialization updated",
            format!("{:?} fields updated", specialization.asset_type()),
        ),
    )
    .await;

    Ok(Json(DataResponse {
        data: specialization,
    }))
}

/// PUT /api/v1/assets/{id}/host
///
/// Assigns or clears the physical host of a server. Rejects non-server
/// hosts and assignments that would form a hosting cycle.
pub async fn set_host(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetHost>,
) -> AppResult<impl IntoResponse> {
    let server = SpecializationRepo::set_server_host(&state.pool, id, input.host_asset_id).await?;

    let detail = match server.host_asset_id {
        Some(host) => format!("hosted on asset {host}"),
        None => "host cleared".to_string(),
    };
    record_event(
        &state,
        CreateEventLog::for_asset(id, EventType::Change, "Host changed", detail),
    )
    .await;

    tracing::info!(asset_id = id, host_asset_id = ?server.host_asset_id, "Server host set");
    Ok(Json(DataResponse { data: server }))
}

/// GET /api/v1/servers/{id}/hosted
pub async fn list_hosted(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guests = SpecializationRepo::list_hosted(&state.pool, id).await?;
    Ok(Json(DataResponse { data: guests }))
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// GET /api/v1/assets/{id}/components
pub async fn list_components(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Asset", id)))?;

    let components = ComponentRepo::list_by_asset(&state.pool, id).await?;
    Ok(Json(DataResponse { data: components }))
}

/// POST /api/v1/assets/{id}/components
pub async fn attach_component(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NewComponent>,
) -> AppResult<impl IntoResponse> {
    let component = ComponentRepo::attach(&state.pool, id, &input).await?;
    let label = component.kind().label();

    record_event(
        &state,
        CreateEventLog::for_asset(
            id,
            EventType::ComponentAdded,
            format!("{label} added"),
            format!("{label} {} attached", component.id()),
        )
        .with_component(label),
    )
    .await;

    tracing::info!(
        asset_id = id,
        component_id = component.id(),
        kind = label,
        "Component attached",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: component })))
}

/// DELETE /api/v1/assets/{id}/components/{kind}/{component_id}
///
/// The component must belong to the asset in the path.
pub async fn detach_component(
    State(state): State<AppState>,
    Path((id, kind, component_id)): Path<(DbId, ComponentKind, DbId)>,
) -> AppResult<StatusCode> {
    let not_found = || AppError::Core(CoreError::not_found(kind.label(), component_id));

    let component = ComponentRepo::find(&state.pool, kind, component_id)
        .await?
        .ok_or_else(not_found)?;
    if component.asset_id() != id {
        return Err(not_found());
    }
    if !ComponentRepo::detach(&state.pool, kind, component_id).await? {
        return Err(not_found());
    }

    let label = kind.label();
    record_event(
        &state,
        CreateEventLog::for_asset(
            id,
            EventType::HardwareChange,
            format!("{label} removed"),
            format!("{label} {component_id} detached"),
        )
        .with_component(label),
    )
    .await;

    tracing::info!(asset_id = id, component_id, kind = label, "Component detached");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/assets/{id}/events
pub async fn list_asset_events(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let events = EventLogRepo::list_for_asset(&state.pool, id).await?;
    Ok(Json(DataResponse { data: events }))
}
