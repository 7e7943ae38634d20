//! Handlers for reference data: manufacturers, data centers, business
//! units, contracts and tags.
//!
//! Deleting a manufacturer, data center, business unit or contract also
//! deletes every asset that references it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cmdb_core::error::CoreError;
use cmdb_core::types::DbId;
use cmdb_db::models::reference::{
    CreateBusinessUnit, CreateContract, CreateDataCenter, CreateManufacturer, CreateTag,
    UpdateBusinessUnit, UpdateContract, UpdateDataCenter, UpdateManufacturer, UpdateTag,
};
use cmdb_db::repositories::{
    BusinessUnitRepo, ContractRepo, DataCenterRepo, ManufacturerRepo, TagRepo,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::not_found(entity, id))
}

// ---------------------------------------------------------------------------
// Manufacturers
// ---------------------------------------------------------------------------

/// GET /api/v1/manufacturers
pub async fn list_manufacturers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ManufacturerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/manufacturers
pub async fn create_manufacturer(
    State(state): State<AppState>,
    Json(input): Json<CreateManufacturer>,
) -> AppResult<impl IntoResponse> {
    let manufacturer = ManufacturerRepo::create(&state.pool, &input).await?;
    tracing::info!(manufacturer_id = manufacturer.id, "Manufacturer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: manufacturer })))
}

/// GET /api/v1/manufacturers/{id}
pub async fn get_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let manufacturer = ManufacturerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Manufacturer", id))?;
    Ok(Json(DataResponse { data: manufacturer }))
}

/// PUT /api/v1/manufacturers/{id}
pub async fn update_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateManufacturer>,
) -> AppResult<impl IntoResponse> {
    let manufacturer = ManufacturerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Manufacturer", id))?;
    Ok(Json(DataResponse { data: manufacturer }))
}

/// DELETE /api/v1/manufacturers/{id}
pub async fn delete_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ManufacturerRepo::delete(&state.pool, id).await? {
        return Err(not_found("Manufacturer", id));
    }
    tracing::info!(manufacturer_id = id, "Manufacturer deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Data centers
// ---------------------------------------------------------------------------

/// GET /api/v1/data-centers
pub async fn list_data_centers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = DataCenterRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/data-centers
pub async fn create_data_center(
    State(state): State<AppState>,
    Json(input): Json<CreateDataCenter>,
) -> AppResult<impl IntoResponse> {
    let data_center = DataCenterRepo::create(&state.pool, &input).await?;
    tracing::info!(data_center_id = data_center.id, "Data center created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: data_center })))
}

/// GET /api/v1/data-centers/{id}
pub async fn get_data_center(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data_center = DataCenterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("DataCenter", id))?;
    Ok(Json(DataResponse { data: data_center }))
}

/// PUT /api/v1/data-centers/{id}
pub async fn update_data_center(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDataCenter>,
) -> AppResult<impl IntoResponse> {
    let data_center = DataCenterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("DataCenter", id))?;
    Ok(Json(DataResponse { data: data_center }))
}

/// DELETE /api/v1/data-centers/{id}
pub async fn delete_data_center(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DataCenterRepo::delete(&state.pool, id).await? {
        return Err(not_found("DataCenter", id));
    }
    tracing::info!(data_center_id = id, "Data center deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Business units
// ---------------------------------------------------------------------------

/// GET /api/v1/business-units
pub async fn list_business_units(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = BusinessUnitRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/business-units
pub async fn create_business_unit(
    State(state): State<AppState>,
    Json(input): Json<CreateBusinessUnit>,
) -> AppResult<impl IntoResponse> {
    let unit = BusinessUnitRepo::create(&state.pool, &input).await?;
    tracing::info!(
        business_unit_id = unit.id,
        parent_id = ?unit.parent_id,
        "Business unit created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit })))
}

/// GET /api/v1/business-units/{id}
pub async fn get_business_unit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let unit = BusinessUnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("BusinessUnit", id))?;
    Ok(Json(DataResponse { data: unit }))
}

/// GET /api/v1/business-units/{id}/children
pub async fn list_business_unit_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let children = BusinessUnitRepo::list_children(&state.pool, id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// PUT /api/v1/business-units/{id}
///
/// A unit cannot be moved under itself or one of its descendants.
pub async fn update_business_unit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBusinessUnit>,
) -> AppResult<impl IntoResponse> {
    let unit = BusinessUnitRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("BusinessUnit", id))?;
    Ok(Json(DataResponse { data: unit }))
}

/// DELETE /api/v1/business-units/{id}
///
/// Child units are kept and become top-level.
pub async fn delete_business_unit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BusinessUnitRepo::delete(&state.pool, id).await? {
        return Err(not_found("BusinessUnit", id));
    }
    tracing::info!(business_unit_id = id, "Business unit deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// GET /api/v1/contracts
pub async fn list_contracts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ContractRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/contracts
pub async fn create_contract(
    State(state): State<AppState>,
    Json(input): Json<CreateContract>,
) -> AppResult<impl IntoResponse> {
    let contract = ContractRepo::create(&state.pool, &input).await?;
    tracing::info!(contract_id = contract.id, "Contract created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// GET /api/v1/contracts/{id}
pub async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;
    Ok(Json(DataResponse { data: contract }))
}

/// PUT /api/v1/contracts/{id}
pub async fn update_contract(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<impl IntoResponse> {
    let contract = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Contract", id))?;
    Ok(Json(DataResponse { data: contract }))
}

/// DELETE /api/v1/contracts/{id}
pub async fn delete_contract(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContractRepo::delete(&state.pool, id).await? {
        return Err(not_found("Contract", id));
    }
    tracing::info!(contract_id = id, "Contract deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Tag", id))?;
    Ok(Json(DataResponse { data: tag }))
}

/// PUT /api/v1/tags/{id}
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Tag", id))?;
    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
///
/// Removes the tag from every asset; the assets themselves stay.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(not_found("Tag", id));
    }
    tracing::info!(tag_id = id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
