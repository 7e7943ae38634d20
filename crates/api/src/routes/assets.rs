//! Route definitions for assets and their parts.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /                                         -> list_assets
/// POST   /                                         -> create_asset
/// GET    /{id}                                     -> get_asset
/// PUT    /{id}                                     -> update_asset
/// DELETE /{id}                                     -> delete_asset
/// PUT    /{id}/specialization                      -> update_specialization
/// PUT    /{id}/host                                -> set_host
/// GET    /{id}/components                          -> list_components
/// POST   /{id}/components                          -> attach_component
/// DELETE /{id}/components/{kind}/{component_id}    -> detach_component
/// GET    /{id}/events                              -> list_asset_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/specialization", put(assets::update_specialization))
        .route("/{id}/host", put(assets::set_host))
        .route(
            "/{id}/components",
            get(assets::list_components).post(assets::attach_component),
        )
        .route(
            "/{id}/components/{kind}/{component_id}",
            delete(assets::detach_component),
        )
        .route("/{id}/events", get(assets::list_asset_events))
}

/// Server-only routes mounted at `/servers`.
///
/// ```text
/// GET    /{id}/hosted                              -> list_hosted
/// ```
pub fn servers_router() -> Router<AppState> {
    Router::new().route("/{id}/hosted", get(assets::list_hosted))
}
