//! Route definitions for reference data, software and users.

use axum::routing::get;
use axum::Router;

use crate::handlers::{reference, software, users};
use crate::state::AppState;

/// Reference data routes, merged at the `/api/v1` root.
///
/// ```text
/// GET, POST           /manufacturers
/// GET, PUT, DELETE    /manufacturers/{id}
/// GET, POST           /data-centers
/// GET, PUT, DELETE    /data-centers/{id}
/// GET, POST           /business-units
/// GET, PUT, DELETE    /business-units/{id}
/// GET                 /business-units/{id}/children
/// GET, POST           /contracts
/// GET, PUT, DELETE    /contracts/{id}
/// GET, POST           /tags
/// GET, PUT, DELETE    /tags/{id}
/// GET, POST           /software
/// GET, PUT, DELETE    /software/{id}
/// GET, POST           /users
/// GET, PUT, DELETE    /users/{id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/manufacturers",
            get(reference::list_manufacturers).post(reference::create_manufacturer),
        )
        .route(
            "/manufacturers/{id}",
            get(reference::get_manufacturer)
                .put(reference::update_manufacturer)
                .delete(reference::delete_manufacturer),
        )
        .route(
            "/data-centers",
            get(reference::list_data_centers).post(reference::create_data_center),
        )
        .route(
            "/data-centers/{id}",
            get(reference::get_data_center)
                .put(reference::update_data_center)
                .delete(reference::delete_data_center),
        )
        .route(
            "/business-units",
            get(reference::list_business_units).post(reference::create_business_unit),
        )
        .route(
            "/business-units/{id}",
            get(reference::get_business_unit)
                .put(reference::update_business_unit)
                .delete(reference::delete_business_unit),
        )
        .route(
            "/business-units/{id}/children",
            get(reference::list_business_unit_children),
        )
        .route(
            "/contracts",
            get(reference::list_contracts).post(reference::create_contract),
        )
        .route(
            "/contracts/{id}",
            get(reference::get_contract)
                .put(reference::update_contract)
                .delete(reference::delete_contract),
        )
        .route(
            "/tags",
            get(reference::list_tags).post(reference::create_tag),
        )
        .route(
            "/tags/{id}",
            get(reference::get_tag)
                .put(reference::update_tag)
                .delete(reference::delete_tag),
        )
        .route(
            "/software",
            get(software::list_software).post(software::create_software),
        )
        .route(
            "/software/{id}",
            get(software::get_software)
                .put(software::update_software)
                .delete(software::delete_software),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
