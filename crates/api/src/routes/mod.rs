pub mod approvals;
pub mod assets;
pub mod events;
pub mod health;
pub mod reference;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                                          list, create
/// /assets/{id}                                     get, update, delete
/// /assets/{id}/specialization                      update type payload (PUT)
/// /assets/{id}/host                                assign or clear host (PUT)
/// /assets/{id}/components                          list, attach
/// /assets/{id}/components/{kind}/{component_id}    detach (DELETE)
/// /assets/{id}/events                              event history (GET)
/// /servers/{id}/hosted                             hosted guests (GET)
///
/// /approvals                                       list (?pending_only), submit
/// /approvals/{id}                                  get, delete
/// /approvals/{id}/approve                          promote to asset (POST)
///
/// /events                                          list, record
///
/// /manufacturers                                   list, create
/// /manufacturers/{id}                              get, update, delete
/// /data-centers                                    list, create
/// /data-centers/{id}                               get, update, delete
/// /business-units                                  list, create
/// /business-units/{id}                             get, update, delete
/// /business-units/{id}/children                    direct children (GET)
/// /contracts                                       list, create
/// /contracts/{id}                                  get, update, delete
/// /tags                                            list, create
/// /tags/{id}                                       get, update, delete
/// /software                                        list, create
/// /software/{id}                                   get, update, delete
/// /users                                           list, create
/// /users/{id}                                      get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assets", assets::router())
        .nest("/servers", assets::servers_router())
        .nest("/approvals", approvals::router())
        .nest("/events", events::router())
        .merge(reference::router())
}
