use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Event log routes mounted at `/events`. There is no update or delete.
///
/// ```text
/// GET    /                  -> list_events
/// POST   /                  -> record_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(events::list_events).post(events::record_event))
}
