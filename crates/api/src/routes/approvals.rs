use axum::routing::{get, post};
use axum::Router;

use crate::handlers::approvals;
use crate::state::AppState;

/// Approval zone routes mounted at `/approvals`.
///
/// ```text
/// GET    /                  -> list_entries
/// POST   /                  -> submit_entry
/// GET    /{id}              -> get_entry
/// DELETE /{id}              -> delete_entry
/// POST   /{id}/approve      -> approve_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(approvals::list_entries).post(approvals::submit_entry),
        )
        .route(
            "/{id}",
            get(approvals::get_entry).delete(approvals::delete_entry),
        )
        .route("/{id}/approve", post(approvals::approve_entry))
}
