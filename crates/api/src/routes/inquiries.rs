//! Route definitions for inquiries.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::inquiries;
use crate::state::AppState;

/// Public contact-form route.
///
/// ```text
/// POST /inquiries   -> submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/inquiries", post(inquiries::submit))
}

/// Admin inquiry routes mounted at `/admin/inquiries`.
///
/// ```text
/// GET    /              -> list
/// GET    /stream        -> stream (WebSocket)
/// GET    /{id}          -> get_by_id
/// DELETE /{id}          -> delete
/// PATCH  /{id}/status   -> update_status
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(inquiries::list))
        .route("/stream", get(inquiries::stream))
        .route(
            "/{id}",
            get(inquiries::get_by_id).delete(inquiries::delete),
        )
        .route("/{id}/status", patch(inquiries::update_status))
}
