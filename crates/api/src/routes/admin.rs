//! Route definitions for admin-only tools: auth, dashboard, uploads and
//! quotations.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use convex_core::media::MAX_UPLOAD_BYTES;

use crate::handlers::{admin_auth, dashboard, quotations, uploads};
use crate::state::AppState;

/// Multipart framing on top of the largest accepted image.
const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

/// Auth routes mounted at `/admin/auth`.
///
/// ```text
/// POST /login     -> login (public)
/// POST /logout    -> logout
/// GET  /session   -> session
/// ```
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin_auth::login))
        .route("/logout", post(admin_auth::logout))
        .route("/session", get(admin_auth::session))
}

/// Dashboard route mounted at `/admin/dashboard`.
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::get_summary))
}

/// Upload routes mounted at `/admin/uploads`.
///
/// ```text
/// POST   /   -> upload_image (multipart)
/// DELETE /   -> delete_image
/// ```
pub fn uploads_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(uploads::upload_image).delete(uploads::delete_image),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + UPLOAD_BODY_OVERHEAD))
}

/// Quotation routes mounted at `/admin/quotations`.
///
/// ```text
/// GET  /           -> list_recent
/// POST /           -> issue (returns application/pdf)
/// POST /preview    -> preview (totals only)
/// POST /document   -> preview_document (layout, no number issued)
/// ```
pub fn quotations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotations::list_recent).post(quotations::issue))
        .route("/preview", post(quotations::preview))
        .route("/document", post(quotations::preview_document))
}
