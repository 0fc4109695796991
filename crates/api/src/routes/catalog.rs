//! Route definitions for the marketing catalog: products, testimonials and
//! worked sites.
//!
//! Each collection has a public read-only router and an admin router.

use axum::routing::get;
use axum::Router;

use crate::handlers::{products, testimonials, worked_sites};
use crate::state::AppState;

/// Public catalog routes.
///
/// ```text
/// GET /products       -> products::list_public
/// GET /testimonials   -> testimonials::list_public
/// GET /worked-sites   -> worked_sites::list_public
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_public))
        .route("/testimonials", get(testimonials::list_public))
        .route("/worked-sites", get(worked_sites::list_public))
}

/// Admin product routes mounted at `/admin/products`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Admin testimonial routes mounted at `/admin/testimonials`.
///
/// Same shape as [`products_router`].
pub fn testimonials_router() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::list).post(testimonials::create))
        .route(
            "/{id}",
            get(testimonials::get_by_id)
                .put(testimonials::update)
                .delete(testimonials::delete),
        )
}

/// Admin worked-site routes mounted at `/admin/worked-sites`.
pub fn worked_sites_router() -> Router<AppState> {
    Router::new()
        .route("/", get(worked_sites::list).post(worked_sites::create))
        .route(
            "/{id}",
            get(worked_sites::get_by_id)
                .put(worked_sites::update)
                .delete(worked_sites::delete),
        )
}
