pub mod admin;
pub mod catalog;
pub mod health;
pub mod inquiries;

use axum::routing::get;
use axum::Router;

use crate::handlers::site_info;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /site-info                          business contact details (public)
/// /products                           product list (public)
/// /testimonials                       testimonial list (public)
/// /worked-sites                       worked-site list (public)
/// /inquiries                          contact form submit (public, POST)
///
/// /admin/auth/login                   login (public)
/// /admin/auth/logout                  logout
/// /admin/auth/session                 current session
///
/// /admin/dashboard                    collection counts
///
/// /admin/products                     list, create
/// /admin/products/{id}                get, update, delete
/// /admin/testimonials                 list, create
/// /admin/testimonials/{id}            get, update, delete
/// /admin/worked-sites                 list, create
/// /admin/worked-sites/{id}            get, update, delete
///
/// /admin/inquiries                    list
/// /admin/inquiries/stream             live list (WebSocket)
/// /admin/inquiries/{id}               get, delete
/// /admin/inquiries/{id}/status        set status (PATCH)
///
/// /admin/uploads                      upload image (POST), delete by URL (DELETE)
///
/// /admin/quotations                   recent (GET), issue PDF (POST)
/// /admin/quotations/preview           totals (POST)
/// /admin/quotations/document          layout preview (POST)
/// ```
///
/// Every `/admin` route except login requires an [`AdminSession`].
///
/// [`AdminSession`]: crate::middleware::auth::AdminSession
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/site-info", get(site_info::get_site_info))
        .merge(catalog::public_router())
        .merge(inquiries::public_router())
        .nest("/admin/auth", admin::auth_router())
        .nest("/admin/dashboard", admin::dashboard_router())
        .nest("/admin/products", catalog::products_router())
        .nest("/admin/testimonials", catalog::testimonials_router())
        .nest("/admin/worked-sites", catalog::worked_sites_router())
        .nest("/admin/inquiries", inquiries::admin_router())
        .nest("/admin/uploads", admin::uploads_router())
        .nest("/admin/quotations", admin::quotations_router())
}
