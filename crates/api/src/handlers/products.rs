//! Handlers for product packages.
//!
//! The public list feeds the pricing section; the admin endpoints manage
//! the catalog. Inputs are sanitized, then validated, before they reach
//! the repository.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use convex_core::error::CoreError;
use convex_core::sanitize::Sanitize;
use convex_core::types::DbId;
use convex_db::models::product::{CreateProduct, Product, UpdateProduct};
use convex_db::repositories::ProductRepo;
use convex_events::ChangeKind;

use crate::error::{AppError, AppResult, ReportDbError};
use crate::handlers::{list_or_empty, publish_change};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: &str = "products";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// GET /api/v1/products
///
/// Products in display order. Degrades to an empty list on database failure.
pub async fn list_public(State(state): State<AppState>) -> Json<DataResponse<Vec<Product>>> {
    let products = list_or_empty(
        ProductRepo::list(&state.pool).await,
        &state.reporter,
        "list products",
    );
    Json(DataResponse { data: products })
}

/// GET /api/v1/admin/products
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list(&state.pool)
        .await
        .reported(&state.reporter, "list products")?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/admin/products/{id}
pub async fn get_by_id(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await
        .reported(&state.reporter, "load product")?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/admin/products
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let product = ProductRepo::create(&state.pool, &input)
        .await
        .reported(&state.reporter, "create product")?;

    publish_change(&state, TABLE, ChangeKind::Insert, product.id);
    tracing::info!(product_id = product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/admin/products/{id}
///
/// Replaces every editable field.
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let product = ProductRepo::update(&state.pool, id, &input)
        .await
        .reported(&state.reporter, "update product")?
        .ok_or_else(|| not_found(id))?;

    publish_change(&state, TABLE, ChangeKind::Update, id);
    tracing::info!(product_id = id, "Product updated");

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/admin/products/{id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id)
        .await
        .reported(&state.reporter, "delete product")?;
    if !deleted {
        return Err(not_found(id));
    }

    publish_change(&state, TABLE, ChangeKind::Delete, id);
    tracing::info!(product_id = id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
