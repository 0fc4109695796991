//! Handlers for customer testimonials.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use convex_core::error::CoreError;
use convex_core::sanitize::Sanitize;
use convex_core::types::DbId;
use convex_db::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};
use convex_db::repositories::TestimonialRepo;
use convex_events::ChangeKind;

use crate::error::{AppError, AppResult, ReportDbError};
use crate::handlers::{list_or_empty, publish_change};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: &str = "testimonials";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Testimonial",
        id,
    })
}

/// GET /api/v1/testimonials
///
/// Newest first; empty on database failure.
pub async fn list_public(State(state): State<AppState>) -> Json<DataResponse<Vec<Testimonial>>> {
    let testimonials = list_or_empty(
        TestimonialRepo::list(&state.pool).await,
        &state.reporter,
        "list testimonials",
    );
    Json(DataResponse { data: testimonials })
}

/// GET /api/v1/admin/testimonials
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let testimonials = TestimonialRepo::list(&state.pool)
        .await
        .reported(&state.reporter, "list testimonials")?;
    Ok(Json(DataResponse { data: testimonials }))
}

/// GET /api/v1/admin/testimonials/{id}
pub async fn get_by_id(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let testimonial = TestimonialRepo::find_by_id(&state.pool, id)
        .await
        .reported(&state.reporter, "load testimonial")?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: testimonial }))
}

/// POST /api/v1/admin/testimonials
///
/// Rating defaults to 5 and must lie in 1..=5.
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<CreateTestimonial>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let testimonial = TestimonialRepo::create(&state.pool, &input)
        .await
        .reported(&state.reporter, "create testimonial")?;

    publish_change(&state, TABLE, ChangeKind::Insert, testimonial.id);
    tracing::info!(testimonial_id = testimonial.id, "Testimonial created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// PUT /api/v1/admin/testimonials/{id}
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTestimonial>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let testimonial = TestimonialRepo::update(&state.pool, id, &input)
        .await
        .reported(&state.reporter, "update testimonial")?
        .ok_or_else(|| not_found(id))?;

    publish_change(&state, TABLE, ChangeKind::Update, id);
    tracing::info!(testimonial_id = id, "Testimonial updated");

    Ok(Json(DataResponse { data: testimonial }))
}

/// DELETE /api/v1/admin/testimonials/{id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TestimonialRepo::delete(&state.pool, id)
        .await
        .reported(&state.reporter, "delete testimonial")?;
    if !deleted {
        return Err(not_found(id));
    }

    publish_change(&state, TABLE, ChangeKind::Delete, id);
    tracing::info!(testimonial_id = id, "Testimonial deleted");

    Ok(StatusCode::NO_CONTENT)
}
