//! Handlers for the worked-sites gallery.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use convex_core::error::CoreError;
use convex_core::sanitize::Sanitize;
use convex_core::types::DbId;
use convex_db::models::worked_site::{CreateWorkedSite, UpdateWorkedSite, WorkedSite};
use convex_db::repositories::WorkedSiteRepo;
use convex_events::ChangeKind;

use crate::error::{AppError, AppResult, ReportDbError};
use crate::handlers::{list_or_empty, publish_change};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: &str = "worked_sites";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "WorkedSite",
        id,
    })
}

/// GET /api/v1/worked-sites
pub async fn list_public(State(state): State<AppState>) -> Json<DataResponse<Vec<WorkedSite>>> {
    let sites = list_or_empty(
        WorkedSiteRepo::list(&state.pool).await,
        &state.reporter,
        "list worked sites",
    );
    Json(DataResponse { data: sites })
}

/// GET /api/v1/admin/worked-sites
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sites = WorkedSiteRepo::list(&state.pool)
        .await
        .reported(&state.reporter, "list worked sites")?;
    Ok(Json(DataResponse { data: sites }))
}

/// GET /api/v1/admin/worked-sites/{id}
pub async fn get_by_id(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let site = WorkedSiteRepo::find_by_id(&state.pool, id)
        .await
        .reported(&state.reporter, "load worked site")?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: site }))
}

/// POST /api/v1/admin/worked-sites
pub async fn create(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkedSite>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let site = WorkedSiteRepo::create(&state.pool, &input)
        .await
        .reported(&state.reporter, "create worked site")?;

    publish_change(&state, TABLE, ChangeKind::Insert, site.id);
    tracing::info!(site_id = site.id, title = %site.title, "Worked site created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: site })))
}

/// PUT /api/v1/admin/worked-sites/{id}
pub async fn update(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkedSite>,
) -> AppResult<impl IntoResponse> {
    let input = input.sanitized();
    input.validate()?;

    let site = WorkedSiteRepo::update(&state.pool, id, &input)
        .await
        .reported(&state.reporter, "update worked site")?
        .ok_or_else(|| not_found(id))?;

    publish_change(&state, TABLE, ChangeKind::Update, id);
    tracing::info!(site_id = id, "Worked site updated");

    Ok(Json(DataResponse { data: site }))
}

/// DELETE /api/v1/admin/worked-sites/{id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = WorkedSiteRepo::delete(&state.pool, id)
        .await
        .reported(&state.reporter, "delete worked site")?;
    if !deleted {
        return Err(not_found(id));
    }

    publish_change(&state, TABLE, ChangeKind::Delete, id);
    tracing::info!(site_id = id, "Worked site deleted");

    Ok(StatusCode::NO_CONTENT)
}
