//! Admin dashboard summary.

use axum::extract::State;
use axum::Json;
use convex_db::models::dashboard::DashboardSummary;
use convex_db::repositories::DashboardRepo;

use crate::error::{AppResult, ReportDbError};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard
///
/// Collection sizes plus inquiry counts per status.
pub async fn get_summary(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = DashboardRepo::summary(&state.pool)
        .await
        .reported(&state.reporter, "load dashboard")?;
    Ok(Json(DataResponse { data: summary }))
}
