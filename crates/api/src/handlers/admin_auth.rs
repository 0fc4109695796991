//! Handlers for the `/admin/auth` resource (login, logout, session).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use convex_core::error::CoreError;
use convex_core::types::{DbId, Timestamp};
use convex_db::models::admin_session::CreateAdminSession;
use convex_db::repositories::AdminSessionRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult, ReportDbError};
use crate::middleware::auth::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub expires_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: DbId,
    pub authenticated: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/auth/login
///
/// Check the admin password and open a session. There is no lockout.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(hash) = state.config.admin_password_hash.as_deref() else {
        state
            .reporter
            .auth("admin login", &"ADMIN_PASSWORD_HASH is not configured");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Admin login is not configured".into(),
        )));
    };

    let password_valid = verify_password(&input.password, hash).map_err(|e| {
        state.reporter.auth("verify admin password", &e);
        AppError::InternalError(format!("Password verification error: {e}"))
    })?;

    if !password_valid {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid password".into(),
        )));
    }

    let expires_in = state.config.jwt.expiry_secs();
    let expires_at = Utc::now() + Duration::seconds(expires_in);

    let session = AdminSessionRepo::create(
        &state.pool,
        &CreateAdminSession {
            expires_at,
            user_agent: header_string(&headers, "user-agent"),
            ip_address: forwarded_ip(&headers),
        },
    )
    .await
    .reported(&state.reporter, "create admin session")?;

    let access_token = generate_access_token(session.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(session_id = session.id, "Admin signed in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in,
        expires_at,
    }))
}

/// POST /api/v1/admin/auth/logout
///
/// Revoke the current session. Returns 204 No Content.
pub async fn logout(
    admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    AdminSessionRepo::revoke(&state.pool, admin.session_id)
        .await
        .reported(&state.reporter, "revoke admin session")?;

    tracing::info!(session_id = admin.session_id, "Admin signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/auth/session
///
/// Succeeds only while the caller's session is live.
pub async fn session(admin: AdminSession) -> Json<DataResponse<SessionInfo>> {
    Json(DataResponse {
        data: SessionInfo {
            session_id: admin.session_id,
            authenticated: true,
        },
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// First hop of `X-Forwarded-For`, when the server sits behind a proxy.
fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    header_string(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .filter(|ip| !ip.is_empty())
}
