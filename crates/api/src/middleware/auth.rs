//! Admin-session extractor for Axum handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use convex_core::error::CoreError;
use convex_core::types::DbId;
use convex_db::repositories::AdminSessionRepo;
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult, ReportDbError};
use crate::state::AppState;

/// An authenticated admin, extracted from a Bearer token.
///
/// The token must validate *and* name a session that is neither revoked nor
/// expired. Browsers cannot set headers on WebSocket upgrades, so a
/// `?token=` query parameter is accepted as a fallback.
///
/// ```ignore
/// async fn my_handler(admin: AdminSession) -> AppResult<Json<()>> {
///     tracing::info!(session_id = admin.session_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub session_id: DbId,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let session = AdminSessionRepo::find_active(&state.pool, claims.sid)
            .await
            .reported(&state.reporter, "load admin session")?;

        if session.is_none() {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Session has ended. Please sign in again".into(),
            )));
        }

        Ok(AdminSession {
            session_id: claims.sid,
        })
    }
}

fn bearer_token(parts: &Parts) -> AppResult<String> {
    if let Some(header) = parts.headers.get("authorization") {
        let value = header.to_str().unwrap_or_default();
        return value
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            });
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::Request;

    use super::*;

    fn parts(uri: &str, auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn header_token_is_used() {
        let p = parts("/api/v1/admin/dashboard", Some("Bearer abc"));
        assert_eq!(bearer_token(&p).unwrap(), "abc");
    }

    #[test]
    fn query_token_is_a_fallback() {
        let p = parts("/api/v1/admin/inquiries/stream?token=xyz", None);
        assert_eq!(bearer_token(&p).unwrap(), "xyz");
    }

    #[test]
    fn malformed_header_is_rejected() {
        let p = parts("/?token=xyz", Some("Basic abc"));
        assert_matches!(
            bearer_token(&p),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[test]
    fn missing_token_is_rejected() {
        let p = parts("/api/v1/admin/dashboard", None);
        assert_matches!(
            bearer_token(&p),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }
}
