use std::sync::Arc;

use convex_events::{ErrorReporter, EventBus, Mailer};

use crate::captcha::CaptchaVerifier;
use crate::config::ServerConfig;
use crate::storage::ObjectStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: convex_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Change notifications for the admin inquiry stream.
    pub event_bus: Arc<EventBus>,
    /// Outbound mail relay (inquiry notices, alerts).
    pub mailer: Mailer,
    pub reporter: ErrorReporter,
    /// Image storage backend.
    pub store: Arc<dyn ObjectStore>,
    pub captcha: Arc<CaptchaVerifier>,
}
