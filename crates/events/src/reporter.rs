//! Severity-based error reporting.
//!
//! Every report is logged through `tracing` at a level matching its
//! severity. High and critical reports also mail an alert to the operator
//! on a background task.

use std::fmt::Display;

use chrono::Utc;
use convex_core::alert::Severity;

use crate::mail::{ErrorMail, MailPayload, Mailer};

/// Logs operational errors and alerts the operator about serious ones.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    mailer: Mailer,
}

impl ErrorReporter {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }

    /// Record an error. Returns the alert that was built for it, whether or
    /// not it was mailed.
    pub fn report(
        &self,
        severity: Severity,
        title: impl Into<String>,
        error: &dyn Display,
        context: Option<serde_json::Value>,
    ) -> ErrorMail {
        let alert = ErrorMail {
            severity,
            title: title.into(),
            message: error.to_string(),
            error_code: None,
            stack: None,
            url: None,
            context,
            timestamp: Utc::now(),
        };

        match severity {
            Severity::Low => {
                tracing::info!(severity = %severity, title = %alert.title, error = %alert.message, "Error reported")
            }
            Severity::Medium => {
                tracing::warn!(severity = %severity, title = %alert.title, error = %alert.message, "Error reported")
            }
            Severity::High | Severity::Critical => {
                tracing::error!(severity = %severity, title = %alert.title, error = %alert.message, "Error reported")
            }
        }

        if severity.sends_alert() {
            if tokio::runtime::Handle::try_current().is_ok() {
                self.mailer.send_in_background(MailPayload::Error(alert.clone()));
            } else {
                tracing::warn!(title = %alert.title, "No async runtime, alert mail skipped");
            }
        }

        alert
    }

    /// A failed database operation (high).
    pub fn database(
        &self,
        operation: &str,
        error: &dyn Display,
        context: Option<serde_json::Value>,
    ) -> ErrorMail {
        self.report(
            Severity::High,
            format!("Database Error: {operation}"),
            error,
            context,
        )
    }

    /// A failed authentication step (medium).
    pub fn auth(&self, operation: &str, error: &dyn Display) -> ErrorMail {
        self.report(Severity::Medium, format!("Auth Error: {operation}"), error, None)
    }

    /// A failed object-storage operation (medium).
    pub fn storage(&self, operation: &str, error: &dyn Display) -> ErrorMail {
        self.report(Severity::Medium, format!("Storage Error: {operation}"), error, None)
    }

    /// Anything that leaves the service unable to do its job (critical).
    pub fn critical(
        &self,
        title: &str,
        error: &dyn Display,
        context: Option<serde_json::Value>,
    ) -> ErrorMail {
        self.report(Severity::Critical, title, error, context)
    }
}
