//! Operator mail relay over SMTP.
//!
//! [`Mailer`] renders a [`MailPayload`] to HTML and sends it to the configured
//! operator address through `lettre`'s async SMTP transport. Without SMTP
//! configuration the mailer is disabled: payloads are logged and dropped.

use chrono::{DateTime, Utc};
use convex_core::alert::Severity;
use convex_core::sanitize::{unescape_optional_text, unescape_text};
use serde::{Deserialize, Serialize};

use crate::templates;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A message for the operator, tagged by kind.
///
/// Serializes as `{"type": "inquiry" | "error", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum MailPayload {
    Inquiry(InquiryMail),
    Error(ErrorMail),
}

/// New-lead notice sent after a contact form is stored.
///
/// Fields hold plain text; the template escapes them for HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryMail {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub location: String,
    pub address: Option<String>,
    /// Human-readable system size, e.g. `"5kW (Medium Home)"`.
    pub energy_needs: Option<String>,
    pub message: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl InquiryMail {
    /// Decode free-text fields that were entity-escaped for storage.
    ///
    /// Build the mail from a stored inquiry row, then call this once so the
    /// template's own escaping is the only one applied.
    pub fn unescaped(self) -> Self {
        Self {
            name: unescape_text(&self.name),
            location: unescape_text(&self.location),
            address: unescape_optional_text(self.address.as_deref()),
            message: unescape_optional_text(self.message.as_deref()),
            ..self
        }
    }
}

/// Alert for a high or critical operational error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMail {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub error_code: Option<String>,
    pub stack: Option<String>,
    pub url: Option<String>,
    pub context: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// Implicit-TLS SMTP port.
const DEFAULT_SMTP_PORT: u16 = 465;

/// Default sender address when neither `SMTP_FROM` nor `SMTP_USER` is set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@convexsolar.com";

/// Configuration for the SMTP relay.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    /// 465 uses implicit TLS; any other port uses STARTTLS.
    pub smtp_port: u16,
    pub from_address: String,
    /// Operator address every message is sent to.
    pub to_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` or `SMTP_TO_EMAIL` is not set, meaning
    /// mail is not configured and the mailer runs disabled.
    ///
    /// | Variable        | Required | Default                       |
    /// |-----------------|----------|-------------------------------|
    /// | `SMTP_HOST`     | yes      |                               |
    /// | `SMTP_TO_EMAIL` | yes      |                               |
    /// | `SMTP_PORT`     | no       | `465`                         |
    /// | `SMTP_FROM`     | no       | `SMTP_USER`, else `noreply@convexsolar.com` |
    /// | `SMTP_USER`     | no       |                               |
    /// | `SMTP_PASSWORD` | no       |                               |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let to_address = std::env::var("SMTP_TO_EMAIL").ok()?;
        let smtp_user = std::env::var("SMTP_USER").ok();
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .ok()
                .or_else(|| smtp_user.clone())
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user,
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends operator mail, or logs it when SMTP is not configured.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: Option<MailConfig>,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// A mailer that only logs.
    pub fn disabled() -> Self {
        Self { config: None }
    }

    /// Build from the environment; disabled when SMTP is not configured.
    pub fn from_env() -> Self {
        match MailConfig::from_env() {
            Some(config) => Self::new(config),
            None => {
                tracing::info!("SMTP not configured, operator mail disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Render and send `payload` to the operator.
    pub async fn send(&self, payload: &MailPayload) -> Result<(), MailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let rendered = templates::render(payload);

        let Some(config) = &self.config else {
            tracing::info!(subject = %rendered.subject, "Mail disabled, not sending");
            return Ok(());
        };

        let email = Message::builder()
            .from(config.from_address.parse()?)
            .to(config.to_address.parse()?)
            .subject(&rendered.subject)
            .header(ContentType::TEXT_HTML)
            .body(rendered.html)
            .map_err(|e| MailError::Build(e.to_string()))?;

        let transport_builder = if config.smtp_port == DEFAULT_SMTP_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mut transport_builder = transport_builder.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;

        tracing::info!(to = %config.to_address, subject = %rendered.subject, "Operator mail sent");
        Ok(())
    }

    /// Send `payload` on a background task, logging any failure.
    pub fn send_in_background(&self, payload: MailPayload) {
        let mailer = self.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&payload).await {
                tracing::warn!(error = %e, "Failed to send operator mail");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
