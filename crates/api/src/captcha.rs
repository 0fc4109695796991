//! reCAPTCHA verification for the public contact form.
//!
//! When no secret is configured the check is skipped, so local development
//! and tests do not need provider keys.

use std::time::Duration;

use serde::Deserialize;

/// Google's token verification endpoint.
pub const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// HTTP timeout for a single verification call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum CaptchaError {
    #[error("Captcha token is missing")]
    Missing,

    /// The provider answered but did not accept the token.
    #[error("Captcha verification failed: {0}")]
    Rejected(String),

    #[error("Captcha request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies bot-challenge tokens against the provider.
pub struct CaptchaVerifier {
    secret: Option<String>,
    verify_url: String,
    client: reqwest::Client,
}

impl CaptchaVerifier {
    pub fn new(secret: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            secret,
            verify_url: VERIFY_URL.to_string(),
            client,
        }
    }

    /// A verifier that accepts every request.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Point verification at a different endpoint.
    pub fn with_verify_url(mut self, url: impl Into<String>) -> Self {
        self.verify_url = url.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check `token`. Always succeeds when verification is disabled.
    pub async fn verify(&self, token: Option<&str>) -> Result<(), CaptchaError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CaptchaError::Missing)?;

        let response: VerifyResponse = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(CaptchaError::Rejected(response.error_codes.join(", ")))
        }
    }
}
