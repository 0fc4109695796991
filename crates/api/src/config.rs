use std::path::PathBuf;

use convex_core::storage::DEFAULT_BUCKET;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Seconds to wait for in-flight background work after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Argon2id PHC hash of the admin password. Admin login is refused
    /// while this is unset.
    pub admin_password_hash: Option<String>,
    pub storage: StorageConfig,
    /// Directory holding the built frontend, served as a fallback.
    pub static_dir: Option<PathBuf>,
    pub business: BusinessInfo,
    pub captcha: CaptchaConfig,
}

/// Where uploaded images are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub bucket: String,
    /// Base of public image URLs; objects resolve at `<base>/<bucket>/<key>`.
    pub public_base_url: String,
}

/// Contact details shown on the public site.
#[derive(Debug, Clone)]
pub struct BusinessInfo {
    /// Digits only, with country code (used for `tel:` and WhatsApp links).
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
}

/// reCAPTCHA keys. Verification is skipped when `secret` is unset.
#[derive(Debug, Clone, Default)]
pub struct CaptchaConfig {
    pub site_key: Option<String>,
    pub secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `3000`                           |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                             |
    /// | `ADMIN_PASSWORD_HASH`  | unset (admin login disabled)     |
    /// | `STORAGE_ROOT`         | `./storage`                      |
    /// | `STORAGE_BUCKET`       | `project-images`                 |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000/storage`  |
    /// | `STATIC_DIR`           | unset                            |
    /// | `BUSINESS_PHONE`       | `919876543210`                   |
    /// | `BUSINESS_EMAIL`       | `info@convexsolar.com`           |
    /// | `BUSINESS_ADDRESS`     | `Ahmednagar, Maharashtra`        |
    /// | `BUSINESS_HOURS`       | `Mon-Sat: 9AM-7PM`               |
    /// | `RECAPTCHA_SITE_KEY`   | unset                            |
    /// | `RECAPTCHA_SECRET`     | unset (captcha check skipped)    |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let storage = StorageConfig {
            root: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./storage".into())
                .into(),
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/storage".into()),
        };

        let business = BusinessInfo {
            phone: std::env::var("BUSINESS_PHONE").unwrap_or_else(|_| "919876543210".into()),
            email: std::env::var("BUSINESS_EMAIL")
                .unwrap_or_else(|_| "info@convexsolar.com".into()),
            address: std::env::var("BUSINESS_ADDRESS")
                .unwrap_or_else(|_| "Ahmednagar, Maharashtra".into()),
            hours: std::env::var("BUSINESS_HOURS").unwrap_or_else(|_| "Mon-Sat: 9AM-7PM".into()),
        };

        let captcha = CaptchaConfig {
            site_key: non_empty_var("RECAPTCHA_SITE_KEY"),
            secret: non_empty_var("RECAPTCHA_SECRET"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            admin_password_hash: non_empty_var("ADMIN_PASSWORD_HASH"),
            storage,
            static_dir: non_empty_var("STATIC_DIR").map(PathBuf::from),
            business,
            captcha,
        }
    }
}

impl BusinessInfo {
    /// `https://wa.me/<digits>` chat link for the business phone.
    pub fn whatsapp_link(&self) -> String {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        format!("https://wa.me/{digits}")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_keeps_only_digits() {
        let info = BusinessInfo {
            phone: "+91 98765-43210".into(),
            email: String::new(),
            address: String::new(),
            hours: String::new(),
        };
        assert_eq!(info.whatsapp_link(), "https://wa.me/919876543210");
    }
}
