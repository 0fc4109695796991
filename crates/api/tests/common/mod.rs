#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use convex_api::auth::jwt::JwtConfig;
use convex_api::auth::password::hash_password;
use convex_api::captcha::CaptchaVerifier;
use convex_api::config::{BusinessInfo, CaptchaConfig, ServerConfig, StorageConfig};
use convex_api::router::build_app_router;
use convex_api::state::AppState;
use convex_api::storage::LocalObjectStore;
use convex_events::{ErrorReporter, EventBus, Mailer};

/// Admin password accepted by every test app.
pub const TEST_ADMIN_PASSWORD: &str = "rooftop-test-password";

pub const TEST_BUCKET: &str = "project-images";
pub const TEST_PUBLIC_BASE: &str = "http://localhost:3000/storage";

/// Argon2 is slow in debug builds; hash the test password once.
fn admin_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_ADMIN_PASSWORD).expect("hashing should succeed"))
        .clone()
}

/// Build a test `ServerConfig` with safe defaults and a known admin password.
pub fn test_config(storage_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        admin_password_hash: Some(admin_hash()),
        storage: StorageConfig {
            root: storage_root.to_path_buf(),
            bucket: TEST_BUCKET.to_string(),
            public_base_url: TEST_PUBLIC_BASE.to_string(),
        },
        static_dir: None,
        business: BusinessInfo {
            phone: "919876543210".to_string(),
            email: "info@convexsolar.com".to_string(),
            address: "Ahmednagar, Maharashtra".to_string(),
            hours: "Mon-Sat: 9AM-7PM".to_string(),
        },
        captcha: CaptchaConfig::default(),
    }
}

/// Build the full application router with mail and captcha disabled.
///
/// Uploaded images go to a fresh directory under the system temp dir.
pub fn build_test_app(pool: PgPool) -> Router {
    let root: PathBuf =
        std::env::temp_dir().join(format!("convex-api-test-{}", uuid::Uuid::new_v4()));
    build_test_app_with_storage(pool, &root)
}

/// Same as [`build_test_app`] with images stored under `storage_root`.
pub fn build_test_app_with_storage(pool: PgPool, storage_root: &Path) -> Router {
    build_test_app_with_config(pool, test_config(storage_root))
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let mailer = Mailer::disabled();
    let store = LocalObjectStore::new(
        &config.storage.root,
        &config.storage.bucket,
        &config.storage.public_base_url,
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        mailer: mailer.clone(),
        reporter: ErrorReporter::new(mailer),
        store: Arc::new(store),
        captcha: Arc::new(CaptchaVerifier::disabled()),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::GET, uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::DELETE, uri, Some(token), body)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Log in as the admin and return the access token.
pub async fn admin_token(app: Router) -> String {
    let response = post_json(
        app,
        "/api/v1/admin/auth/login",
        serde_json::json!({ "password": TEST_ADMIN_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .expect("login response should carry access_token")
        .to_string()
}
