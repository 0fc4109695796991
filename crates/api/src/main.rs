use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use convex_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use convex_api::captcha::CaptchaVerifier;
use convex_api::config::ServerConfig;
use convex_api::router::build_app_router;
use convex_api::state::AppState;
use convex_api::storage::LocalObjectStore;
use convex_db::repositories::AdminSessionRepo;
use convex_events::{ErrorReporter, EventBus, Mailer};

/// How often expired and revoked admin sessions are purged.
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convex_api=debug,convex_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // `convex-api hash-password <password>` prints a value for ADMIN_PASSWORD_HASH.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        print_password_hash(args.get(2).map(String::as_str));
        return;
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.admin_password_hash.is_none() {
        tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = convex_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    convex_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    convex_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Mail and alerting ---
    let mailer = Mailer::from_env();
    if !mailer.is_enabled() {
        tracing::warn!("SMTP is not configured; mail will be logged only");
    }
    let reporter = ErrorReporter::new(mailer.clone());

    // --- Storage ---
    let store = LocalObjectStore::new(
        &config.storage.root,
        &config.storage.bucket,
        &config.storage.public_base_url,
    );
    tokio::fs::create_dir_all(store.bucket_dir())
        .await
        .expect("Failed to create storage directory");
    tracing::info!(root = %config.storage.root.display(), bucket = %config.storage.bucket, "Object storage ready");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // --- Background session cleanup ---
    let cleanup_pool = pool.clone();
    let cleanup_reporter = reporter.clone();
    let cleanup_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match AdminSessionRepo::cleanup_expired(&cleanup_pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged stale admin sessions"),
                Err(e) => {
                    cleanup_reporter.database("purge admin sessions", &e, None);
                }
            }
        }
    });

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        mailer,
        reporter,
        store: Arc::new(store),
        captcha: Arc::new(CaptchaVerifier::new(config.captcha.secret.clone())),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // In-flight requests get `shutdown_timeout_secs` to finish after the signal.
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    tokio::select! {
        result = server.into_future() => result.expect("Server error"),
        () = drain_deadline(shutdown_rx, drain_timeout) => {
            tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Drain timed out, forcing shutdown");
        }
    }

    // --- Post-shutdown cleanup ---
    cleanup_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Resolve `timeout` after shutdown has been requested.
async fn drain_deadline(mut requested: watch::Receiver<bool>, timeout: Duration) {
    if requested.wait_for(|&flag| flag).await.is_err() {
        // Sender gone without a request: the server is already finishing.
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(timeout).await;
}

fn print_password_hash(password: Option<&str>) {
    let Some(password) = password else {
        eprintln!("usage: convex-api hash-password <password>");
        std::process::exit(2);
    };
    if let Err(msg) = validate_password_strength(password, MIN_PASSWORD_LENGTH) {
        eprintln!("{msg}");
        std::process::exit(2);
    }
    match hash_password(password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash password: {e}");
            std::process::exit(1);
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
