//! Trailpost Favorites API - per-user favorites over a document store.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API only
//! - `PostgreSQL` for favorites documents and the campsite directory
//!   (swap in the in-memory store with `TRAILPOST_STORE=memory`)
//! - tower-sessions for the shared login session; identity is established
//!   by the account service, this binary only reads it
//!
//! The favorites logic itself lives in `services::favorites`; everything
//! here is wiring.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailpost_api::config::{ApiConfig, StoreBackend};
use trailpost_api::db::{self, FavoriteStore, MemoryFavoriteStore, PgFavoriteStore};
use trailpost_api::middleware::{create_cors_layer, create_session_layer};
use trailpost_api::routes;
use trailpost_api::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env if present, then configuration (needed for Sentry init)
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trailpost_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .clone()
                .expect("TRAILPOST_DATABASE_URL is required for the postgres store");
            let pool = db::create_pool(&database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations are NOT run automatically on startup.
            // Apply the files in crates/api/migrations/ explicitly.

            let session_store = PostgresStore::new(pool.clone());
            let session_layer = create_session_layer(session_store, &config);

            let store: Arc<dyn FavoriteStore> = Arc::new(PgFavoriteStore::new(pool));
            let state = AppState::new(config.clone(), store);
            serve(&config, build_app(state, session_layer)).await;
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");

            let session_layer = create_session_layer(MemoryStore::default(), &config);

            let store: Arc<dyn FavoriteStore> = Arc::new(MemoryFavoriteStore::new());
            let state = AppState::new(config.clone(), store);
            serve(&config, build_app(state, session_layer)).await;
        }
    }
}

/// Build the application router with the full middleware stack.
fn build_app<S>(state: AppState, session_layer: tower_sessions::SessionManagerLayer<S>) -> Router
where
    S: tower_sessions::SessionStore + Clone,
{
    let cors_layer = create_cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Bind the listener and run the server until shutdown.
async fn serve(config: &ApiConfig, app: Router) {
    let addr = config.socket_addr();
    tracing::info!("favorites api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
