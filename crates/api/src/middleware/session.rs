//! Session middleware configuration.
//!
//! Sessions are shared with the account service: it writes the logged-in
//! identity, this service reads it. The backing store follows the configured
//! storage backend (`PostgreSQL` in production, in-memory otherwise).

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::ApiConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tp_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over the given session store.
///
/// # Arguments
///
/// * `store` - Backing session store
/// * `config` - API configuration (for secure cookie detection)
#[must_use]
pub fn create_session_layer<S: SessionStore>(
    store: S,
    config: &ApiConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
