//! CORS policy.
//!
//! One explicit layer over the whole router instead of per-route wiring.
//! Origins come from the configured allowlist; with no allowlist the layer
//! stays restrictive (no cross-origin access).

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ApiConfig;

/// Create the CORS layer from the configured origin allowlist.
#[must_use]
pub fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
