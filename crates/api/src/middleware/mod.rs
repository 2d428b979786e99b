//! HTTP middleware stack for the favorites API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS (configured origin allowlist)
//! 4. Session layer (tower-sessions)
//!
//! Authentication is an extractor ([`RequireAuth`]) rather than a layer:
//! every favorites handler names it, and unauthenticated requests are
//! rejected before any store access.

pub mod auth;
pub mod cors;
pub mod session;

pub use auth::RequireAuth;
pub use cors::create_cors_layer;
pub use session::create_session_layer;
