//! HTTP route handlers for the favorites API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /favorites              - List favorites (expanded), JSON
//! POST   /favorites              - Add many campsites (body: array of refs)
//! PUT    /favorites              - 403, unsupported
//! DELETE /favorites              - Delete the whole favorites document
//!
//! GET    /favorites/{campsiteId} - 403, unsupported
//! POST   /favorites/{campsiteId} - Add one campsite
//! PUT    /favorites/{campsiteId} - 403, unsupported
//! DELETE /favorites/{campsiteId} - Remove one campsite
//! ```
//!
//! All favorites routes require an authenticated session. Mutation outcomes
//! that carry a document respond as JSON; no-op outcomes ("already
//! favorited", "nothing to delete") respond as plain text, and clients
//! branch on the content type.

pub mod favorites;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the favorites routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/favorites",
            get(favorites::list)
                .post(favorites::add_many)
                .put(favorites::replace_all)
                .delete(favorites::remove_all),
        )
        .route(
            "/favorites/{campsite_id}",
            get(favorites::get_one)
                .post(favorites::add_one)
                .put(favorites::replace_one)
                .delete(favorites::remove_one),
        )
}
