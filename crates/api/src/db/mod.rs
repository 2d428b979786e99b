//! Favorites document store.
//!
//! The reconciler talks to storage through the [`FavoriteStore`] trait so the
//! service logic stays independent of the backend. Two implementations exist:
//!
//! - [`postgres::PgFavoriteStore`] - `PostgreSQL` (production)
//! - [`memory::MemoryFavoriteStore`] - in-process maps (development, tests)
//!
//! # Tables (postgres backend)
//!
//! - `favorites` - one row per user, campsite ids as a `TEXT[]` column
//! - `campsites` - campground directory entries referenced by favorites
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run externally
//! (e.g. `psql -f`); the server does not migrate on startup.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use trailpost_core::{CampsiteId, UserId};

use crate::models::{Campsite, FavoriteDocument};

pub use memory::MemoryFavoriteStore;
pub use postgres::PgFavoriteStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., document already exists).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Document store for per-user favorites.
///
/// Semantics the reconciler relies on:
///
/// - At most one document per user; `create` fails with [`StoreError::Conflict`]
///   if one already exists.
/// - `replace` is an upsert with last-write-wins semantics; per-document
///   atomicity is the only concurrency guarantee.
/// - `delete` returns the removed document, or `None` if there was nothing to
///   delete (a no-op, not an error).
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Fetch the favorites document for `user`, if one exists.
    async fn find(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError>;

    /// Create a favorites document for `user`.
    async fn create(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError>;

    /// Replace the campsite list for `user`, creating the document if it
    /// disappeared since it was read.
    async fn replace(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError>;

    /// Delete the favorites document for `user`, returning it if it existed.
    async fn delete(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError>;

    /// Resolve campsite ids to directory entries, preserving input order.
    ///
    /// Ids that do not resolve are omitted from the result.
    async fn resolve_campsites(&self, ids: &[CampsiteId]) -> Result<Vec<Campsite>, StoreError>;

    /// Verify the store is reachable (readiness checks).
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
