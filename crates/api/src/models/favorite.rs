//! Favorites domain types.
//!
//! These types represent validated domain objects separate from database row
//! types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trailpost_core::{CampsiteId, UserId};

/// A user's favorites document.
///
/// At most one document exists per user. The campsite list is ordered by
/// insertion and free of duplicates; both properties are maintained by the
/// reconciler, not the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteDocument {
    /// Owner of this favorites list.
    pub user: UserId,
    /// Favorited campsite ids, oldest first.
    pub campsites: Vec<CampsiteId>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FavoriteDocument {
    /// Whether `id` is already favorited.
    ///
    /// Both sides are in canonical form by construction, so this is a plain
    /// equality scan.
    #[must_use]
    pub fn contains(&self, id: &CampsiteId) -> bool {
        self.campsites.contains(id)
    }
}

/// A campsite as referenced from a favorites list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campsite {
    /// Campsite id in canonical form.
    pub id: CampsiteId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Whether the campsite is featured on the directory front page.
    pub featured: bool,
}

/// A favorites document with its campsite references resolved.
///
/// Returned by the list endpoint so clients get display data in one round
/// trip. Campsite ids that no longer resolve (the campsite was removed from
/// the directory) are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesView {
    /// Owner of this favorites list.
    pub user: UserId,
    /// Resolved campsites, in favorites order.
    pub campsites: Vec<Campsite>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}
