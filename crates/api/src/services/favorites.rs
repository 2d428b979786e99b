//! Favorites reconciliation.
//!
//! Stateless operations on a user's favorites document. Each call performs at
//! most one read and one write against the store; concurrent edits for the
//! same user race with last-write-wins semantics (per-document atomicity is
//! the only guarantee the store provides).
//!
//! "Not found" cases are success outcome variants, never errors: clients of
//! this module distinguish mutated, already-present, and nothing-to-do
//! results without touching the error path. Only store failures are errors.

use trailpost_core::{CampsiteId, UserId};

use crate::db::{FavoriteStore, StoreError};
use crate::models::{FavoriteDocument, FavoritesView};

/// Outcome of adding a single campsite.
#[derive(Debug)]
pub enum AddOneOutcome {
    /// The campsite was appended (or the document created) and persisted.
    Saved(FavoriteDocument),
    /// The campsite was already favorited; nothing was written.
    AlreadyFavorited,
}

/// Outcome of removing a single campsite.
#[derive(Debug)]
pub enum RemoveOneOutcome {
    /// The updated document was persisted. The list may now be empty; the
    /// document itself is never deleted by a single-item removal.
    Saved(FavoriteDocument),
    /// The user has no favorites document; nothing was written.
    NoFavorites,
}

/// Outcome of deleting the whole favorites document.
#[derive(Debug)]
pub enum RemoveAllOutcome {
    /// The document existed and was deleted.
    Deleted(FavoriteDocument),
    /// The user has no favorites document; nothing was deleted.
    NoFavorites,
}

/// Reconciler for per-user favorites documents.
pub struct FavoritesService<'a> {
    store: &'a dyn FavoriteStore,
}

impl<'a> FavoritesService<'a> {
    /// Create a new favorites service.
    #[must_use]
    pub const fn new(store: &'a dyn FavoriteStore) -> Self {
        Self { store }
    }

    /// List the user's favorites with campsite data resolved.
    ///
    /// Returns `None` (not an error) if the user has no favorites document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store read fails.
    pub async fn list(&self, user: UserId) -> Result<Option<FavoritesView>, StoreError> {
        let Some(document) = self.store.find(user).await? else {
            return Ok(None);
        };

        let campsites = self.store.resolve_campsites(&document.campsites).await?;

        Ok(Some(FavoritesView {
            user: document.user,
            campsites,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }))
    }

    /// Add several campsites at once.
    ///
    /// Existing order is preserved and new ids are appended in input order,
    /// skipping any already present. Returns the resulting document, or
    /// `None` when there is no document and nothing to add (an empty input
    /// never creates a document).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a store operation fails.
    pub async fn add_many(
        &self,
        user: UserId,
        ids: Vec<CampsiteId>,
    ) -> Result<Option<FavoriteDocument>, StoreError> {
        match self.store.find(user).await? {
            Some(document) => {
                let mut campsites = document.campsites.clone();
                for id in ids {
                    if !campsites.contains(&id) {
                        campsites.push(id);
                    }
                }

                if campsites.len() == document.campsites.len() {
                    // Every id was already present; skip the write.
                    return Ok(Some(document));
                }

                let saved = self.store.replace(user, campsites).await?;
                Ok(Some(saved))
            }
            None => {
                let campsites = dedupe(ids);
                if campsites.is_empty() {
                    return Ok(None);
                }

                tracing::debug!(%user, count = campsites.len(), "creating favorites document");
                let created = self.store.create(user, campsites).await?;
                Ok(Some(created))
            }
        }
    }

    /// Add a single campsite.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a store operation fails.
    pub async fn add_one(
        &self,
        user: UserId,
        id: CampsiteId,
    ) -> Result<AddOneOutcome, StoreError> {
        match self.store.find(user).await? {
            Some(document) => {
                if document.contains(&id) {
                    return Ok(AddOneOutcome::AlreadyFavorited);
                }

                let mut campsites = document.campsites;
                campsites.push(id);
                let saved = self.store.replace(user, campsites).await?;
                Ok(AddOneOutcome::Saved(saved))
            }
            None => {
                tracing::debug!(%user, "creating favorites document");
                let created = self.store.create(user, vec![id]).await?;
                Ok(AddOneOutcome::Saved(created))
            }
        }
    }

    /// Remove a single campsite.
    ///
    /// Removing an id that is not in the list persists the list unchanged;
    /// removing the last id leaves an empty document in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a store operation fails.
    pub async fn remove_one(
        &self,
        user: UserId,
        id: CampsiteId,
    ) -> Result<RemoveOneOutcome, StoreError> {
        let Some(document) = self.store.find(user).await? else {
            return Ok(RemoveOneOutcome::NoFavorites);
        };

        let mut campsites = document.campsites;
        campsites.retain(|existing| existing != &id);

        let saved = self.store.replace(user, campsites).await?;
        Ok(RemoveOneOutcome::Saved(saved))
    }

    /// Delete the user's favorites document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store delete fails.
    pub async fn remove_all(&self, user: UserId) -> Result<RemoveAllOutcome, StoreError> {
        match self.store.delete(user).await? {
            Some(document) => {
                tracing::debug!(%user, "deleted favorites document");
                Ok(RemoveAllOutcome::Deleted(document))
            }
            None => Ok(RemoveAllOutcome::NoFavorites),
        }
    }
}

/// Order-preserving dedupe of campsite ids.
fn dedupe(ids: Vec<CampsiteId>) -> Vec<CampsiteId> {
    let mut unique: Vec<CampsiteId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
