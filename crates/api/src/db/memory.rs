//! In-process favorites store.
//!
//! Backs local development (`TRAILPOST_STORE=memory`) and the test suite.
//! Mirrors the postgres backend's semantics, including last-write-wins
//! replace and the no-op delete of an absent document.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use trailpost_core::{CampsiteId, UserId};

use super::{FavoriteStore, StoreError};
use crate::models::{Campsite, FavoriteDocument};

/// Favorites store backed by in-process maps.
#[derive(Default)]
pub struct MemoryFavoriteStore {
    favorites: RwLock<HashMap<UserId, FavoriteDocument>>,
    campsites: RwLock<HashMap<CampsiteId, Campsite>>,
}

impl MemoryFavoriteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the campsite directory (development and tests).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_campsites(&self, campsites: impl IntoIterator<Item = Campsite>) {
        let mut directory = self.campsites.write().expect("campsites lock poisoned");
        for campsite in campsites {
            directory.insert(campsite.id.clone(), campsite);
        }
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn find(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError> {
        let favorites = self.favorites.read().expect("favorites lock poisoned");
        Ok(favorites.get(&user).cloned())
    }

    async fn create(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError> {
        let mut favorites = self.favorites.write().expect("favorites lock poisoned");
        if favorites.contains_key(&user) {
            return Err(StoreError::Conflict(
                "favorites document already exists".to_owned(),
            ));
        }

        let now = Utc::now();
        let document = FavoriteDocument {
            user,
            campsites,
            created_at: now,
            updated_at: now,
        };
        favorites.insert(user, document.clone());
        Ok(document)
    }

    async fn replace(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError> {
        let mut favorites = self.favorites.write().expect("favorites lock poisoned");
        let now = Utc::now();
        let document = match favorites.get(&user) {
            Some(existing) => FavoriteDocument {
                user,
                campsites,
                created_at: existing.created_at,
                updated_at: now,
            },
            None => FavoriteDocument {
                user,
                campsites,
                created_at: now,
                updated_at: now,
            },
        };
        favorites.insert(user, document.clone());
        Ok(document)
    }

    async fn delete(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError> {
        let mut favorites = self.favorites.write().expect("favorites lock poisoned");
        Ok(favorites.remove(&user))
    }

    async fn resolve_campsites(&self, ids: &[CampsiteId]) -> Result<Vec<Campsite>, StoreError> {
        let directory = self.campsites.read().expect("campsites lock poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| directory.get(id).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
