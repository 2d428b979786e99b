//! `PostgreSQL` favorites store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use trailpost_core::{CampsiteId, UserId};

use super::{FavoriteStore, StoreError};
use crate::models::{Campsite, FavoriteDocument};

/// Favorites store backed by `PostgreSQL`.
pub struct PgFavoriteStore {
    pool: PgPool,
}

impl PgFavoriteStore {
    /// Create a new store from a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a `favorites` row to the domain type.
fn document_from_row(row: &PgRow) -> Result<FavoriteDocument, StoreError> {
    let user: i32 = row.try_get("user_id")?;
    let campsites: Vec<String> = row.try_get("campsites")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(FavoriteDocument {
        user: UserId::new(user),
        campsites: campsites.iter().map(|id| CampsiteId::new(id)).collect(),
        created_at,
        updated_at,
    })
}

/// Campsite ids as plain strings for a `TEXT[]` bind parameter.
fn to_text_array(campsites: &[CampsiteId]) -> Vec<String> {
    campsites.iter().map(|id| id.as_str().to_owned()).collect()
}

#[async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn find(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT user_id, campsites, created_at, updated_at
            FROM favorites
            WHERE user_id = $1
            ",
        )
        .bind(user.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn create(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError> {
        let row = sqlx::query(
            r"
            INSERT INTO favorites (user_id, campsites)
            VALUES ($1, $2)
            RETURNING user_id, campsites, created_at, updated_at
            ",
        )
        .bind(user.as_i32())
        .bind(to_text_array(&campsites))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict("favorites document already exists".to_owned());
            }
            StoreError::Database(e)
        })?;

        document_from_row(&row)
    }

    async fn replace(
        &self,
        user: UserId,
        campsites: Vec<CampsiteId>,
    ) -> Result<FavoriteDocument, StoreError> {
        // Upsert: a concurrent delete-all between our read and this write
        // recreates the document. Last write wins.
        let row = sqlx::query(
            r"
            INSERT INTO favorites (user_id, campsites)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET campsites = EXCLUDED.campsites,
                updated_at = now()
            RETURNING user_id, campsites, created_at, updated_at
            ",
        )
        .bind(user.as_i32())
        .bind(to_text_array(&campsites))
        .fetch_one(&self.pool)
        .await?;

        document_from_row(&row)
    }

    async fn delete(&self, user: UserId) -> Result<Option<FavoriteDocument>, StoreError> {
        let row = sqlx::query(
            r"
            DELETE FROM favorites
            WHERE user_id = $1
            RETURNING user_id, campsites, created_at, updated_at
            ",
        )
        .bind(user.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn resolve_campsites(&self, ids: &[CampsiteId]) -> Result<Vec<Campsite>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r"
            SELECT id, name, description, image, featured
            FROM campsites
            WHERE id = ANY($1)
            ",
        )
        .bind(to_text_array(ids))
        .fetch_all(&self.pool)
        .await?;

        let mut resolved = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id")?;
            resolved.push(Campsite {
                id: CampsiteId::new(&id),
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                image: row.try_get("image")?,
                featured: row.try_get("featured")?,
            });
        }

        // ANY($1) returns rows in table order; restore favorites order.
        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = resolved.iter().position(|c| &c.id == id) {
                ordered.push(resolved.swap_remove(pos));
            }
        }

        Ok(ordered)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
