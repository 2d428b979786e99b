//! Favorites route handlers.
//!
//! Thin HTTP layer over [`FavoritesService`]: decode the request, run the
//! operation, map the outcome to a response. Document-carrying outcomes
//! respond as JSON; no-op outcomes respond as plain text with a fixed
//! message. Unsupported method/path combinations answer 403 without touching
//! the store.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use trailpost_core::CampsiteId;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{FavoriteDocument, FavoritesView};
use crate::services::{
    AddOneOutcome, FavoritesService, RemoveAllOutcome, RemoveOneOutcome,
};
use crate::state::AppState;

/// Plain-text response when adding a campsite that is already favorited.
pub const ALREADY_FAVORITED: &str = "That campsite is already in the list of favorites!";

/// Plain-text response when a delete finds nothing to remove.
pub const NOTHING_TO_DELETE: &str = "You do not have any favorites to delete.";

/// A campsite reference in a `POST /favorites` body.
///
/// Clients send either bare id strings or full campsite documents; id
/// extraction happens here, at the decoding boundary, so the service only
/// ever sees typed ids.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CampsiteRef {
    /// A bare campsite id string.
    Id(CampsiteId),
    /// A referenced campsite document; only the id is used.
    Document {
        #[serde(rename = "_id")]
        id: CampsiteId,
    },
}

impl From<CampsiteRef> for CampsiteId {
    fn from(reference: CampsiteRef) -> Self {
        match reference {
            CampsiteRef::Id(id) | CampsiteRef::Document { id } => id,
        }
    }
}

/// List the current user's favorites with campsite data resolved.
///
/// GET /favorites
///
/// Responds with the expanded document, or JSON `null` if the user has no
/// favorites document.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
#[instrument(skip(state, user), fields(user = %user.0.id))]
pub async fn list(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<Option<FavoritesView>>, AppError> {
    let service = FavoritesService::new(state.store());
    let view = service.list(user.0.id).await?;
    Ok(Json(view))
}

/// Add several campsites to the current user's favorites.
///
/// POST /favorites
///
/// The body is a JSON array of campsite refs. Responds with the resulting
/// document, or JSON `null` when there was no document and nothing to add.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
#[instrument(skip(state, user, body), fields(user = %user.0.id))]
pub async fn add_many(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(body): Json<Vec<CampsiteRef>>,
) -> Result<Json<Option<FavoriteDocument>>, AppError> {
    let ids = body.into_iter().map(CampsiteId::from).collect();

    let service = FavoritesService::new(state.store());
    let document = service.add_many(user.0.id, ids).await?;
    Ok(Json(document))
}

/// Replacing the favorites list wholesale is not supported.
///
/// PUT /favorites
pub async fn replace_all(_user: RequireAuth) -> Response {
    (
        StatusCode::FORBIDDEN,
        "PUT operation not supported on /favorites",
    )
        .into_response()
}

/// Delete the current user's favorites document.
///
/// DELETE /favorites
///
/// Responds with the deleted document as JSON, or a plain-text notice if
/// there was nothing to delete. Both are 200s.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
#[instrument(skip(state, user), fields(user = %user.0.id))]
pub async fn remove_all(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Response, AppError> {
    let service = FavoritesService::new(state.store());
    let response = match service.remove_all(user.0.id).await? {
        RemoveAllOutcome::Deleted(document) => Json(document).into_response(),
        RemoveAllOutcome::NoFavorites => NOTHING_TO_DELETE.into_response(),
    };
    Ok(response)
}

/// Fetching a single favorite is not supported.
///
/// GET /favorites/{campsiteId}
pub async fn get_one(_user: RequireAuth, Path(campsite_id): Path<CampsiteId>) -> Response {
    (
        StatusCode::FORBIDDEN,
        format!("GET operation not supported on /favorites/{campsite_id}"),
    )
        .into_response()
}

/// Add a single campsite to the current user's favorites.
///
/// POST /favorites/{campsiteId}
///
/// Responds with the document as JSON, or a plain-text notice if the
/// campsite was already favorited (no write happens in that case).
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
#[instrument(skip(state, user), fields(user = %user.0.id))]
pub async fn add_one(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(campsite_id): Path<CampsiteId>,
) -> Result<Response, AppError> {
    let service = FavoritesService::new(state.store());
    let response = match service.add_one(user.0.id, campsite_id).await? {
        AddOneOutcome::Saved(document) => Json(document).into_response(),
        AddOneOutcome::AlreadyFavorited => ALREADY_FAVORITED.into_response(),
    };
    Ok(response)
}

/// Replacing a single favorite is not supported.
///
/// PUT /favorites/{campsiteId}
pub async fn replace_one(_user: RequireAuth, Path(campsite_id): Path<CampsiteId>) -> Response {
    (
        StatusCode::FORBIDDEN,
        format!("PUT operation not supported on /favorites/{campsite_id}"),
    )
        .into_response()
}

/// Remove a single campsite from the current user's favorites.
///
/// DELETE /favorites/{campsiteId}
///
/// Responds with the updated document as JSON (possibly with an empty list;
/// the document itself survives), or a plain-text notice if the user has no
/// favorites document.
///
/// # Errors
///
/// Returns `AppError::Store` if the store fails.
#[instrument(skip(state, user), fields(user = %user.0.id))]
pub async fn remove_one(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(campsite_id): Path<CampsiteId>,
) -> Result<Response, AppError> {
    let service = FavoritesService::new(state.store());
    let response = match service.remove_one(user.0.id, campsite_id).await? {
        RemoveOneOutcome::Saved(document) => Json(document).into_response(),
        RemoveOneOutcome::NoFavorites => NOTHING_TO_DELETE.into_response(),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::header;

    use trailpost_core::UserId;

    use super::*;
    use crate::config::{ApiConfig, StoreBackend};
    use crate::db::MemoryFavoriteStore;
    use crate::models::CurrentUser;

    fn test_state() -> AppState {
        let config = ApiConfig {
            store: StoreBackend::Memory,
            database_url: None,
            host: "127.0.0.1".parse().expect("addr"),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            allowed_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        AppState::new(config, Arc::new(MemoryFavoriteStore::new()))
    }

    fn auth(user: i32) -> RequireAuth {
        RequireAuth(CurrentUser {
            id: UserId::new(user),
        })
    }

    fn content_type(response: &Response) -> String {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn test_add_one_then_already_favorited() {
        let state = test_state();

        let first = add_one(
            State(state.clone()),
            auth(1),
            Path(CampsiteId::new("c1")),
        )
        .await
        .expect("add");
        assert_eq!(first.status(), StatusCode::OK);
        assert!(content_type(&first).starts_with("application/json"));

        let second = add_one(
            State(state.clone()),
            auth(1),
            Path(CampsiteId::new("c1")),
        )
        .await
        .expect("re-add");
        assert_eq!(second.status(), StatusCode::OK);
        assert!(content_type(&second).starts_with("text/plain"));
        assert_eq!(body_text(second).await, ALREADY_FAVORITED);
    }

    #[tokio::test]
    async fn test_remove_all_without_favorites_is_plain_text() {
        let state = test_state();

        let response = remove_all(State(state), auth(1)).await.expect("remove");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(content_type(&response).starts_with("text/plain"));
        assert_eq!(body_text(response).await, NOTHING_TO_DELETE);
    }

    #[tokio::test]
    async fn test_put_routes_are_forbidden() {
        let whole = replace_all(auth(1)).await;
        assert_eq!(whole.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_text(whole).await,
            "PUT operation not supported on /favorites"
        );

        let single = replace_one(auth(1), Path(CampsiteId::new("c1"))).await;
        assert_eq!(single.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_text(single).await,
            "PUT operation not supported on /favorites/c1"
        );
    }

    #[tokio::test]
    async fn test_get_one_is_forbidden() {
        let response = get_one(auth(1), Path(CampsiteId::new("c1"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_text(response).await,
            "GET operation not supported on /favorites/c1"
        );
    }

    #[tokio::test]
    async fn test_add_many_extracts_ids_from_mixed_refs() {
        let state = test_state();

        let body = vec![
            CampsiteRef::Id(CampsiteId::new("c1")),
            CampsiteRef::Document {
                id: CampsiteId::new("C1"),
            },
            CampsiteRef::Document {
                id: CampsiteId::new("c2"),
            },
        ];

        let Json(document) = add_many(State(state), auth(1), Json(body))
            .await
            .expect("add many");
        let document = document.expect("document");
        assert_eq!(
            document.campsites,
            vec![CampsiteId::new("c1"), CampsiteId::new("c2")]
        );
    }

    #[tokio::test]
    async fn test_campsite_ref_deserializes_both_shapes() {
        let refs: Vec<CampsiteRef> =
            serde_json::from_str(r#"["c1", {"_id": "c2"}]"#).expect("deserialize");
        let ids: Vec<CampsiteId> = refs.into_iter().map(CampsiteId::from).collect();
        assert_eq!(ids, vec![CampsiteId::new("c1"), CampsiteId::new("c2")]);
    }

    #[tokio::test]
    async fn test_list_without_document_is_json_null() {
        let state = test_state();

        let Json(view) = list(State(state), auth(1)).await.expect("list");
        assert!(view.is_none());
    }

    #[tokio::test]
    async fn test_remove_one_returns_empty_document() {
        let state = test_state();

        add_one(State(state.clone()), auth(1), Path(CampsiteId::new("c1")))
            .await
            .expect("seed");

        let response = remove_one(State(state.clone()), auth(1), Path(CampsiteId::new("c1")))
            .await
            .expect("remove");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(content_type(&response).starts_with("application/json"));

        let document: FavoriteDocument =
            serde_json::from_str(&body_text(response).await).expect("document json");
        assert!(document.campsites.is_empty());

        // The empty document is still listed, not deleted.
        let Json(view) = list(State(state), auth(1)).await.expect("list");
        assert!(view.expect("view").campsites.is_empty());
    }
}
