//! Router-level tests for the favorites API.
//!
//! Drives the real router (session layer included) with `oneshot` requests
//! against the in-memory store. A test-local login route stands in for the
//! account service that would normally establish the session identity.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::extract::Path;
use axum::http::{Request, Response, StatusCode, header};
use axum::routing::post;
use axum::Router;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session};

use trailpost_api::config::{ApiConfig, StoreBackend};
use trailpost_api::db::MemoryFavoriteStore;
use trailpost_api::middleware::create_session_layer;
use trailpost_api::models::{Campsite, CurrentUser, FavoriteDocument, FavoritesView, session_keys};
use trailpost_api::routes;
use trailpost_api::state::AppState;

use trailpost_core::{CampsiteId, UserId};

const ALREADY_FAVORITED: &str = "That campsite is already in the list of favorites!";
const NOTHING_TO_DELETE: &str = "You do not have any favorites to delete.";

fn test_config() -> ApiConfig {
    ApiConfig {
        store: StoreBackend::Memory,
        database_url: None,
        host: "127.0.0.1".parse().expect("addr"),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        allowed_origins: Vec::new(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Test stand-in for the account service: store an identity in the session.
async fn test_login(session: Session, Path(user_id): Path<i32>) -> StatusCode {
    let user = CurrentUser {
        id: UserId::new(user_id),
    };
    match session.insert(session_keys::CURRENT_USER, user).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the app with seeded campsites and a login helper route.
fn test_app(campsites: Vec<Campsite>) -> Router {
    let config = test_config();
    let store = MemoryFavoriteStore::new();
    store.insert_campsites(campsites);

    let session_layer = create_session_layer(MemoryStore::default(), &config);
    let state = AppState::new(config, Arc::new(store));

    Router::new()
        .merge(routes::routes())
        .route("/test/login/{user_id}", post(test_login))
        .layer(session_layer)
        .with_state(state)
}

fn campsite(id: &str, name: &str) -> Campsite {
    Campsite {
        id: CampsiteId::new(id),
        name: name.to_owned(),
        description: format!("{name} description"),
        image: None,
        featured: false,
    }
}

struct TestClient {
    app: Router,
    cookie: String,
}

impl TestClient {
    /// Build an app and log in as `user_id`, capturing the session cookie.
    async fn logged_in(campsites: Vec<Campsite>, user_id: i32) -> Self {
        let app = test_app(campsites);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/test/login/{user_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("login response");
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .expect("session cookie")
            .to_owned();

        Self { app, cookie }
    }

    async fn request(&self, method: &str, uri: &str, json_body: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, &self.cookie);

        let body = match json_body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };

        self.app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response")
    }
}

fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected() {
    let app = test_app(Vec::new());

    for (method, uri) in [
        ("GET", "/favorites"),
        ("POST", "/favorites"),
        ("PUT", "/favorites"),
        ("DELETE", "/favorites"),
        ("POST", "/favorites/c1"),
        ("DELETE", "/favorites/c1"),
    ] {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = if method == "POST" && uri == "/favorites" {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from("[]")
        } else {
            Body::empty()
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require auth"
        );
    }
}

#[tokio::test]
async fn test_list_is_null_then_reflects_adds() {
    let client = TestClient::logged_in(
        vec![campsite("c1", "React Lake"), campsite("c2", "Chrome River")],
        1,
    )
    .await;

    let response = client.request("GET", "/favorites", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));
    assert_eq!(body_text(response).await, "null");

    let response = client
        .request("POST", "/favorites", Some(r#"["c2", {"_id": "c1"}]"#))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.request("GET", "/favorites", None).await;
    let view: FavoritesView =
        serde_json::from_str(&body_text(response).await).expect("view json");
    let names: Vec<_> = view.campsites.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Chrome River", "React Lake"]);
}

#[tokio::test]
async fn test_add_one_is_idempotent_over_http() {
    let client = TestClient::logged_in(vec![campsite("c1", "React Lake")], 1).await;

    let first = client.request("POST", "/favorites/C1", None).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert!(content_type(&first).starts_with("application/json"));
    let document: FavoriteDocument =
        serde_json::from_str(&body_text(first).await).expect("document json");
    assert_eq!(document.campsites, vec![CampsiteId::new("c1")]);

    // Same campsite, different representation: plain-text no-op.
    let second = client.request("POST", "/favorites/c1", None).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(content_type(&second).starts_with("text/plain"));
    assert_eq!(body_text(second).await, ALREADY_FAVORITED);
}

#[tokio::test]
async fn test_remove_one_keeps_empty_document() {
    let client = TestClient::logged_in(vec![campsite("c1", "React Lake")], 1).await;

    client.request("POST", "/favorites/c1", None).await;

    let response = client.request("DELETE", "/favorites/c1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));
    let document: FavoriteDocument =
        serde_json::from_str(&body_text(response).await).expect("document json");
    assert!(document.campsites.is_empty());

    // Document still exists: list is an empty view, not null.
    let response = client.request("GET", "/favorites", None).await;
    let view: Option<FavoritesView> =
        serde_json::from_str(&body_text(response).await).expect("view json");
    assert!(view.expect("view").campsites.is_empty());
}

#[tokio::test]
async fn test_delete_all_then_nothing_to_delete() {
    let client = TestClient::logged_in(vec![campsite("c1", "React Lake")], 1).await;

    client.request("POST", "/favorites/c1", None).await;

    let response = client.request("DELETE", "/favorites", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));

    let response = client.request("DELETE", "/favorites", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(body_text(response).await, NOTHING_TO_DELETE);

    // Removing a single item with no document is also a plain-text no-op.
    let response = client.request("DELETE", "/favorites/c1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(body_text(response).await, NOTHING_TO_DELETE);
}

#[tokio::test]
async fn test_put_is_forbidden() {
    let client = TestClient::logged_in(Vec::new(), 1).await;

    let response = client.request("PUT", "/favorites", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_text(response).await,
        "PUT operation not supported on /favorites"
    );

    let response = client.request("PUT", "/favorites/c1", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_text(response).await,
        "PUT operation not supported on /favorites/c1"
    );

    let response = client.request("GET", "/favorites/c1", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_users_have_independent_favorites() {
    let app = test_app(vec![campsite("c1", "React Lake")]);

    // Two separately logged-in users against the same app.
    let login = |user_id: i32| {
        let app = app.clone();
        async move {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/test/login/{user_id}"))
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("login");
            let cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(';').next())
                .expect("cookie")
                .to_owned();
            TestClient { app, cookie }
        }
    };

    let alice = login(1).await;
    let bob = login(2).await;

    alice.request("POST", "/favorites/c1", None).await;

    let response = bob.request("GET", "/favorites", None).await;
    assert_eq!(body_text(response).await, "null");
}
