//! End-to-end tests of the HTTP backend against an in-process server.
//!
//! Each test spins up a small axum app on a random port, points a real
//! transport at it and drives the public client operations, so bearer
//! injection, envelope unwrapping and the unauthorized reaction are
//! exercised over actual sockets.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use novelshelf::api::{ApiClient, HttpApi};
use novelshelf::error::ApiError;
use novelshelf::session::SessionStore;
use novelshelf::transport::{LOGIN_PATH, Navigator, Transport};
use novelshelf::types::{User, UserRole};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

/// Navigator that records every redirect target.
#[derive(Default)]
struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn goto(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }
}

/// Serve `router` on a random local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

struct Harness {
    api: HttpApi,
    session: SessionStore,
    navigator: Arc<RecordingNavigator>,
    _dir: tempfile::TempDir,
}

async fn harness(router: Router) -> Harness {
    harness_with_timeout(router, Duration::from_secs(5)).await
}

async fn harness_with_timeout(router: Router, timeout: Duration) -> Harness {
    let base_url = serve(router).await;
    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::open(dir.path());
    let navigator = Arc::new(RecordingNavigator::default());

    let transport = Transport::new(&base_url, timeout, session.clone(), navigator.clone()).unwrap();

    Harness {
        api: HttpApi::new(transport),
        session,
        navigator,
        _dir: dir,
    }
}

fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        username: "alice".to_string(),
        role: UserRole::User,
        display_name: None,
        bio: None,
        email: None,
        avatar_url: None,
        status: None,
    }
}

fn user_envelope() -> Value {
    json!({
        "success": true,
        "message": "OK",
        "data": { "id": "user-1", "username": "alice", "role": "user" }
    })
}

#[tokio::test]
async fn bearer_token_attached_when_logged_in() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let router = Router::new().route(
        "/users/me",
        get(
            |State(seen): State<Arc<Mutex<Option<String>>>>, headers: HeaderMap| async move {
                *seen.lock() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                Json(user_envelope())
            },
        )
        .with_state(seen.clone()),
    );

    let h = harness(router).await;
    h.session.save("abc123", &test_user());

    let user = h.api.me().await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(seen.lock().as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn no_bearer_header_when_logged_out() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let router = Router::new().route(
        "/users/me",
        get(
            |State(seen): State<Arc<Mutex<Option<String>>>>, headers: HeaderMap| async move {
                *seen.lock() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                Json(user_envelope())
            },
        )
        .with_state(seen.clone()),
    );

    let h = harness(router).await;
    h.api.me().await.unwrap();
    assert!(seen.lock().is_none());
}

#[tokio::test]
async fn envelope_failure_surfaces_server_message() {
    let router = Router::new().route(
        "/users/me",
        get(|| async { Json(json!({ "success": false, "message": "account disabled" })) }),
    );

    let h = harness(router).await;
    let err = h.api.me().await.unwrap_err();

    assert!(matches!(err, ApiError::Envelope(_)));
    assert_eq!(err.to_string(), "account disabled");
}

#[tokio::test]
async fn success_without_data_is_an_error() {
    let router = Router::new().route(
        "/users/me",
        get(|| async { Json(json!({ "success": true, "message": "", "data": null })) }),
    );

    let h = harness(router).await;
    let err = h.api.me().await.unwrap_err();

    assert!(matches!(err, ApiError::Envelope(_)));
    assert_eq!(err.to_string(), "empty response body");
}

#[tokio::test]
async fn unauthorized_clears_session_and_redirects() {
    let router = Router::new().route(
        "/users/me",
        get(|| async {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "token expired" })),
            )
                .into_response()
        }),
    );

    let h = harness(router).await;
    h.session.save("stale-token", &test_user());

    let err = h.api.me().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "token expired");
    assert!(!h.session.is_authenticated());
    assert!(h.session.token().is_none());
    assert_eq!(*h.navigator.paths.lock(), vec![LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn unauthorized_without_body_uses_fallback_message() {
    let router = Router::new().route(
        "/users/me",
        get(|| async { axum::http::StatusCode::UNAUTHORIZED.into_response() }),
    );

    let h = harness(router).await;
    let err = h.api.me().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "session expired, please log in again");
}

#[tokio::test]
async fn server_error_prefers_envelope_message() {
    let router = Router::new().route(
        "/users/me",
        get(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "maintenance window" })),
            )
                .into_response()
        }),
    );

    let h = harness(router).await;
    let err = h.api.me().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.to_string(), "maintenance window");
}

#[tokio::test]
async fn server_error_without_envelope_reports_status() {
    let router = Router::new().route(
        "/users/me",
        get(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "stack trace goes here",
            )
                .into_response()
        }),
    );

    let h = harness(router).await;
    let err = h.api.me().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.to_string().starts_with("HTTP 500"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let router = Router::new().route(
        "/users/me",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(user_envelope())
        }),
    );

    let h = harness_with_timeout(router, Duration::from_millis(100)).await;
    let err = h.api.me().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout));
}

#[tokio::test]
async fn query_parameters_reach_the_server() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let router = Router::new().route(
        "/novels/search",
        get(
            |State(seen): State<Arc<Mutex<Option<String>>>>,
             axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                *seen.lock() = query;
                Json(json!({
                    "success": true,
                    "message": "OK",
                    "data": { "items": [], "total": 0, "page": 1, "pageSize": 10 }
                }))
            },
        )
        .with_state(seen.clone()),
    );

    let h = harness(router).await;
    h.api
        .search_novels(&novelshelf::types::SearchQuery {
            keyword: Some("sword".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let query = seen.lock().clone().unwrap();
    assert!(query.contains("q=sword"));
    assert!(query.contains("page=1"));
    assert!(query.contains("pageSize=10"));
    assert!(query.contains("sort=hot"));
}
