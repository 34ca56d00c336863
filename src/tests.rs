use crate::api::mock::{MockClient, paginate};
use crate::api::{self, AnyApi, ApiClient};
use crate::config::{ApiMode, Config};
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::transport::LogNavigator;
use crate::types::{
    ApiEnvelope, Credentials, Novel, NovelStatus, Page, PageQuery, PasswordChange,
    RecommendationKind, RecommendationQuery, RegisterRequest, ResetPasswordRequest, SearchQuery,
    SortBy, User, UserRole,
};
use std::sync::Arc;

fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        username: "alice".to_string(),
        role: UserRole::User,
        display_name: Some("Alice".to_string()),
        bio: None,
        email: Some("alice@example.com".to_string()),
        avatar_url: None,
        status: None,
    }
}

fn credentials(credential: &str, password: &str) -> Credentials {
    Credentials {
        credential: credential.to_string(),
        password: password.to_string(),
    }
}

fn mock() -> MockClient {
    MockClient::new()
}

// --- Session store ---

#[test]
fn session_saves_and_reloads() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::open(dir.path());
    assert!(!store.is_authenticated());

    store.save("token-abc", &test_user());
    assert!(store.is_authenticated());
    assert_eq!(store.token().as_deref(), Some("token-abc"));

    // A fresh store over the same directory sees the persisted session.
    let reopened = SessionStore::open(dir.path());
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.token().as_deref(), Some("token-abc"));
    assert_eq!(reopened.user().unwrap().username, "alice");
}

#[test]
fn session_clear_removes_everything() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::open(dir.path());
    store.save("token-abc", &test_user());
    store.clear();

    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
    assert!(store.user().is_none());

    // Clearing an already-empty store is fine.
    store.clear();

    let reopened = SessionStore::open(dir.path());
    assert!(!reopened.is_authenticated());
}

#[test]
fn session_discards_partial_state_on_open() {
    let dir = tempfile::tempdir().unwrap();

    // Token without a user profile: a previous save was interrupted.
    std::fs::write(dir.path().join("token"), "orphan-token").unwrap();

    let store = SessionStore::open(dir.path());
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
    assert!(!dir.path().join("token").exists());
}

#[test]
fn session_discards_corrupt_user_file() {
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(dir.path().join("token"), "token-abc").unwrap();
    std::fs::write(dir.path().join("user.json"), "{not json").unwrap();

    let store = SessionStore::open(dir.path());
    assert!(!store.is_authenticated());
    assert!(store.token().is_none());
}

#[test]
fn session_update_user_without_session_is_noop() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::open(dir.path());
    store.update_user(&test_user());

    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
}

#[test]
fn session_update_user_keeps_token() {
    let dir = tempfile::tempdir().unwrap();

    let store = SessionStore::open(dir.path());
    store.save("token-abc", &test_user());

    let mut updated = test_user();
    updated.display_name = Some("Alice B.".to_string());
    store.update_user(&updated);

    assert_eq!(store.token().as_deref(), Some("token-abc"));
    assert_eq!(
        store.user().unwrap().display_name.as_deref(),
        Some("Alice B.")
    );
}

// --- Config ---

#[test]
fn config_defaults() {
    let config = Config::default();
    assert_eq!(config.api.mode, ApiMode::Mock);
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.api.timeout().as_secs(), 15);
    assert!(config.session.dir.is_none());
}

#[test]
fn config_parses_toml() {
    let config: Config = toml::from_str(
        r#"
[api]
mode = "real"
base_url = "https://novels.example.com/api"
timeout_secs = 30

[session]
dir = "/tmp/ns-session"
"#,
    )
    .unwrap();

    assert_eq!(config.api.mode, ApiMode::Real);
    assert_eq!(config.api.base_url, "https://novels.example.com/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert!(config.session.dir.is_some());
}

#[test]
fn config_partial_toml_uses_defaults() {
    let config: Config = toml::from_str("[api]\nmode = \"real\"\n").unwrap();
    assert_eq!(config.api.mode, ApiMode::Real);
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.api.timeout_secs, 15);
}

#[test]
fn config_generated_default_parses() {
    let config: Config = toml::from_str(&Config::generate_default()).unwrap();
    assert_eq!(config.api.mode, ApiMode::Mock);
}

// --- Wire types ---

#[test]
fn envelope_defaults_for_missing_fields() {
    let env: ApiEnvelope<i32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
    assert!(env.success);
    assert!(env.message.is_empty());
    assert!(env.data.is_none());
}

#[test]
fn envelope_null_data_is_absent() {
    let env: ApiEnvelope<i32> =
        serde_json::from_str(r#"{"success":true,"message":"OK","data":null}"#).unwrap();
    assert!(env.data.is_none());
}

#[test]
fn page_uses_camel_case_keys() {
    let page: Page<i32> =
        serde_json::from_str(r#"{"items":[1,2],"total":7,"page":1,"pageSize":2}"#).unwrap();
    assert_eq!(page.items, vec![1, 2]);
    assert_eq!(page.total, 7);
    assert_eq!(page.page_size, 2);
}

#[test]
fn novel_optional_fields_deserialize_absent() {
    let novel: Novel = serde_json::from_str(
        r#"{"id":"9","title":"T","author":"A","category":"C","tags":[],"intro":"",
            "updatedAt":"2026-01-01T00:00:00Z","views":0,"favorites":0,"rating":0.0,
            "wordCount":0}"#,
    )
    .unwrap();
    assert!(novel.my_favorite.is_none());
    assert!(novel.my_rating.is_none());
    assert!(novel.status.is_none());
}

// --- Pagination ---

#[test]
fn paginate_returns_requested_window() {
    let items: Vec<u32> = (1..=25).collect();
    let page = paginate(
        &items,
        PageQuery {
            page: Some(2),
            page_size: Some(10),
        },
    );

    assert_eq!(page.items, (11..=20).collect::<Vec<u32>>());
    assert_eq!(page.total, 25);
    assert_eq!(page.page, 2);
    assert_eq!(page.page_size, 10);
}

#[test]
fn paginate_defaults_to_first_page_of_ten() {
    let items: Vec<u32> = (1..=25).collect();
    let page = paginate(&items, PageQuery::default());

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0], 1);
    assert_eq!(page.page, 1);
}

#[test]
fn paginate_past_end_is_empty_with_total() {
    let items: Vec<u32> = (1..=5).collect();
    let page = paginate(
        &items,
        PageQuery {
            page: Some(4),
            page_size: Some(10),
        },
    );

    assert!(page.items.is_empty());
    assert_eq!(page.total, 5);
}

// --- Mock backend ---

#[tokio::test(start_paused = true)]
async fn mock_login_admin_fixture() {
    let api = mock();
    let session = api.login(&credentials("admin", "admin123")).await.unwrap();
    assert_eq!(session.user.role, UserRole::Admin);
    assert!(!session.token.is_empty());
}

#[tokio::test(start_paused = true)]
async fn mock_login_accepts_test_password_for_any_account() {
    let api = mock();
    let session = api
        .login(&credentials("whoever@example.com", "123456"))
        .await
        .unwrap();
    assert_eq!(session.user.role, UserRole::User);
}

#[tokio::test(start_paused = true)]
async fn mock_login_rejects_wrong_password() {
    let api = mock();
    let err = api
        .login(&credentials("alice", "wrong-password"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Envelope(_)));
    assert_eq!(err.to_string(), "incorrect account or password");
}

#[tokio::test(start_paused = true)]
async fn mock_login_rejects_empty_credentials() {
    let api = mock();
    let err = api.login(&credentials("", "")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn mock_register_rejects_password_mismatch() {
    let api = mock();
    let err = api
        .register(&RegisterRequest {
            username: "bob".to_string(),
            display_name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            code: "000000".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn mock_reset_password_checks_code() {
    let api = mock();

    let bad = api
        .reset_password(&ResetPasswordRequest {
            email: "alice@example.com".to_string(),
            code: "999999".to_string(),
            password: "newpass".to_string(),
            confirm_password: "newpass".to_string(),
        })
        .await;
    assert!(bad.is_err());

    let good = api
        .reset_password(&ResetPasswordRequest {
            email: "alice@example.com".to_string(),
            code: "123456".to_string(),
            password: "newpass".to_string(),
            confirm_password: "newpass".to_string(),
        })
        .await;
    assert!(good.is_ok());
}

#[tokio::test(start_paused = true)]
async fn mock_change_password_rejects_mismatch() {
    let api = mock();
    let err = api
        .change_password(&PasswordChange {
            old_password: "old".to_string(),
            new_password: "a".to_string(),
            confirm_password: "b".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn mock_search_filters_by_author() {
    let api = mock();
    let page = api
        .search_novels(&SearchQuery {
            author: Some("Iris Vane".to_string()),
            ..SearchQuery::default()
        })
        .await
        .unwrap();

    assert!(!page.items.is_empty());
    assert!(page.items.iter().all(|n| n.author == "Iris Vane"));
}

#[tokio::test(start_paused = true)]
async fn mock_search_sorts_by_rating() {
    let api = mock();
    let page = api
        .search_novels(&SearchQuery {
            sort: Some(SortBy::Rating),
            ..SearchQuery::default()
        })
        .await
        .unwrap();

    let ratings: Vec<f64> = page.items.iter().map(|n| n.rating).collect();
    let mut sorted = ratings.clone();
    sorted.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(ratings, sorted);
}

#[tokio::test(start_paused = true)]
async fn mock_search_unknown_keyword_is_empty() {
    let api = mock();
    let page = api
        .search_novels(&SearchQuery {
            keyword: Some("zzzz-no-such-novel".to_string()),
            ..SearchQuery::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test(start_paused = true)]
async fn mock_novel_detail_reports_shelf_membership() {
    let api = mock();

    // "1" is on the seeded shelf, "2" is not.
    let on_shelf = api.novel("1").await.unwrap();
    assert_eq!(on_shelf.my_favorite, Some(true));

    let off_shelf = api.novel("2").await.unwrap();
    assert_eq!(off_shelf.my_favorite, Some(false));
}

#[tokio::test(start_paused = true)]
async fn mock_novel_unknown_id_fails() {
    let api = mock();
    let err = api.novel("no-such-id").await.unwrap_err();
    assert_eq!(err.to_string(), "novel not found");
}

#[tokio::test(start_paused = true)]
async fn mock_bookshelf_add_is_idempotent() {
    let api = mock();

    api.add_to_bookshelf("2").await.unwrap();
    api.add_to_bookshelf("2").await.unwrap();

    let shelf = api.bookshelf(PageQuery::default()).await.unwrap();
    let count = shelf.iter().filter(|n| n.id == "2").count();
    assert_eq!(count, 1);
}

#[tokio::test(start_paused = true)]
async fn mock_bookshelf_remove() {
    let api = mock();

    api.remove_from_bookshelf("1").await.unwrap();
    let shelf = api.bookshelf(PageQuery::default()).await.unwrap();
    assert!(shelf.iter().all(|n| n.id != "1"));

    // Removing something absent is fine.
    api.remove_from_bookshelf("1").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn mock_record_read_dedupes_per_novel() {
    let api = mock();
    let before = api.read_history().await.unwrap().len();

    api.record_read("2").await.unwrap();
    api.record_read("2").await.unwrap();

    let history = api.read_history().await.unwrap();
    assert_eq!(history.len(), before + 1);
    assert_eq!(
        history.iter().filter(|h| h.novel.id == "2").count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn mock_clear_read_history() {
    let api = mock();
    api.clear_read_history().await.unwrap();
    assert!(api.read_history().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mock_comments_paginate() {
    let api = mock();

    let page = api
        .comments(
            "1",
            PageQuery {
                page: Some(2),
                page_size: Some(10),
            },
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total, 25);
    assert_eq!(page.page, 2);
}

#[tokio::test(start_paused = true)]
async fn mock_post_comment_rejects_blank() {
    let api = mock();
    let err = api.post_comment("1", "   ", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test(start_paused = true)]
async fn mock_chapter_has_content() {
    let api = mock();
    let chapter = api.chapter("1", "3").await.unwrap();
    assert_eq!(chapter.id, 3);
    assert!(chapter.content.as_deref().is_some_and(|c| !c.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn mock_rate_rejects_out_of_range_score() {
    let api = mock();
    assert!(api.rate_novel("1", 0).await.is_err());
    assert!(api.rate_novel("1", 6).await.is_err());
    assert!(api.rate_novel("1", 5).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn mock_recommendations_completed_only_returns_completed() {
    let api = mock();
    let picks = api
        .recommendations(&RecommendationQuery {
            kind: RecommendationKind::Completed,
            novel_id: None,
            limit: None,
        })
        .await
        .unwrap();

    assert!(!picks.is_empty());
    assert!(
        picks
            .iter()
            .all(|n| n.status == Some(NovelStatus::Completed))
    );
}

#[tokio::test(start_paused = true)]
async fn mock_recommendations_respect_limit() {
    let api = mock();
    let picks = api
        .recommendations(&RecommendationQuery {
            kind: RecommendationKind::Hot,
            novel_id: None,
            limit: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(picks.len(), 3);
}

// --- Backend factory ---

#[test]
fn factory_builds_requested_backend() {
    let dir = tempfile::tempdir().unwrap();
    let session = SessionStore::open(dir.path());

    let mut config = Config::default();
    let client = api::client_for_mode(&config, session.clone(), Arc::new(LogNavigator)).unwrap();
    assert!(matches!(client, AnyApi::Mock(_)));

    config.api.mode = ApiMode::Real;
    let client = api::client_for_mode(&config, session, Arc::new(LogNavigator)).unwrap();
    assert!(matches!(client, AnyApi::Http(_)));
}
