//! API capability contract and backend selection.
//!
//! [`ApiClient`] enumerates every remote operation the rest of the
//! application may invoke. Callers depend only on this trait; neither
//! implementation's internals are visible. [`client_for_mode`] picks the
//! backend once at startup — mode is not reconfigurable at runtime.

pub mod mock;
pub mod real;

pub use mock::MockClient;
pub use real::HttpApi;

use crate::config::{ApiMode, Config};
use crate::error::Result;
use crate::session::SessionStore;
use crate::transport::{Navigator, Transport};
use crate::types::{
    AdminNovelQuery, AdminUserQuery, AdminUserUpdate, AnalyticsQuery, BanKind, Chapter,
    CommentCreated, CommentThread, Credentials, LoginSession, MyComment, MyRating, Novel,
    NovelAnalyticsRow, NovelCreated, NovelDraft, NovelStatus, Page, PageQuery, PasswordChange,
    ProfileUpdate, ReadHistory, RecommendationQuery, RegisterRequest, Registered,
    ResetPasswordRequest, SearchQuery, User, UserAnalyticsRow,
};
use std::sync::Arc;

/// The complete set of remote operations available to the application.
///
/// Every operation either resolves with a typed result or fails with an
/// [`crate::ApiError`] carrying a display-ready message. No operation
/// retries; at most one network attempt per call.
#[allow(async_fn_in_trait)] // dispatch goes through AnyApi or generics, not dyn
pub trait ApiClient {
    // -------- Auth --------

    /// Request an email verification code for registration.
    async fn send_register_code(&self, email: &str) -> Result<()>;
    /// Exchange credentials for a token and profile.
    async fn login(&self, credentials: &Credentials) -> Result<LoginSession>;
    /// Create a new account.
    async fn register(&self, req: &RegisterRequest) -> Result<Registered>;
    /// Invalidate the current session server-side.
    async fn logout(&self) -> Result<()>;
    /// Request an email code for the password reset flow.
    async fn send_reset_code(&self, email: &str) -> Result<()>;
    /// Reset a forgotten password with an emailed code.
    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<()>;
    /// Update the profile of the current user; returns the new profile.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User>;
    /// Change the password of the current user.
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;
    /// Fetch the profile of the current user.
    async fn me(&self) -> Result<User>;
    /// Comments posted by the current user.
    async fn my_comments(&self, page: PageQuery) -> Result<Page<MyComment>>;
    /// Ratings given by the current user.
    async fn my_ratings(&self, page: PageQuery) -> Result<Page<MyRating>>;

    // -------- Catalog --------

    /// Search the catalog.
    async fn search_novels(&self, query: &SearchQuery) -> Result<Page<Novel>>;
    /// Fetch one novel by ID.
    async fn novel(&self, id: &str) -> Result<Novel>;
    /// List the chapters of a novel (no content).
    async fn chapters(&self, novel_id: &str) -> Result<Vec<Chapter>>;
    /// Fetch one chapter with content.
    async fn chapter(&self, novel_id: &str, chapter_id: &str) -> Result<Chapter>;

    // -------- Recommendations --------

    /// Fetch a recommendation feed.
    async fn recommendations(&self, query: &RecommendationQuery) -> Result<Vec<Novel>>;

    // -------- Bookshelf --------

    /// Novels on the current user's shelf.
    async fn bookshelf(&self, page: PageQuery) -> Result<Vec<Novel>>;
    /// Add a novel to the shelf. Adding an already-present novel is a no-op.
    async fn add_to_bookshelf(&self, novel_id: &str) -> Result<()>;
    /// Remove a novel from the shelf.
    async fn remove_from_bookshelf(&self, novel_id: &str) -> Result<()>;

    // -------- Read history --------

    /// Read-history entries, most recent first.
    async fn read_history(&self) -> Result<Vec<ReadHistory>>;
    /// Record that a novel was opened.
    async fn record_read(&self, novel_id: &str) -> Result<()>;
    /// Remove one history entry.
    async fn remove_read_history(&self, history_id: &str) -> Result<()>;
    /// Remove all history entries.
    async fn clear_read_history(&self) -> Result<()>;

    // -------- Interactions --------

    /// Comment threads on a novel.
    async fn comments(&self, novel_id: &str, page: PageQuery) -> Result<Page<CommentThread>>;
    /// Post a comment, optionally as a reply.
    async fn post_comment(
        &self,
        novel_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<CommentCreated>;
    /// Delete one of the current user's comments.
    async fn delete_comment(&self, comment_id: &str) -> Result<()>;
    /// Rate a novel, 1-5. Re-rating replaces the previous score.
    async fn rate_novel(&self, novel_id: &str, score: u8) -> Result<()>;

    // -------- Admin --------

    /// List novels for the admin console.
    async fn admin_novels(&self, query: &AdminNovelQuery) -> Result<Page<Novel>>;
    /// Create a novel.
    async fn admin_create_novel(&self, draft: &NovelDraft) -> Result<NovelCreated>;
    /// Fetch one novel for the admin console.
    async fn admin_novel(&self, id: &str) -> Result<Novel>;
    /// Update a novel.
    async fn admin_update_novel(&self, id: &str, draft: &NovelDraft) -> Result<()>;
    /// Delete (soft-delete) a novel.
    async fn admin_delete_novel(&self, id: &str) -> Result<()>;
    /// Change a novel's publication status.
    async fn admin_set_novel_status(&self, id: &str, status: NovelStatus) -> Result<()>;
    /// List user accounts.
    async fn admin_users(&self, query: &AdminUserQuery) -> Result<Page<User>>;
    /// Fetch one user account.
    async fn admin_user(&self, id: &str) -> Result<User>;
    /// Update a user account.
    async fn admin_update_user(&self, id: &str, update: &AdminUserUpdate) -> Result<()>;
    /// Ban a user.
    async fn admin_ban_user(&self, id: &str, kind: BanKind) -> Result<()>;
    /// Lift a user's ban.
    async fn admin_unban_user(&self, id: &str) -> Result<()>;
    /// Per-novel analytics.
    async fn admin_novel_analytics(&self, query: &AnalyticsQuery)
    -> Result<Page<NovelAnalyticsRow>>;
    /// Per-user analytics.
    async fn admin_user_analytics(&self, query: &AnalyticsQuery) -> Result<Page<UserAnalyticsRow>>;
}

/// Build the backend for the configured mode. Called once at startup.
pub fn client_for_mode(
    config: &Config,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
) -> Result<AnyApi> {
    match config.api.mode {
        ApiMode::Mock => Ok(AnyApi::Mock(MockClient::new())),
        ApiMode::Real => {
            let transport = Transport::new(
                &config.api.base_url,
                config.api.timeout(),
                session,
                navigator,
            )?;
            Ok(AnyApi::Http(HttpApi::new(transport)))
        }
    }
}

/// The backend selected at startup.
pub enum AnyApi {
    /// In-memory mock backend.
    Mock(MockClient),
    /// Live HTTP backend.
    Http(HttpApi),
}

macro_rules! dispatch {
    ($self:ident, $api:ident => $call:expr) => {
        match $self {
            AnyApi::Mock($api) => $call.await,
            AnyApi::Http($api) => $call.await,
        }
    };
}

impl ApiClient for AnyApi {
    async fn send_register_code(&self, email: &str) -> Result<()> {
        dispatch!(self, api => api.send_register_code(email))
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginSession> {
        dispatch!(self, api => api.login(credentials))
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Registered> {
        dispatch!(self, api => api.register(req))
    }

    async fn logout(&self) -> Result<()> {
        dispatch!(self, api => api.logout())
    }

    async fn send_reset_code(&self, email: &str) -> Result<()> {
        dispatch!(self, api => api.send_reset_code(email))
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<()> {
        dispatch!(self, api => api.reset_password(req))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        dispatch!(self, api => api.update_profile(update))
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        dispatch!(self, api => api.change_password(change))
    }

    async fn me(&self) -> Result<User> {
        dispatch!(self, api => api.me())
    }

    async fn my_comments(&self, page: PageQuery) -> Result<Page<MyComment>> {
        dispatch!(self, api => api.my_comments(page))
    }

    async fn my_ratings(&self, page: PageQuery) -> Result<Page<MyRating>> {
        dispatch!(self, api => api.my_ratings(page))
    }

    async fn search_novels(&self, query: &SearchQuery) -> Result<Page<Novel>> {
        dispatch!(self, api => api.search_novels(query))
    }

    async fn novel(&self, id: &str) -> Result<Novel> {
        dispatch!(self, api => api.novel(id))
    }

    async fn chapters(&self, novel_id: &str) -> Result<Vec<Chapter>> {
        dispatch!(self, api => api.chapters(novel_id))
    }

    async fn chapter(&self, novel_id: &str, chapter_id: &str) -> Result<Chapter> {
        dispatch!(self, api => api.chapter(novel_id, chapter_id))
    }

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<Vec<Novel>> {
        dispatch!(self, api => api.recommendations(query))
    }

    async fn bookshelf(&self, page: PageQuery) -> Result<Vec<Novel>> {
        dispatch!(self, api => api.bookshelf(page))
    }

    async fn add_to_bookshelf(&self, novel_id: &str) -> Result<()> {
        dispatch!(self, api => api.add_to_bookshelf(novel_id))
    }

    async fn remove_from_bookshelf(&self, novel_id: &str) -> Result<()> {
        dispatch!(self, api => api.remove_from_bookshelf(novel_id))
    }

    async fn read_history(&self) -> Result<Vec<ReadHistory>> {
        dispatch!(self, api => api.read_history())
    }

    async fn record_read(&self, novel_id: &str) -> Result<()> {
        dispatch!(self, api => api.record_read(novel_id))
    }

    async fn remove_read_history(&self, history_id: &str) -> Result<()> {
        dispatch!(self, api => api.remove_read_history(history_id))
    }

    async fn clear_read_history(&self) -> Result<()> {
        dispatch!(self, api => api.clear_read_history())
    }

    async fn comments(&self, novel_id: &str, page: PageQuery) -> Result<Page<CommentThread>> {
        dispatch!(self, api => api.comments(novel_id, page))
    }

    async fn post_comment(
        &self,
        novel_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<CommentCreated> {
        dispatch!(self, api => api.post_comment(novel_id, content, parent_id))
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        dispatch!(self, api => api.delete_comment(comment_id))
    }

    async fn rate_novel(&self, novel_id: &str, score: u8) -> Result<()> {
        dispatch!(self, api => api.rate_novel(novel_id, score))
    }

    async fn admin_novels(&self, query: &AdminNovelQuery) -> Result<Page<Novel>> {
        dispatch!(self, api => api.admin_novels(query))
    }

    async fn admin_create_novel(&self, draft: &NovelDraft) -> Result<NovelCreated> {
        dispatch!(self, api => api.admin_create_novel(draft))
    }

    async fn admin_novel(&self, id: &str) -> Result<Novel> {
        dispatch!(self, api => api.admin_novel(id))
    }

    async fn admin_update_novel(&self, id: &str, draft: &NovelDraft) -> Result<()> {
        dispatch!(self, api => api.admin_update_novel(id, draft))
    }

    async fn admin_delete_novel(&self, id: &str) -> Result<()> {
        dispatch!(self, api => api.admin_delete_novel(id))
    }

    async fn admin_set_novel_status(&self, id: &str, status: NovelStatus) -> Result<()> {
        dispatch!(self, api => api.admin_set_novel_status(id, status))
    }

    async fn admin_users(&self, query: &AdminUserQuery) -> Result<Page<User>> {
        dispatch!(self, api => api.admin_users(query))
    }

    async fn admin_user(&self, id: &str) -> Result<User> {
        dispatch!(self, api => api.admin_user(id))
    }

    async fn admin_update_user(&self, id: &str, update: &AdminUserUpdate) -> Result<()> {
        dispatch!(self, api => api.admin_update_user(id, update))
    }

    async fn admin_ban_user(&self, id: &str, kind: BanKind) -> Result<()> {
        dispatch!(self, api => api.admin_ban_user(id, kind))
    }

    async fn admin_unban_user(&self, id: &str) -> Result<()> {
        dispatch!(self, api => api.admin_unban_user(id))
    }

    async fn admin_novel_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<NovelAnalyticsRow>> {
        dispatch!(self, api => api.admin_novel_analytics(query))
    }

    async fn admin_user_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<UserAnalyticsRow>> {
        dispatch!(self, api => api.admin_user_analytics(query))
    }
}
