//! Shared data model for the reading platform API.
//!
//! Entities here are opaque payloads from the client's point of view: the
//! server owns them, the client only moves them between the wire and the
//! caller. Wire names are camelCase, matching the platform API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role. Read-only from the client's perspective; drives route-level
/// authorization, never modified by profile edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular reader account.
    User,
    /// Administrator account.
    Admin,
}

/// Account status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account in good standing.
    Active,
    /// Temporarily banned.
    Banned,
    /// Permanently banned.
    PermanentBanned,
    /// Soft-deleted account.
    Deleted,
}

impl UserStatus {
    /// Wire spelling, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Banned => "banned",
            UserStatus::PermanentBanned => "permanent_banned",
            UserStatus::Deleted => "deleted",
        }
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: String,
    /// Username for login.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Display name shown in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Short self-description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Account status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Publication status of a novel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    /// Still being written.
    Ongoing,
    /// Finished.
    Completed,
}

/// Novel catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    /// Unique novel ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Category label.
    pub category: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Short introduction.
    pub intro: String,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Original source URL, if the novel is mirrored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Publication status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NovelStatus>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Total view count.
    pub views: u64,
    /// Favorite (bookshelf) count.
    pub favorites: u64,
    /// Average rating, 0.0 to 5.0.
    pub rating: f64,
    /// Total word count.
    pub word_count: u64,
    /// Whether the requesting user has this novel on their shelf.
    /// Only populated on the detail endpoint for authenticated requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_favorite: Option<bool>,
    /// The requesting user's own rating, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_rating: Option<u8>,
}

/// Chapter of a novel. `content` is only populated on the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter ID.
    pub id: u64,
    /// Owning novel ID.
    pub novel_id: u64,
    /// Chapter title.
    pub title: String,
    /// Chapter body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Word count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    /// Position within the novel, 1-based.
    pub order: u32,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Pagination wrapper. `items` is the only authoritative slice; `total`
/// may exceed `items.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
    /// Current page, 1-based.
    pub page: u32,
    /// Page size used for this result.
    pub page_size: u32,
}

/// Unified response envelope carried by every real API endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Payload; absent on failure and for some void operations.
    #[serde(default = "none_data")]
    pub data: Option<T>,
}

fn none_data<T>() -> Option<T> {
    None
}

/// Login request: account name or email plus password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Username or email.
    pub credential: String,
    /// Plain password; hashing is the server's concern.
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Profile of the authenticated user.
    pub user: User,
}

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Desired display name.
    pub display_name: String,
    /// Email address to verify.
    pub email: String,
    /// Email verification code.
    pub code: String,
    /// Password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub confirm_password: String,
}

/// Successful registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    /// ID of the created account.
    pub user_id: String,
}

/// Password reset request (forgotten password flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email.
    pub email: String,
    /// Reset code received by email.
    pub code: String,
    /// New password.
    pub password: String,
    /// Confirmation; must match `password`.
    pub confirm_password: String,
}

/// Partial profile update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Password change for a logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Current password.
    pub old_password: String,
    /// New password.
    pub new_password: String,
    /// Confirmation; must match `new_password`.
    pub confirm_password: String,
}

/// Sort order for catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Most favorited first.
    Hot,
    /// Most recently updated first.
    Latest,
    /// Highest rated first.
    Rating,
    /// Most viewed first.
    Views,
}

impl SortBy {
    /// Wire value for the `sort` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Hot => "hot",
            SortBy::Latest => "latest",
            SortBy::Rating => "rating",
            SortBy::Views => "views",
        }
    }
}

/// Catalog search parameters. All filters are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Free keyword matched against title, author and tags.
    pub keyword: Option<String>,
    /// Title substring filter.
    pub title: Option<String>,
    /// Author substring filter.
    pub author: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
    /// Tag substring filter.
    pub tag: Option<String>,
    /// Publication status filter.
    pub status: Option<NovelStatus>,
    /// Sort order; the server defaults to `hot`.
    pub sort: Option<SortBy>,
    /// Page number, 1-based.
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
}

/// Recommendation feed kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Tailored to the current user.
    Personalized,
    /// Most popular overall.
    Hot,
    /// Most recently updated.
    Latest,
    /// Recently added.
    New,
    /// Completed novels.
    Completed,
    /// Highest rated.
    Rating,
    /// Monthly ranking.
    Monthly,
    /// Reward ranking.
    Reward,
    /// Similar to a given novel; requires a novel ID.
    Related,
}

/// Recommendation request.
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    /// Which feed to fetch.
    pub kind: RecommendationKind,
    /// Anchor novel for [`RecommendationKind::Related`].
    pub novel_id: Option<String>,
    /// Maximum number of novels to return.
    pub limit: Option<u32>,
}

/// Optional page/page-size pair for paginated operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    /// Page number, 1-based. Implementations default to 1.
    pub page: Option<u32>,
    /// Page size. Implementations default to 10.
    pub page_size: Option<u32>,
}

/// Read-history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadHistory {
    /// History entry ID.
    pub id: String,
    /// The novel that was read.
    pub novel: Novel,
    /// When it was last opened.
    pub last_read_at: DateTime<Utc>,
    /// Title of the last chapter read.
    pub last_chapter: String,
    /// Reading progress, 0-100.
    pub progress: u8,
}

/// A single comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID.
    pub id: String,
    /// Author user ID.
    pub user_id: String,
    /// Author display name, denormalized for rendering.
    pub user_display_name: String,
    /// Author avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    /// Comment body.
    pub content: String,
    /// Parent comment ID for replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Whether the comment was removed by moderation.
    pub deleted: bool,
}

/// Top-level comment with its replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThread {
    /// The top-level comment.
    #[serde(flatten)]
    pub comment: Comment,
    /// Direct replies, oldest first.
    pub replies: Vec<Comment>,
}

/// A comment of the current user, with novel context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyComment {
    /// The comment itself.
    #[serde(flatten)]
    pub comment: Comment,
    /// Novel the comment was posted on.
    pub novel_id: String,
    /// Title of that novel.
    pub novel_title: String,
}

/// A rating given by the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRating {
    /// Rating ID.
    pub id: String,
    /// Rated novel ID.
    pub novel_id: String,
    /// Title of that novel.
    pub novel_title: String,
    /// Cover of that novel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Score, 1-5.
    pub score: u8,
    /// When the rating was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Payload returned after posting a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreated {
    /// ID of the created comment.
    pub comment_id: String,
}

/// Payload returned after creating a novel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelCreated {
    /// ID of the created novel.
    pub novel_id: String,
}

/// Admin novel listing filters.
#[derive(Debug, Clone, Default)]
pub struct AdminNovelQuery {
    /// Free keyword filter.
    pub keyword: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Author filter.
    pub author: Option<String>,
    /// Page selection.
    pub page: PageQuery,
}

/// Admin user listing filters.
#[derive(Debug, Clone, Default)]
pub struct AdminUserQuery {
    /// Free keyword filter (username, email).
    pub keyword: Option<String>,
    /// Status filter.
    pub status: Option<UserStatus>,
    /// Page selection.
    pub page: PageQuery,
}

/// Novel fields for admin create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDraft {
    /// Title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Category label.
    pub category: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Introduction text.
    pub intro: String,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Source URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Admin-side user update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// New bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Ban duration for admin user bans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanKind {
    /// Time-limited ban.
    Temporary,
    /// Permanent ban.
    Permanent,
}

/// Date range and page selection for analytics queries.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    /// Inclusive range start, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive range end, `YYYY-MM-DD`.
    pub to: Option<String>,
    /// Page selection.
    pub page: PageQuery,
}

/// Per-novel analytics row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelAnalyticsRow {
    /// Novel ID.
    pub novel_id: String,
    /// Novel title.
    pub title: String,
    /// View count in range.
    pub views: u64,
    /// Favorite count in range.
    pub favorites: u64,
    /// Number of ratings in range.
    pub rating_count: u64,
    /// Average score in range.
    pub avg_rating: f64,
}

/// Per-user analytics row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalyticsRow {
    /// User ID.
    pub user_id: String,
    /// Username.
    pub username: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Login count in range.
    pub logins: u64,
    /// Search count in range.
    pub searches: u64,
    /// Novel view count in range.
    pub novel_views: u64,
    /// Favorites added in range.
    pub favorites: u64,
    /// Ratings given in range.
    pub ratings: u64,
    /// Comments posted in range.
    pub comments: u64,
}
