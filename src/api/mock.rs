//! In-memory mock backend.
//!
//! Deterministic stand-in for the live platform, used for development
//! without a server. Every operation sleeps briefly so loading states show
//! up in consumers, validates inputs the way a real backend minimally
//! would, and keeps its mutable collections (bookshelf, read history) for
//! the lifetime of the process only. The validation here is advisory, not
//! a security boundary.

use super::ApiClient;
use crate::error::{ApiError, Result};
use crate::types::{
    AdminNovelQuery, AdminUserQuery, AdminUserUpdate, AnalyticsQuery, BanKind, Chapter, Comment,
    CommentCreated, CommentThread, Credentials, LoginSession, MyComment, MyRating, Novel,
    NovelAnalyticsRow, NovelCreated, NovelDraft, NovelStatus, Page, PageQuery, PasswordChange,
    ProfileUpdate, ReadHistory, RecommendationKind, RecommendationQuery, RegisterRequest,
    Registered, ResetPasswordRequest, SearchQuery, SortBy, User, UserAnalyticsRow, UserRole,
};
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::time::Duration;
use uuid::Uuid;

/// Verification code accepted by the mock reset flow.
const MOCK_RESET_CODE: &str = "123456";

/// Mock backend with fixture data and process-lifetime mutable state.
pub struct MockClient {
    novels: Vec<Novel>,
    comments: Vec<CommentThread>,
    shelf: RwLock<Vec<String>>,
    history: RwLock<Vec<ReadHistory>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    /// Build the mock with its seeded catalog, bookshelf and history.
    pub fn new() -> Self {
        let novels = fixture_novels();
        let history = fixture_history(&novels);

        Self {
            comments: fixture_comments(),
            novels,
            shelf: RwLock::new(vec!["1".into(), "3".into(), "6".into()]),
            history: RwLock::new(history),
        }
    }

    fn find_novel(&self, id: &str) -> Result<&Novel> {
        self.novels
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::Envelope("novel not found".to_string()))
    }
}

/// Artificial latency so consumers exercise their loading states.
async fn delay(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Slice `items` into the requested page. `total` is always the full
/// collection size, so it can exceed the returned slice length.
pub(crate) fn paginate<T: Clone>(items: &[T], page: PageQuery) -> Page<T> {
    let page_no = page.page.unwrap_or(1).max(1);
    let size = page.page_size.unwrap_or(10).max(1);
    let start = (page_no as usize - 1) * size as usize;

    Page {
        items: items.iter().skip(start).take(size as usize).cloned().collect(),
        total: items.len() as u64,
        page: page_no,
        page_size: size,
    }
}

fn require_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation(
            "please enter a valid email address".to_string(),
        ));
    }
    Ok(())
}

fn mock_user() -> User {
    User {
        id: "user-uuid".to_string(),
        username: "testreader".to_string(),
        role: UserRole::User,
        display_name: Some("Test Reader".to_string()),
        bio: Some("Just here for the cliffhangers.".to_string()),
        email: Some("user@test.com".to_string()),
        avatar_url: None,
        status: None,
    }
}

impl ApiClient for MockClient {
    async fn send_register_code(&self, email: &str) -> Result<()> {
        delay(300).await;
        require_email(email)?;
        tracing::debug!(email, "Mock registration code sent");
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginSession> {
        delay(500).await;

        if credentials.credential.is_empty() || credentials.password.is_empty() {
            return Err(ApiError::Validation(
                "account and password must not be empty".to_string(),
            ));
        }

        let token = format!("mock-token-{}", Uuid::new_v4());

        // Fixture admin account.
        if (credentials.credential == "admin" || credentials.credential == "admin@test.com")
            && credentials.password == "admin123"
        {
            return Ok(LoginSession {
                token,
                user: User {
                    id: "admin-uuid".to_string(),
                    username: "admin".to_string(),
                    role: UserRole::Admin,
                    display_name: Some("Administrator".to_string()),
                    bio: None,
                    email: Some("admin@test.com".to_string()),
                    avatar_url: None,
                    status: None,
                },
            });
        }

        // Fixture test users: any account with one of the test passwords.
        if credentials.password == "123456" || credentials.password == "test" {
            return Ok(LoginSession {
                token,
                user: mock_user(),
            });
        }

        Err(ApiError::Envelope(
            "incorrect account or password".to_string(),
        ))
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Registered> {
        delay(400).await;
        if req.email.is_empty()
            || req.password.is_empty()
            || req.username.is_empty()
            || req.display_name.is_empty()
            || req.code.is_empty()
        {
            return Err(ApiError::Validation(
                "please fill in all registration fields".to_string(),
            ));
        }
        require_email(&req.email)?;
        if req.password != req.confirm_password {
            return Err(ApiError::Validation("passwords do not match".to_string()));
        }
        // Email uniqueness is the backend's job; the mock just accepts.
        Ok(Registered {
            user_id: format!("u-{}", Uuid::new_v4()),
        })
    }

    async fn logout(&self) -> Result<()> {
        delay(150).await;
        Ok(())
    }

    async fn send_reset_code(&self, email: &str) -> Result<()> {
        delay(300).await;
        require_email(email)?;
        tracing::debug!(email, "Mock reset code sent");
        Ok(())
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<()> {
        delay(400).await;
        if req.password != req.confirm_password {
            return Err(ApiError::Validation("passwords do not match".to_string()));
        }
        if req.code != MOCK_RESET_CODE {
            return Err(ApiError::Validation(
                "incorrect verification code".to_string(),
            ));
        }
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        delay(300).await;
        let mut user = mock_user();
        if let Some(ref name) = update.display_name {
            user.display_name = Some(name.clone());
        }
        if let Some(ref bio) = update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(ref avatar) = update.avatar_url {
            user.avatar_url = Some(avatar.clone());
        }
        Ok(user)
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        delay(300).await;
        if change.new_password != change.confirm_password {
            return Err(ApiError::Validation("passwords do not match".to_string()));
        }
        Ok(())
    }

    async fn me(&self) -> Result<User> {
        delay(200).await;
        Ok(mock_user())
    }

    async fn my_comments(&self, page: PageQuery) -> Result<Page<MyComment>> {
        delay(200).await;
        Ok(paginate(&[], page))
    }

    async fn my_ratings(&self, page: PageQuery) -> Result<Page<MyRating>> {
        delay(200).await;
        Ok(paginate(&[], page))
    }

    async fn search_novels(&self, query: &SearchQuery) -> Result<Page<Novel>> {
        delay(300).await;

        let kw = query.keyword.as_deref().unwrap_or("").to_lowercase();
        let title = query.title.as_deref().unwrap_or("").to_lowercase();
        let author = query.author.as_deref().unwrap_or("").to_lowercase();
        let tag = query.tag.as_deref().unwrap_or("").to_lowercase();

        let mut filtered: Vec<Novel> = self
            .novels
            .iter()
            .filter(|n| {
                let matches_keyword = kw.is_empty()
                    || n.title.to_lowercase().contains(&kw)
                    || n.author.to_lowercase().contains(&kw)
                    || n.tags.iter().any(|t| t.to_lowercase().contains(&kw));
                let matches_title = title.is_empty() || n.title.to_lowercase().contains(&title);
                let matches_author = author.is_empty() || n.author.to_lowercase().contains(&author);
                let matches_tag =
                    tag.is_empty() || n.tags.iter().any(|t| t.to_lowercase().contains(&tag));
                let matches_category = query
                    .category
                    .as_deref()
                    .is_none_or(|c| n.category == c);
                let matches_status = query.status.is_none_or(|s| n.status == Some(s));

                matches_keyword
                    && matches_title
                    && matches_author
                    && matches_tag
                    && matches_category
                    && matches_status
            })
            .cloned()
            .collect();

        match query.sort.unwrap_or(SortBy::Hot) {
            SortBy::Latest => filtered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            SortBy::Rating => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortBy::Views => filtered.sort_by(|a, b| b.views.cmp(&a.views)),
            SortBy::Hot => filtered.sort_by(|a, b| b.favorites.cmp(&a.favorites)),
        }

        Ok(paginate(
            &filtered,
            PageQuery {
                page: query.page,
                page_size: query.page_size,
            },
        ))
    }

    async fn novel(&self, id: &str) -> Result<Novel> {
        delay(200).await;
        let mut novel = self.find_novel(id)?.clone();
        novel.my_favorite = Some(self.shelf.read().iter().any(|s| s == id));
        Ok(novel)
    }

    async fn chapters(&self, novel_id: &str) -> Result<Vec<Chapter>> {
        delay(300).await;
        self.find_novel(novel_id)?;
        let numeric_id = novel_id.parse().unwrap_or(0);
        Ok((1..=50)
            .map(|i| Chapter {
                id: i,
                novel_id: numeric_id,
                title: format!("Chapter {i}"),
                content: None,
                word_count: Some(2200 + (i % 7) * 150),
                order: i as u32,
                updated_at: Utc::now(),
            })
            .collect())
    }

    async fn chapter(&self, novel_id: &str, chapter_id: &str) -> Result<Chapter> {
        delay(300).await;
        self.find_novel(novel_id)?;
        let id = chapter_id
            .parse()
            .map_err(|_| ApiError::Validation("invalid chapter id".to_string()))?;
        Ok(Chapter {
            id,
            novel_id: novel_id.parse().unwrap_or(0),
            title: format!("Chapter {id}"),
            content: Some(fixture_chapter_text()),
            word_count: Some(3000),
            order: id as u32,
            updated_at: Utc::now(),
        })
    }

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<Vec<Novel>> {
        delay(350).await;
        let limit = query.limit.unwrap_or(6) as usize;

        let mut picks: Vec<Novel> = self.novels.clone();
        match query.kind {
            RecommendationKind::Hot | RecommendationKind::Monthly | RecommendationKind::Reward => {
                picks.sort_by(|a, b| b.views.cmp(&a.views));
            }
            RecommendationKind::Latest | RecommendationKind::New => {
                picks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            }
            RecommendationKind::Completed => {
                picks.retain(|n| n.status == Some(NovelStatus::Completed));
                picks.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            }
            RecommendationKind::Rating => {
                picks.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            }
            RecommendationKind::Related | RecommendationKind::Personalized => {
                picks.shuffle(&mut rand::rng());
            }
        }

        picks.truncate(limit);
        Ok(picks)
    }

    async fn bookshelf(&self, page: PageQuery) -> Result<Vec<Novel>> {
        delay(300).await;
        let shelf = self.shelf.read().clone();
        let all: Vec<Novel> = self
            .novels
            .iter()
            .filter(|n| shelf.contains(&n.id))
            .cloned()
            .collect();
        Ok(paginate(&all, page).items)
    }

    async fn add_to_bookshelf(&self, novel_id: &str) -> Result<()> {
        delay(200).await;
        self.find_novel(novel_id)?;
        let mut shelf = self.shelf.write();
        if !shelf.iter().any(|id| id == novel_id) {
            shelf.push(novel_id.to_string());
        }
        Ok(())
    }

    async fn remove_from_bookshelf(&self, novel_id: &str) -> Result<()> {
        delay(200).await;
        self.shelf.write().retain(|id| id != novel_id);
        Ok(())
    }

    async fn read_history(&self) -> Result<Vec<ReadHistory>> {
        delay(300).await;
        Ok(self.history.read().clone())
    }

    async fn record_read(&self, novel_id: &str) -> Result<()> {
        delay(200).await;
        let Some(novel) = self.novels.iter().find(|n| n.id == novel_id) else {
            return Ok(());
        };

        let mut history = self.history.write();
        if let Some(entry) = history.iter_mut().find(|h| h.novel.id == novel_id) {
            entry.last_read_at = Utc::now();
            return Ok(());
        }
        history.insert(
            0,
            ReadHistory {
                id: format!("h-{}", Uuid::new_v4()),
                novel: novel.clone(),
                last_read_at: Utc::now(),
                last_chapter: "Chapter 1".to_string(),
                progress: 0,
            },
        );
        Ok(())
    }

    async fn remove_read_history(&self, history_id: &str) -> Result<()> {
        delay(200).await;
        self.history.write().retain(|h| h.id != history_id);
        Ok(())
    }

    async fn clear_read_history(&self) -> Result<()> {
        delay(200).await;
        self.history.write().clear();
        Ok(())
    }

    async fn comments(&self, novel_id: &str, page: PageQuery) -> Result<Page<CommentThread>> {
        delay(300).await;
        if novel_id == "1" {
            Ok(paginate(&self.comments, page))
        } else {
            Ok(paginate(&[], page))
        }
    }

    async fn post_comment(
        &self,
        _novel_id: &str,
        content: &str,
        _parent_id: Option<&str>,
    ) -> Result<CommentCreated> {
        delay(300).await;
        if content.trim().is_empty() {
            return Err(ApiError::Validation(
                "comment must not be empty".to_string(),
            ));
        }
        Ok(CommentCreated {
            comment_id: format!("c-{}", Uuid::new_v4()),
        })
    }

    async fn delete_comment(&self, _comment_id: &str) -> Result<()> {
        delay(200).await;
        Ok(())
    }

    async fn rate_novel(&self, novel_id: &str, score: u8) -> Result<()> {
        delay(200).await;
        self.find_novel(novel_id)?;
        if !(1..=5).contains(&score) {
            return Err(ApiError::Validation(
                "score must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }

    async fn admin_novels(&self, query: &AdminNovelQuery) -> Result<Page<Novel>> {
        delay(250).await;
        Ok(paginate(&self.novels, query.page))
    }

    async fn admin_create_novel(&self, draft: &NovelDraft) -> Result<NovelCreated> {
        delay(250).await;
        if draft.title.is_empty() || draft.author.is_empty() {
            return Err(ApiError::Validation(
                "title and author are required".to_string(),
            ));
        }
        Ok(NovelCreated {
            novel_id: format!("n-{}", Uuid::new_v4()),
        })
    }

    async fn admin_novel(&self, id: &str) -> Result<Novel> {
        delay(250).await;
        Ok(self.find_novel(id)?.clone())
    }

    async fn admin_update_novel(&self, id: &str, _draft: &NovelDraft) -> Result<()> {
        delay(250).await;
        self.find_novel(id)?;
        Ok(())
    }

    async fn admin_delete_novel(&self, id: &str) -> Result<()> {
        delay(250).await;
        self.find_novel(id)?;
        Ok(())
    }

    async fn admin_set_novel_status(&self, id: &str, _status: NovelStatus) -> Result<()> {
        delay(250).await;
        self.find_novel(id)?;
        Ok(())
    }

    async fn admin_users(&self, query: &AdminUserQuery) -> Result<Page<User>> {
        delay(250).await;
        Ok(paginate(&[mock_user()], query.page))
    }

    async fn admin_user(&self, _id: &str) -> Result<User> {
        delay(250).await;
        Ok(mock_user())
    }

    async fn admin_update_user(&self, _id: &str, _update: &AdminUserUpdate) -> Result<()> {
        delay(250).await;
        Ok(())
    }

    async fn admin_ban_user(&self, _id: &str, _kind: BanKind) -> Result<()> {
        delay(250).await;
        Ok(())
    }

    async fn admin_unban_user(&self, _id: &str) -> Result<()> {
        delay(250).await;
        Ok(())
    }

    async fn admin_novel_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<NovelAnalyticsRow>> {
        delay(250).await;
        let rows: Vec<NovelAnalyticsRow> = self
            .novels
            .iter()
            .map(|n| NovelAnalyticsRow {
                novel_id: n.id.clone(),
                title: n.title.clone(),
                views: n.views,
                favorites: n.favorites,
                rating_count: n.favorites / 100,
                avg_rating: n.rating,
            })
            .collect();
        Ok(paginate(&rows, query.page))
    }

    async fn admin_user_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<UserAnalyticsRow>> {
        delay(250).await;
        Ok(paginate(&[], query.page))
    }
}

fn fixture_novels() -> Vec<Novel> {
    let now = Utc::now();
    let novel = |id: &str,
                 title: &str,
                 author: &str,
                 category: &str,
                 tags: &[&str],
                 intro: &str,
                 status: NovelStatus,
                 hours_ago: i64,
                 views: u64,
                 favorites: u64,
                 rating: f64,
                 word_count: u64| Novel {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        intro: intro.to_string(),
        cover_url: Some(format!("https://placehold.co/120x160?text={id}")),
        source_url: Some(format!("https://example.com/novels/{id}")),
        status: Some(status),
        updated_at: now - ChronoDuration::hours(hours_ago),
        views,
        favorites,
        rating,
        word_count,
        my_favorite: None,
        my_rating: None,
    };

    vec![
        novel(
            "1",
            "The Ember Throne",
            "R. Calloway",
            "Fantasy",
            &["epic", "war", "dragons"],
            "A dying empire, a stolen crown, and the last ember of an old fire.",
            NovelStatus::Completed,
            120,
            5_000_000,
            320_000,
            4.8,
            5_320_000,
        ),
        novel(
            "2",
            "A Perfect Horizon",
            "Iris Vane",
            "Fantasy",
            &["primordial", "growth", "adventure"],
            "One grain of dust can fill a sea; one blade of grass can fell the sun.",
            NovelStatus::Completed,
            72,
            4_200_000,
            280_000,
            4.7,
            6_580_000,
        ),
        novel(
            "3",
            "Coffin of Stars",
            "Iris Vane",
            "Fantasy",
            &["immortals", "mystery"],
            "Nine dragon corpses haul a bronze coffin across the cold dark between stars.",
            NovelStatus::Completed,
            168,
            3_800_000,
            250_000,
            4.9,
            6_320_000,
        ),
        novel(
            "4",
            "A Commoner's Road to Heaven",
            "J. Mercer",
            "Cultivation",
            &["immortals", "underdog"],
            "An ordinary village boy stumbles into a minor sect as an unregistered disciple.",
            NovelStatus::Completed,
            240,
            4_500_000,
            310_000,
            4.8,
            7_710_000,
        ),
        novel(
            "5",
            "The Night Warden",
            "E. Quill",
            "History",
            &["investigation", "court", "intrigue"],
            "Five orders keep the capital's peace; the newest warden keeps its secrets.",
            NovelStatus::Ongoing,
            12,
            3_200_000,
            220_000,
            4.6,
            3_820_000,
        ),
        novel(
            "6",
            "Lord of Hidden Names",
            "T. Alder",
            "Occult",
            &["eldritch", "steampunk", "sequence"],
            "In the tide of steam and machinery, who can touch the extraordinary?",
            NovelStatus::Completed,
            36,
            4_800_000,
            350_000,
            4.9,
            4_460_000,
        ),
        novel(
            "7",
            "One Thought, Eternal",
            "K. Whitlock",
            "Cultivation",
            &["immortals", "comedy"],
            "A single thought births an ocean; a single thought fells ten thousand immortals.",
            NovelStatus::Completed,
            96,
            3_600_000,
            240_000,
            4.7,
            3_690_000,
        ),
        novel(
            "8",
            "Mage of the Morning City",
            "D. Frost",
            "Urban",
            &["city", "magic", "academy"],
            "He wakes to a changed world where high school teaches spellwork.",
            NovelStatus::Ongoing,
            4,
            2_800_000,
            180_000,
            4.5,
            5_540_000,
        ),
    ]
}

fn fixture_history(novels: &[Novel]) -> Vec<ReadHistory> {
    let now = Utc::now();
    let entry = |id: &str, novel: &Novel, hours_ago: i64, chapter: &str, progress: u8| ReadHistory {
        id: id.to_string(),
        novel: novel.clone(),
        last_read_at: now - ChronoDuration::hours(hours_ago),
        last_chapter: chapter.to_string(),
        progress,
    };

    vec![
        entry("1", &novels[0], 1, "Chapter 1523: The Last Ember", 100),
        entry("2", &novels[2], 24, "Chapter 892: The Sovereign of Ruin", 65),
        entry("3", &novels[5], 48, "Chapter 1432: Sequence Zero", 98),
    ]
}

fn fixture_comments() -> Vec<CommentThread> {
    let now = Utc::now();
    (1..=25)
        .map(|i| CommentThread {
            comment: Comment {
                id: format!("c-{i}"),
                user_id: format!("u-{}", (i % 5) + 1),
                user_display_name: format!("reader{}", (i % 5) + 1),
                user_avatar: None,
                content: format!("Chapter {i} was a great read, can't wait for the next one."),
                parent_id: None,
                created_at: now - ChronoDuration::minutes(i),
                deleted: false,
            },
            replies: Vec::new(),
        })
        .collect()
}

fn fixture_chapter_text() -> String {
    "\
The frost came down off the ridgeline an hour before dawn, and with it the \
smell of old iron.

Wren pressed her back against the watchtower wall and counted her breaths \
until the spirit-light in her palm steadied. Third gate of the breathing \
art. It was stronger than it had been a week ago; she could feel the warmth \
run the length of her arm instead of dying at the wrist.

\"So this is the third gate,\" she murmured, closing her fist around the \
light. \"No wonder the sect guards the manual.\"

Below her, the bronze bell of the outer court rang once, thin and urgent \
in the cold air. Someone had crossed the boundary stones in the dark.

(Fixture chapter text; a live backend returns the full chapter here.)"
        .to_string()
}
