//! Live HTTP backend.
//!
//! Maps each contract operation 1:1 onto an endpoint through
//! [`Transport`] and unwraps the response envelope. No business logic
//! lives here; the endpoint, method and parameter placement are the whole
//! implementation.

use super::ApiClient;
use crate::error::{ApiError, Result};
use crate::transport::Transport;
use crate::types::{
    AdminNovelQuery, AdminUserQuery, AdminUserUpdate, AnalyticsQuery, ApiEnvelope, BanKind,
    Chapter, CommentCreated, CommentThread, Credentials, LoginSession, MyComment, MyRating, Novel,
    NovelAnalyticsRow, NovelCreated, NovelDraft, NovelStatus, Page, PageQuery, PasswordChange,
    ProfileUpdate, ReadHistory, RecommendationKind, RecommendationQuery, RegisterRequest,
    Registered, ResetPasswordRequest, SearchQuery, SortBy, User, UserAnalyticsRow,
};
use serde_json::{Value, json};

/// Envelope for operations whose payload the client discards.
type Ack = ApiEnvelope<Value>;

/// Live backend over the shared transport.
pub struct HttpApi {
    transport: Transport,
}

impl HttpApi {
    /// Wrap a configured transport.
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

/// Apply the envelope rule: failure or an absent payload never reaches the
/// caller as a resolved value.
fn unwrap<T>(envelope: ApiEnvelope<T>) -> Result<T> {
    if !envelope.success {
        return Err(ApiError::Envelope(message_or(
            envelope.message,
            "request failed",
        )));
    }
    match envelope.data {
        Some(data) => Ok(data),
        None => Err(ApiError::Envelope(message_or(
            envelope.message,
            "empty response body",
        ))),
    }
}

fn message_or(message: String, fallback: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn page_params(page: PageQuery) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.page.unwrap_or(1).to_string()),
        ("pageSize", page.page_size.unwrap_or(10).to_string()),
    ]
}

impl ApiClient for HttpApi {
    async fn send_register_code(&self, email: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .post(
                "/auth/email-code",
                &json!({ "email": email, "purpose": "register" }),
            )
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginSession> {
        let env: ApiEnvelope<LoginSession> =
            self.transport.post("/auth/login", credentials).await?;
        unwrap(env)
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Registered> {
        let env: ApiEnvelope<Registered> = self.transport.post("/auth/register", req).await?;
        unwrap(env)
    }

    async fn logout(&self) -> Result<()> {
        let env: Ack = self.transport.post_empty("/auth/logout").await?;
        unwrap(env)?;
        Ok(())
    }

    async fn send_reset_code(&self, email: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .post("/auth/reset-code", &json!({ "email": email }))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<()> {
        let env: Ack = self.transport.post("/auth/reset-password", req).await?;
        unwrap(env)?;
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let env: ApiEnvelope<User> = self.transport.put("/users/me", update).await?;
        unwrap(env)
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        let env: Ack = self.transport.put("/users/me/password", change).await?;
        unwrap(env)?;
        Ok(())
    }

    async fn me(&self) -> Result<User> {
        let env: ApiEnvelope<User> = self.transport.get("/users/me", &[]).await?;
        unwrap(env)
    }

    async fn my_comments(&self, page: PageQuery) -> Result<Page<MyComment>> {
        let env: ApiEnvelope<Page<MyComment>> = self
            .transport
            .get("/users/me/comments", &page_params(page))
            .await?;
        unwrap(env)
    }

    async fn my_ratings(&self, page: PageQuery) -> Result<Page<MyRating>> {
        let env: ApiEnvelope<Page<MyRating>> = self
            .transport
            .get("/users/me/ratings", &page_params(page))
            .await?;
        unwrap(env)
    }

    async fn search_novels(&self, query: &SearchQuery) -> Result<Page<Novel>> {
        let mut params = Vec::new();
        if let Some(ref kw) = query.keyword {
            params.push(("q", kw.clone()));
        }
        if let Some(ref title) = query.title {
            params.push(("title", title.clone()));
        }
        if let Some(ref author) = query.author {
            params.push(("author", author.clone()));
        }
        if let Some(ref category) = query.category {
            params.push(("category", category.clone()));
        }
        if let Some(ref tag) = query.tag {
            params.push(("tag", tag.clone()));
        }
        params.push(("page", query.page.unwrap_or(1).to_string()));
        params.push(("pageSize", query.page_size.unwrap_or(10).to_string()));
        params.push((
            "sort",
            query.sort.unwrap_or(SortBy::Hot).as_str().to_string(),
        ));

        let env: ApiEnvelope<Page<Novel>> =
            self.transport.get("/novels/search", &params).await?;
        unwrap(env)
    }

    async fn novel(&self, id: &str) -> Result<Novel> {
        let env: ApiEnvelope<Novel> = self.transport.get(&format!("/novels/{id}"), &[]).await?;
        unwrap(env)
    }

    async fn chapters(&self, novel_id: &str) -> Result<Vec<Chapter>> {
        let env: ApiEnvelope<Vec<Chapter>> = self
            .transport
            .get(&format!("/novels/{novel_id}/chapters"), &[])
            .await?;
        unwrap(env)
    }

    async fn chapter(&self, novel_id: &str, chapter_id: &str) -> Result<Chapter> {
        let env: ApiEnvelope<Chapter> = self
            .transport
            .get(&format!("/novels/{novel_id}/chapters/{chapter_id}"), &[])
            .await?;
        unwrap(env)
    }

    async fn recommendations(&self, query: &RecommendationQuery) -> Result<Vec<Novel>> {
        let path = match query.kind {
            RecommendationKind::Personalized => "/recommendations/personalized".to_string(),
            RecommendationKind::Hot => "/recommendations/hot".to_string(),
            RecommendationKind::Latest => "/recommendations/latest".to_string(),
            RecommendationKind::Related => {
                let id = query.novel_id.as_deref().ok_or_else(|| {
                    ApiError::Validation(
                        "related recommendations require a novel id".to_string(),
                    )
                })?;
                format!("/recommendations/similar/{id}")
            }
            // Kinds without a dedicated endpoint fall back to the latest feed.
            _ => "/recommendations/latest".to_string(),
        };

        let mut params = Vec::new();
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let env: ApiEnvelope<Vec<Novel>> = self.transport.get(&path, &params).await?;
        unwrap(env)
    }

    async fn bookshelf(&self, page: PageQuery) -> Result<Vec<Novel>> {
        let env: ApiEnvelope<Page<Novel>> = self
            .transport
            .get("/users/me/favorites", &page_params(page))
            .await?;
        Ok(unwrap(env)?.items)
    }

    async fn add_to_bookshelf(&self, novel_id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .post_empty(&format!("/novels/{novel_id}/favorite"))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn remove_from_bookshelf(&self, novel_id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .delete(&format!("/novels/{novel_id}/favorite"))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn read_history(&self) -> Result<Vec<ReadHistory>> {
        let env: ApiEnvelope<Vec<ReadHistory>> = self.transport.get("/history", &[]).await?;
        unwrap(env)
    }

    async fn record_read(&self, novel_id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .post("/history", &json!({ "novelId": novel_id }))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn remove_read_history(&self, history_id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .delete(&format!("/history/{history_id}"))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn clear_read_history(&self) -> Result<()> {
        let env: Ack = self.transport.delete("/history").await?;
        unwrap(env)?;
        Ok(())
    }

    async fn comments(&self, novel_id: &str, page: PageQuery) -> Result<Page<CommentThread>> {
        let env: ApiEnvelope<Page<CommentThread>> = self
            .transport
            .get(&format!("/novels/{novel_id}/comments"), &page_params(page))
            .await?;
        unwrap(env)
    }

    async fn post_comment(
        &self,
        novel_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<CommentCreated> {
        let mut body = json!({ "content": content });
        if let Some(parent) = parent_id {
            body["parentId"] = Value::String(parent.to_string());
        }
        let env: ApiEnvelope<CommentCreated> = self
            .transport
            .post(&format!("/novels/{novel_id}/comments"), &body)
            .await?;
        unwrap(env)
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .delete(&format!("/comments/{comment_id}"))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn rate_novel(&self, novel_id: &str, score: u8) -> Result<()> {
        let env: Ack = self
            .transport
            .put(&format!("/novels/{novel_id}/rating"), &json!({ "score": score }))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_novels(&self, query: &AdminNovelQuery) -> Result<Page<Novel>> {
        let mut params = page_params(query.page);
        if let Some(ref kw) = query.keyword {
            params.push(("q", kw.clone()));
        }
        if let Some(ref category) = query.category {
            params.push(("category", category.clone()));
        }
        if let Some(ref author) = query.author {
            params.push(("author", author.clone()));
        }
        let env: ApiEnvelope<Page<Novel>> = self.transport.get("/admin/novels", &params).await?;
        unwrap(env)
    }

    async fn admin_create_novel(&self, draft: &NovelDraft) -> Result<NovelCreated> {
        let env: ApiEnvelope<NovelCreated> = self.transport.post("/admin/novels", draft).await?;
        unwrap(env)
    }

    async fn admin_novel(&self, id: &str) -> Result<Novel> {
        let env: ApiEnvelope<Novel> = self
            .transport
            .get(&format!("/admin/novels/{id}"), &[])
            .await?;
        unwrap(env)
    }

    async fn admin_update_novel(&self, id: &str, draft: &NovelDraft) -> Result<()> {
        let env: Ack = self
            .transport
            .put(&format!("/admin/novels/{id}"), draft)
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_delete_novel(&self, id: &str) -> Result<()> {
        let env: Ack = self.transport.delete(&format!("/admin/novels/{id}")).await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_set_novel_status(&self, id: &str, status: NovelStatus) -> Result<()> {
        let env: Ack = self
            .transport
            .patch(
                &format!("/admin/novels/{id}/status"),
                &json!({ "status": status }),
            )
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_users(&self, query: &AdminUserQuery) -> Result<Page<User>> {
        let mut params = page_params(query.page);
        if let Some(ref kw) = query.keyword {
            params.push(("q", kw.clone()));
        }
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        let env: ApiEnvelope<Page<User>> = self.transport.get("/admin/users", &params).await?;
        unwrap(env)
    }

    async fn admin_user(&self, id: &str) -> Result<User> {
        let env: ApiEnvelope<User> = self
            .transport
            .get(&format!("/admin/users/{id}"), &[])
            .await?;
        unwrap(env)
    }

    async fn admin_update_user(&self, id: &str, update: &AdminUserUpdate) -> Result<()> {
        let env: Ack = self
            .transport
            .put(&format!("/admin/users/{id}"), update)
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_ban_user(&self, id: &str, kind: BanKind) -> Result<()> {
        let env: Ack = self
            .transport
            .post(&format!("/admin/users/{id}/ban"), &json!({ "type": kind }))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_unban_user(&self, id: &str) -> Result<()> {
        let env: Ack = self
            .transport
            .post_empty(&format!("/admin/users/{id}/unban"))
            .await?;
        unwrap(env)?;
        Ok(())
    }

    async fn admin_novel_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<NovelAnalyticsRow>> {
        let env: ApiEnvelope<Page<NovelAnalyticsRow>> = self
            .transport
            .get("/admin/analytics/novels", &analytics_params(query))
            .await?;
        unwrap(env)
    }

    async fn admin_user_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<Page<UserAnalyticsRow>> {
        let env: ApiEnvelope<Page<UserAnalyticsRow>> = self
            .transport
            .get("/admin/analytics/users", &analytics_params(query))
            .await?;
        unwrap(env)
    }
}

fn analytics_params(query: &AnalyticsQuery) -> Vec<(&'static str, String)> {
    let mut params = page_params(query.page);
    if let Some(ref from) = query.from {
        params.push(("from", from.clone()));
    }
    if let Some(ref to) = query.to {
        params.push(("to", to.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(success: bool, message: &str, data: Option<i32>) -> ApiEnvelope<i32> {
        ApiEnvelope {
            success,
            message: message.to_string(),
            data,
        }
    }

    #[test]
    fn unwrap_returns_payload_on_success() {
        assert_eq!(unwrap(envelope(true, "OK", Some(7))).unwrap(), 7);
    }

    #[test]
    fn unwrap_fails_with_server_message() {
        let err = unwrap(envelope(false, "novel not found", None)).unwrap_err();
        assert_eq!(err.to_string(), "novel not found");
        assert!(matches!(err, ApiError::Envelope(_)));
    }

    #[test]
    fn unwrap_rejects_success_without_data() {
        let err = unwrap(envelope(true, "", None)).unwrap_err();
        assert_eq!(err.to_string(), "empty response body");
    }

    #[test]
    fn unwrap_uses_fallback_for_blank_message() {
        let err = unwrap(envelope(false, "   ", None)).unwrap_err();
        assert_eq!(err.to_string(), "request failed");
    }
}
