//! HTTP request pipeline shared by all real-API calls.
//!
//! One configured [`reqwest::Client`] with two cross-cutting behaviors:
//! outbound requests pick up the current bearer token from the session
//! store, and unauthorized responses clear the session and send the
//! application to the login entry point. Envelope unwrapping stays in the
//! API implementation; the pipeline only normalizes errors.

use crate::error::{ApiError, Result};
use crate::session::SessionStore;
use crate::types::ApiEnvelope;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Application path of the login entry point.
pub const LOGIN_PATH: &str = "/login";

/// Seam for the unauthorized-response redirect.
///
/// The pipeline calls [`Navigator::goto`] with [`LOGIN_PATH`] once per
/// unauthorized response. Navigating to an already-current location must be
/// a no-op, so concurrent 401s need no deduplication.
pub trait Navigator: Send + Sync {
    /// Send the application to `path`.
    fn goto(&self, path: &str);
}

/// Default navigator: logs the redirect target.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn goto(&self, path: &str) {
        tracing::info!(path, "Session invalidated, redirecting");
    }
}

/// Configured request pipeline.
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl Transport {
    /// Build the pipeline. The timeout bounds every request end to end so a
    /// hung call cannot wedge the caller indefinitely.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    /// GET with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    /// POST with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::POST, path)).await
    }

    /// PUT with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    /// PATCH with a JSON body.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::PATCH, path).json(body)).await
    }

    /// DELETE without a body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    /// Start a request, attaching the bearer token if a session exists.
    /// The token is re-read on every call; the session can change between
    /// requests.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = req.send().await.map_err(request_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Global reaction, exactly once per unauthorized response.
            self.session.clear();
            self.navigator.goto(LOGIN_PATH);
            let message = envelope_message(response)
                .await
                .unwrap_or_else(|| "session expired, please log in again".to_string());
            return Err(ApiError::Unauthorized(message));
        }

        if !status.is_success() {
            let message = envelope_message(response)
                .await
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ApiError::Transport(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(format!("invalid response body: {e}")))
    }
}

fn request_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// Extract a non-empty server-provided message from an error body, if the
/// body parses as the standard envelope.
async fn envelope_message(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body).ok()?;
    let message = envelope.message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
