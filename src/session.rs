//! Persisted authentication session.
//!
//! The store is the single source of truth for "is this client
//! authenticated, and as whom". It keeps two entries in a directory:
//! `token` (the raw bearer token) and `user.json` (the serialized profile).
//! Token and user are always written and cleared together; no completed
//! operation leaves exactly one of them present.
//!
//! Storage failures degrade to "unauthenticated" rather than erroring: the
//! application must always be able to render a logged-out state.

use crate::types::User;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

#[derive(Debug, Default)]
struct Cached {
    token: Option<String>,
    user: Option<User>,
}

/// Cloneable handle to the session store.
///
/// Reads are answered from an in-memory cache; mutations update the cache
/// and then the backing files. Disk write failures are logged and the
/// in-memory pair is kept, so within a process the token/user invariant
/// always holds.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    inner: Arc<RwLock<Cached>>,
}

impl SessionStore {
    /// Open a session store backed by `dir`, creating the directory if
    /// needed and loading any persisted session.
    ///
    /// A half-written pair on disk (exactly one entry present, or an
    /// unparsable `user.json`) is discarded entirely.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot create session directory; session will not persist");
        }

        let token = read_token(&dir);
        let user = read_user(&dir);

        let cached = match (token, user) {
            (Some(token), Some(user)) => Cached {
                token: Some(token),
                user: Some(user),
            },
            (None, None) => Cached::default(),
            _ => {
                // One half of a previous session survived; drop both.
                tracing::warn!(dir = %dir.display(), "Discarding partial session state");
                remove_entry(&dir, TOKEN_FILE);
                remove_entry(&dir, USER_FILE);
                Cached::default()
            }
        };

        Self {
            dir,
            inner: Arc::new(RwLock::new(cached)),
        }
    }

    /// Open the store in the default per-user data directory.
    pub fn open_default() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("novelshelf")
            .join("session");
        Self::open(dir)
    }

    /// Current bearer token, if a session exists.
    pub fn token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// Stored user profile, if a session exists.
    pub fn user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    /// True iff both token and user are present.
    pub fn is_authenticated(&self) -> bool {
        let inner = self.inner.read();
        inner.token.is_some() && inner.user.is_some()
    }

    /// Persist a new session pair. Both values become visible to readers
    /// together. Disk failures are logged, never propagated.
    pub fn save(&self, token: &str, user: &User) {
        {
            let mut inner = self.inner.write();
            inner.token = Some(token.to_string());
            inner.user = Some(user.clone());
        }

        if let Err(e) = std::fs::write(self.dir.join(TOKEN_FILE), token) {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        match serde_json::to_vec(user) {
            Ok(json) => {
                if let Err(e) = std::fs::write(self.dir.join(USER_FILE), json) {
                    tracing::warn!(error = %e, "Failed to persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session user"),
        }
    }

    /// Refresh the stored profile without touching the token. No-op when
    /// no session exists, so the pair invariant is preserved.
    pub fn update_user(&self, user: &User) {
        {
            let mut inner = self.inner.write();
            if inner.token.is_none() {
                return;
            }
            inner.user = Some(user.clone());
        }
        match serde_json::to_vec(user) {
            Ok(json) => {
                if let Err(e) = std::fs::write(self.dir.join(USER_FILE), json) {
                    tracing::warn!(error = %e, "Failed to persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session user"),
        }
    }

    /// Remove the session, both in memory and on disk. Idempotent.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.write();
            inner.token = None;
            inner.user = None;
        }
        remove_entry(&self.dir, TOKEN_FILE);
        remove_entry(&self.dir, USER_FILE);
    }
}

fn read_token(dir: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(dir.join(TOKEN_FILE)).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn read_user(dir: &Path) -> Option<User> {
    let raw = std::fs::read(dir.join(USER_FILE)).ok()?;
    // Corrupt stored data is treated as absent, never an error.
    serde_json::from_slice(&raw).ok()
}

fn remove_entry(dir: &Path, name: &str) {
    if let Err(e) = std::fs::remove_file(dir.join(name)) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(entry = name, error = %e, "Failed to remove session entry");
        }
    }
}
