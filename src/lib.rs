//! novelshelf: a command-line reading client for a web novel platform.
//!
//! This crate talks to a novel platform backend over its JSON envelope
//! protocol and provides a full client: authentication with a persisted
//! session, catalog search, chapter reading with history, bookshelf,
//! comments, ratings and admin operations.
//!
//! # Features
//!
//! - Persistent session (token + profile) surviving restarts
//! - Automatic bearer injection and forced logout on 401
//! - Interchangeable backends: live HTTP or bundled mock fixtures
//! - Catalog search with filters and sort orders
//! - Recommendation feeds
//! - Bookshelf, read history, comments and ratings
//! - Admin novel/user management and analytics

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Backend contract and its mock and HTTP implementations.
pub mod api;
/// Configuration and CLI.
pub mod config;
/// Error types.
pub mod error;
/// Persisted session state.
pub mod session;
/// HTTP plumbing: bearer injection, envelope errors, 401 handling.
pub mod transport;
/// Wire types shared by both backends.
pub mod types;

#[cfg(test)]
mod tests;

pub use api::{AnyApi, ApiClient};
pub use config::{ApiMode, Cli, Command, Config};
pub use error::{ApiError, Result};
pub use session::SessionStore;
