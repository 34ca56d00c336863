use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line reading client for a web novel platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "novelshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "NOVELSHELF_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend mode override (mock or real).
    #[arg(short, long, env = "NOVELSHELF_API_MODE", global = true)]
    pub mode: Option<ApiMode>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a default config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },

    /// Log in and store the session.
    Login {
        /// Username or email.
        credential: String,
        /// Password (will prompt if not provided).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and clear the stored session.
    Logout,

    /// Show the current user profile.
    Me,

    /// Search the catalog.
    Search {
        /// Free keyword matched against title, author and tags.
        query: Option<String>,
        /// Title filter.
        #[arg(long)]
        title: Option<String>,
        /// Author filter.
        #[arg(long)]
        author: Option<String>,
        /// Category filter.
        #[arg(long)]
        category: Option<String>,
        /// Tag filter.
        #[arg(long)]
        tag: Option<String>,
        /// Sort order (hot, latest, rating, views).
        #[arg(short, long, default_value = "hot")]
        sort: String,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Items per page.
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Show a novel's details.
    Show {
        /// Novel ID.
        id: String,
    },

    /// Read a chapter (records read history).
    Read {
        /// Novel ID.
        novel: String,
        /// Chapter ID.
        chapter: String,
    },

    /// Fetch a recommendation feed.
    Recommend {
        /// Feed kind (personalized, hot, latest, new, completed, rating,
        /// monthly, reward, related).
        #[arg(default_value = "hot")]
        kind: String,
        /// Anchor novel ID (required for "related").
        #[arg(short, long)]
        novel: Option<String>,
        /// Maximum number of novels.
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Bookshelf (favorites) commands.
    Shelf {
        /// Bookshelf subcommand action.
        #[command(subcommand)]
        action: ShelfCommand,
    },

    /// Read-history commands.
    History {
        /// History subcommand action.
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// List comments on a novel.
    Comments {
        /// Novel ID.
        novel: String,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Items per page.
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Post a comment on a novel.
    Comment {
        /// Novel ID.
        novel: String,
        /// Comment text.
        content: String,
        /// Parent comment ID for replies.
        #[arg(long)]
        parent: Option<String>,
    },

    /// Rate a novel.
    Rate {
        /// Novel ID.
        novel: String,
        /// Score, 1-5.
        score: u8,
    },

    /// Administration commands.
    Admin {
        /// Admin subcommand action.
        #[command(subcommand)]
        action: AdminCommand,
    },
}

/// Bookshelf subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ShelfCommand {
    /// List the bookshelf.
    List {
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Items per page.
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Add a novel to the bookshelf.
    Add {
        /// Novel ID.
        novel: String,
    },

    /// Remove a novel from the bookshelf.
    Del {
        /// Novel ID.
        novel: String,
    },
}

/// Read-history subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List read history.
    List,

    /// Remove a single history entry.
    Del {
        /// History entry ID.
        id: String,
    },

    /// Clear all read history.
    Clear,
}

/// Administration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// List novels.
    Novels {
        /// Free keyword filter.
        #[arg(short, long)]
        query: Option<String>,
        /// Category filter.
        #[arg(long)]
        category: Option<String>,
        /// Author filter.
        #[arg(long)]
        author: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Items per page.
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// List users.
    Users {
        /// Free keyword filter (username, email).
        #[arg(short, long)]
        query: Option<String>,
        /// Status filter (active, banned, permanent_banned, deleted).
        #[arg(long)]
        status: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Items per page.
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Ban a user.
    Ban {
        /// User ID.
        id: String,
        /// Make the ban permanent.
        #[arg(long)]
        permanent: bool,
    },

    /// Lift a user's ban.
    Unban {
        /// User ID.
        id: String,
    },

    /// Set a novel's serialization status (ongoing or completed).
    SetStatus {
        /// Novel ID.
        id: String,
        /// New status.
        status: String,
    },

    /// Per-novel analytics.
    NovelStats {
        /// Inclusive range start, YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// Inclusive range end, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Per-user analytics.
    UserStats {
        /// Inclusive range start, YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// Inclusive range end, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
    },
}

/// Which backend implementation to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// In-memory backend with fixture data; no network.
    Mock,
    /// Live HTTP backend.
    Real,
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session storage configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend mode.
    #[serde(default = "default_mode")]
    pub mode: ApiMode,

    /// Base URL of the live backend, including any path prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_mode() -> ApiMode {
    ApiMode::Mock
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl ApiConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Session storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory for the persisted session. Defaults to the platform data
    /// directory when unset.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::ApiError::Config(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            crate::error::ApiError::Config(format!("Failed to parse config file: {}", e))
        })
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("config.toml"),
            PathBuf::from("novelshelf.toml"),
            dirs::config_dir()
                .map(|p| p.join("novelshelf").join("config.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/novelshelf/config.toml"),
        ];

        candidates.into_iter().find(|p| p.exists())
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# novelshelf configuration

[api]
# Backend mode: "mock" (bundled fixture data) or "real"
mode = "mock"
# Base URL of the live backend, including any path prefix
base_url = "http://127.0.0.1:8000"
# Per-request timeout in seconds
timeout_secs = 15

[session]
# Directory for the persisted session (token + profile)
# dir = "/var/lib/novelshelf/session"
"#
        .to_string()
    }
}
