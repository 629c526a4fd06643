//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T> = std::result::Result<T, NotifyError>;

#[derive(Error, Debug)]
pub enum NotifyError {
    // ─────────────────────────────────────────────────────────────
    // User input
    // ─────────────────────────────────────────────────────────────

    #[error("{0}")]
    ConflictingFlags(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Environment
    // ─────────────────────────────────────────────────────────────

    #[error("install '{binary}'")]
    MissingDependency { binary: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Config error: {reason}")]
    Config { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Remote API
    // ─────────────────────────────────────────────────────────────

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Local actions
    // ─────────────────────────────────────────────────────────────

    #[error("{0}")]
    Action(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for NotifyError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            NotifyError::ConflictingFlags(_) => Some("Drop -e/-f or run -r on its own"),
            NotifyError::InvalidPattern { .. } => {
                Some("Patterns are regular expressions; escape special characters")
            }
            NotifyError::MissingDependency { .. } => None,
            NotifyError::Auth(_) => Some("Run 'gh auth login' or set GH_TOKEN"),
            NotifyError::Config { .. } => {
                Some("Check ~/.config/gh-notify/gh-notify.toml and GH_NOTIFY_* variables")
            }
            NotifyError::Api { status: 401, .. } => Some("Run 'gh auth refresh'"),
            NotifyError::Api { .. } => None,
            NotifyError::Http(_) => Some("Check your network connection"),
            NotifyError::Json(_) => None,
            NotifyError::Action(_) => None,
            NotifyError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
