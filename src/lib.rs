//! gh-notify - GitHub notifications in the terminal

pub mod actions;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod listing;
pub mod notification;
pub mod presenter;
pub mod tui;

pub use cache::{CacheStore, FileCache, MemoryCache};
pub use cli::Cli;
pub use config::NotifyConfig;
pub use error::{FixSuggestion, NotifyError};
pub use fetcher::{FetchOptions, NotificationFetcher};
pub use github::{GitHubClient, MockApi, NotificationApi};
pub use notification::Notification;
pub use presenter::{present, Presentation};
