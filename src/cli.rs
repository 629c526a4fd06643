//! Command-line flags

use clap::Parser;

use crate::error::{NotifyError, Result};
use crate::fetcher::{FetchOptions, PER_PAGE_LIMIT};

pub const MARK_READ_CONFLICT: &str = "Can't mark all notifications as read when either the '-e' or '-f' flag was used, as it would also mark notifications as read that are filtered out.";

#[derive(Parser, Debug, Clone)]
#[command(name = "gh-notify")]
#[command(about = "View and act on GitHub notifications from the terminal")]
#[command(version)]
pub struct Cli {
    /// Exclude notifications whose title matches PATTERN
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN", default_value = "")]
    pub exclude: String,

    /// Keep only notifications whose title matches PATTERN
    #[arg(short = 'f', long = "filter", value_name = "PATTERN", default_value = "")]
    pub filter: String,

    /// Max number of notifications to show
    #[arg(short = 'n', long = "num", value_name = "NUM", default_value_t = PER_PAGE_LIMIT)]
    pub num: usize,

    /// (Un)subscribe to the issue or pull request at URL
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Show only participating or mention notifications
    #[arg(short = 'p', long = "participating")]
    pub participating: bool,

    /// Show all (read and unread) notifications
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Print a static listing instead of the interactive view
    #[arg(short = 's', long = "static")]
    pub static_mode: bool,

    /// Mark all notifications as read
    #[arg(short = 'r', long = "mark-read")]
    pub mark_read: bool,

    /// Open the preview window on start
    #[arg(short = 'w', long = "preview")]
    pub preview: bool,
}

impl Cli {
    /// Reject flag combinations before any other work happens
    pub fn validate(&self) -> Result<()> {
        if self.mark_read && (!self.exclude.is_empty() || !self.filter.is_empty()) {
            return Err(NotifyError::ConflictingFlags(MARK_READ_CONFLICT.to_string()));
        }
        Ok(())
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            max_count: self.num,
            only_participating: self.participating,
            include_all: self.all,
            exclude: self.exclude.clone(),
            include: self.filter.clone(),
        }
    }
}
