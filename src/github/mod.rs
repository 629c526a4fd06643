//! # GitHub Notifications API
//!
//! - [`NotificationApi`] - the calls the viewer makes against the remote feed
//! - [`GitHubClient`] - production implementation over the REST/GraphQL API
//! - [`MockApi`] - recording fake over an in-memory feed, for tests
//!
//! Authentication is delegated: the client reuses the token stored by the
//! `gh` CLI (or `GH_TOKEN` / `GITHUB_TOKEN`).

mod client;
mod mock;

pub use client::{resolve_token, GitHubClient};
pub use mock::{MockApi, RecordedCall};

use async_trait::async_trait;

use crate::error::Result;
use crate::notification::Notification;

/// REST API version sent with every request
pub const API_VERSION: &str = "2022-11-28";

/// Query for one page of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page index
    pub page: usize,
    pub per_page: usize,
    pub only_participating: bool,
    pub include_all: bool,
}

impl PageQuery {
    /// `notifications?per_page=..&page=..&participating=..&all=..`
    pub fn endpoint(&self) -> String {
        format!(
            "notifications?per_page={}&page={}&participating={}&all={}",
            self.per_page, self.page, self.only_participating, self.include_all
        )
    }
}

/// Subscription state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Subscribed,
    Unsubscribed,
}

/// Remote notification feed
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Fetch one page of notifications, in API order
    async fn list_notifications(&self, query: PageQuery) -> Result<Vec<Notification>>;

    /// Mark everything up to `last_read_at` (ISO-8601) as read
    async fn mark_all_read(&self, last_read_at: &str) -> Result<()>;

    /// Mark a single notification thread as read
    async fn mark_thread_read(&self, thread_id: &str) -> Result<()>;

    /// Flip the viewer's subscription to the issue/PR at `url`
    async fn toggle_subscription(&self, url: &str) -> Result<SubscriptionState>;
}
