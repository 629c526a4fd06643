//! Mock API for testing
//!
//! Serves notifications from an in-memory feed without touching the network
//! and records every call for assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{NotificationApi, PageQuery, SubscriptionState};
use crate::error::{NotifyError, Result};
use crate::notification::Notification;

/// A call made against [`MockApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    List(PageQuery),
    MarkAllRead(String),
    MarkThreadRead(String),
    ToggleSubscription(String),
}

/// Mock API backed by a flat list of notifications, paged on demand
#[derive(Clone, Default)]
pub struct MockApi {
    feed: Arc<Mutex<Vec<Notification>>>,
    /// Page index that fails with an API error
    fail_page: Option<usize>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockApi {
    /// Create a new mock with an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a feed, paged by the `per_page` of each query
    pub fn with_feed(feed: Vec<Notification>) -> Self {
        Self {
            feed: Arc::new(Mutex::new(feed)),
            ..Self::default()
        }
    }

    /// Fail when `page` is requested
    pub fn failing_on_page(mut self, page: usize) -> Self {
        self.fail_page = Some(page);
        self
    }

    /// Get all calls made to this mock
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Number of page requests made
    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::List(_)))
            .count()
    }

    /// Clear all recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).push(call);
    }
}

#[async_trait]
impl NotificationApi for MockApi {
    async fn list_notifications(&self, query: PageQuery) -> Result<Vec<Notification>> {
        self.record(RecordedCall::List(query));

        if self.fail_page == Some(query.page) {
            return Err(NotifyError::Api {
                status: 502,
                message: "Server Error".to_string(),
            });
        }

        let feed = self.feed.lock().unwrap_or_else(|p| p.into_inner());
        let start = query.page.saturating_sub(1) * query.per_page;
        Ok(feed
            .iter()
            .filter(|n| query.include_all || n.unread)
            .skip(start)
            .take(query.per_page)
            .cloned()
            .collect())
    }

    async fn mark_all_read(&self, last_read_at: &str) -> Result<()> {
        self.record(RecordedCall::MarkAllRead(last_read_at.to_string()));
        for n in self.feed.lock().unwrap_or_else(|p| p.into_inner()).iter_mut() {
            n.unread = false;
        }
        Ok(())
    }

    async fn mark_thread_read(&self, thread_id: &str) -> Result<()> {
        self.record(RecordedCall::MarkThreadRead(thread_id.to_string()));
        for n in self.feed.lock().unwrap_or_else(|p| p.into_inner()).iter_mut() {
            if n.id == thread_id {
                n.unread = false;
            }
        }
        Ok(())
    }

    async fn toggle_subscription(&self, url: &str) -> Result<SubscriptionState> {
        self.record(RecordedCall::ToggleSubscription(url.to_string()));
        Ok(SubscriptionState::Subscribed)
    }
}
