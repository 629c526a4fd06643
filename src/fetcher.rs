//! Paginated feed retrieval with title filtering
//!
//! Pages are read through the [`CacheStore`] first and only hit the API on a
//! miss. Filtering runs after pagination, so `max_count` bounds the records
//! fetched, not the records kept.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::cache::CacheStore;
use crate::error::{NotifyError, Result};
use crate::github::{NotificationApi, PageQuery};
use crate::notification::Notification;

/// Records per API page
pub const PER_PAGE_LIMIT: usize = 50;

/// What to fetch and which titles to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_count: usize,
    pub only_participating: bool,
    pub include_all: bool,
    /// Drop titles matching this pattern (empty = keep all)
    pub exclude: String,
    /// Keep only titles matching this pattern (empty = keep all)
    pub include: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_count: PER_PAGE_LIMIT,
            only_participating: false,
            include_all: false,
            exclude: String::new(),
            include: String::new(),
        }
    }
}

/// Compiled include/exclude patterns
///
/// Patterns are case-insensitive regular expressions matched anywhere in the
/// title, so a plain word behaves like substring containment.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    exclude: Option<Regex>,
    include: Option<Regex>,
}

impl TitleFilter {
    pub fn new(exclude: &str, include: &str) -> Result<Self> {
        Ok(Self {
            exclude: compile(exclude)?,
            include: compile(include)?,
        })
    }

    /// Exclusion wins over inclusion
    pub fn keeps(&self, title: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(title) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(title),
            None => true,
        }
    }
}

fn compile(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| NotifyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Cache key for one page of the feed
pub fn cache_key(page: usize, only_participating: bool, include_all: bool) -> String {
    format!(
        "notifications_p{}_participating-{}_all-{}",
        page, only_participating, include_all
    )
}

/// Fetches the feed page by page through the cache
#[derive(Clone)]
pub struct NotificationFetcher {
    api: Arc<dyn NotificationApi>,
    cache: Arc<dyn CacheStore>,
    per_page: usize,
}

impl NotificationFetcher {
    pub fn new(api: Arc<dyn NotificationApi>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            api,
            cache,
            per_page: PER_PAGE_LIMIT,
        }
    }

    /// Override the page size
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn api(&self) -> &Arc<dyn NotificationApi> {
        &self.api
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Fetch up to `max_count` records and apply the title filter
    pub async fn fetch(&self, options: &FetchOptions) -> Result<Vec<Notification>> {
        let filter = TitleFilter::new(&options.exclude, &options.include)?;
        let fetched = self.fetch_unfiltered(options).await?;
        let total = fetched.len();
        let kept: Vec<Notification> = fetched
            .into_iter()
            .filter(|n| filter.keeps(n.subject_title()))
            .collect();

        tracing::debug!(fetched = total, kept = kept.len(), "notifications filtered");
        Ok(kept)
    }

    async fn fetch_unfiltered(&self, options: &FetchOptions) -> Result<Vec<Notification>> {
        let mut all = Vec::new();
        let mut page = 1;

        while all.len() < options.max_count {
            let mut records = self.fetch_page(page, options).await?;
            if records.is_empty() {
                break;
            }

            let full_page = records.len() >= self.per_page;
            records.truncate(options.max_count - all.len());
            all.extend(records);

            if !full_page {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    async fn fetch_page(&self, page: usize, options: &FetchOptions) -> Result<Vec<Notification>> {
        let key = cache_key(page, options.only_participating, options.include_all);
        if let Some(value) = self.cache.get(&key) {
            match serde_json::from_value(value) {
                Ok(records) => return Ok(records),
                Err(e) => tracing::debug!(key = %key, error = %e, "cached page unreadable"),
            }
        }

        let query = PageQuery {
            page,
            per_page: self.per_page,
            only_participating: options.only_participating,
            include_all: options.include_all,
        };
        let records = self.api.list_notifications(query).await?;
        tracing::debug!(page, count = records.len(), "fetched notification page");

        match serde_json::to_value(&records) {
            Ok(value) => self.cache.set(&key, &value),
            Err(e) => tracing::debug!(key = %key, error = %e, "page not cacheable"),
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_example() {
        let filter = TitleFilter::new("Bug", "").unwrap();
        let kept: Vec<&str> = ["Fix bug", "Add feature", "Bugfix release"]
            .into_iter()
            .filter(|t| filter.keeps(t))
            .collect();
        assert_eq!(kept, vec!["Add feature"]);
    }

    #[test]
    fn test_include_and_exclude() {
        let filter = TitleFilter::new("wip", "fix").unwrap();
        assert!(filter.keeps("Fix login"));
        assert!(!filter.keeps("WIP: fix login"));
        assert!(!filter.keeps("Add feature"));
    }

    #[test]
    fn test_regex_patterns() {
        let filter = TitleFilter::new("", r"^\[release\]").unwrap();
        assert!(filter.keeps("[Release] v1.2"));
        assert!(!filter.keeps("Prepare [release]"));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert!(TitleFilter::default().keeps("anything"));
        assert!(TitleFilter::new("", "").unwrap().keeps(""));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = TitleFilter::new("fix(", "").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidPattern { .. }));
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        assert_eq!(cache_key(2, true, false), cache_key(2, true, false));
        assert_ne!(cache_key(2, true, false), cache_key(2, false, false));
        assert_ne!(cache_key(1, false, true), cache_key(1, false, false));
        assert_eq!(
            cache_key(1, false, true),
            "notifications_p1_participating-false_all-true"
        );
    }
}
