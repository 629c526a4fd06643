//! Notification records as returned by `GET /notifications`
//!
//! The nested shape mirrors the API JSON so a page round-trips through the
//! cache unchanged. Flat accessors expose the fields the rest of the crate
//! works with.

use serde::{Deserialize, Serialize};
use url::Url;

/// One entry of the notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub unread: bool,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub last_read_at: Option<String>,
    pub repository: Repository,
    #[serde(default)]
    pub reason: String,
    pub subject: Subject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub owner: Owner,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub latest_comment_url: Option<String>,
}

/// What the notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    PullRequest,
    Issue,
    Commit,
    Release,
    Discussion,
    Other,
}

impl SubjectKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "PullRequest" => Self::PullRequest,
            "Issue" => Self::Issue,
            "Commit" => Self::Commit,
            "Release" => Self::Release,
            "Discussion" => Self::Discussion,
            _ => Self::Other,
        }
    }

    /// `gh` subcommand that handles this kind, if any
    pub fn gh_command(&self) -> Option<&'static str> {
        match self {
            Self::PullRequest => Some("pr"),
            Self::Issue => Some("issue"),
            _ => None,
        }
    }
}

impl Notification {
    pub fn repository_full_name(&self) -> &str {
        &self.repository.full_name
    }

    pub fn repository_owner(&self) -> &str {
        &self.repository.owner.login
    }

    pub fn repository_name(&self) -> &str {
        &self.repository.name
    }

    pub fn subject_type(&self) -> &str {
        &self.subject.kind
    }

    pub fn subject_title(&self) -> &str {
        &self.subject.title
    }

    pub fn subject_url(&self) -> &str {
        self.subject.url.as_deref().unwrap_or("")
    }

    pub fn subject_latest_comment_url(&self) -> &str {
        self.subject.latest_comment_url.as_deref().unwrap_or("")
    }

    pub fn last_read_at(&self) -> &str {
        self.last_read_at.as_deref().unwrap_or("")
    }

    pub fn kind(&self) -> SubjectKind {
        SubjectKind::parse(&self.subject.kind)
    }

    /// Issue/PR number or commit sha: the last segment of the subject url
    pub fn number(&self) -> &str {
        last_path_segment(self.subject_url())
    }

    /// Browser url for the subject
    ///
    /// `https://api.github.com/repos/o/r/pulls/3` becomes
    /// `https://github.com/o/r/pull/3`. Enterprise hosts drop the `/api/v3`
    /// prefix instead of the `api.` subdomain.
    pub fn html_url(&self) -> Option<String> {
        let mut url = Url::parse(self.subject.url.as_deref()?).ok()?;

        if url.host_str() == Some("api.github.com") {
            url.set_host(Some("github.com")).ok()?;
        }

        let path = url.path();
        let path = path.strip_prefix("/api/v3").unwrap_or(path);
        let path = path.strip_prefix("/repos").unwrap_or(path);
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "pulls" => "pull",
                "commits" => "commit",
                other => other,
            })
            .collect();
        let path = format!("/{}", segments.join("/"));
        url.set_path(&path);
        Some(url.to_string())
    }
}

/// Last `/`-separated segment, empty for an empty url
pub fn last_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or("")
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_api_shape() {
        let value = json!({
            "id": "1",
            "unread": true,
            "reason": "review_requested",
            "updated_at": "2024-03-05T10:00:00Z",
            "last_read_at": null,
            "subject": {
                "title": "Greetings",
                "url": "https://api.github.com/repos/octocat/Hello-World/issues/123",
                "latest_comment_url": "https://api.github.com/repos/octocat/Hello-World/issues/comments/123",
                "type": "Issue"
            },
            "repository": {
                "id": 1296269,
                "name": "Hello-World",
                "full_name": "octocat/Hello-World",
                "owner": { "login": "octocat", "id": 1 }
            },
            "url": "https://api.github.com/notifications/threads/1"
        });

        let n: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(n.repository_owner(), "octocat");
        assert_eq!(n.repository_name(), "Hello-World");
        assert_eq!(n.subject_type(), "Issue");
        assert_eq!(n.kind(), SubjectKind::Issue);
        assert_eq!(n.last_read_at(), "");
        assert_eq!(n.number(), "123");
        assert_eq!(last_path_segment(n.subject_latest_comment_url()), "123");
    }

    #[test]
    fn test_null_subject_urls() {
        let value = json!({
            "id": "2",
            "unread": false,
            "reason": "subscribed",
            "updated_at": "2024-03-05T10:00:00Z",
            "subject": { "title": "Discussion", "url": null, "latest_comment_url": null, "type": "Discussion" },
            "repository": { "name": "r", "full_name": "o/r", "owner": { "login": "o" } }
        });

        let n: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(n.subject_url(), "");
        assert_eq!(n.number(), "");
        assert!(n.html_url().is_none());
    }

    #[test]
    fn test_html_url_pull_request() {
        let n = fixtures::notification("42", "t", true);
        assert_eq!(
            n.html_url().as_deref(),
            Some("https://github.com/octo/hello-world/pull/42")
        );
    }

    #[test]
    fn test_html_url_commit_and_enterprise() {
        let mut n = fixtures::notification("1", "t", true);
        n.subject.url = Some("https://api.github.com/repos/o/r/commits/abc123".into());
        assert_eq!(
            n.html_url().as_deref(),
            Some("https://github.com/o/r/commit/abc123")
        );

        n.subject.url = Some("https://ghe.example.com/api/v3/repos/o/r/issues/7".into());
        assert_eq!(
            n.html_url().as_deref(),
            Some("https://ghe.example.com/o/r/issues/7")
        );
    }

    #[test]
    fn test_cache_round_trip_keeps_shape() {
        let n = fixtures::notification("9", "Title", false);
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["subject"]["type"], "PullRequest");
        assert_eq!(value["repository"]["owner"]["login"], "octo");
        let back: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(back, n);
    }
}
