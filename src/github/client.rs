//! GitHub REST/GraphQL client
//!
//! Thin wrapper over `reqwest` that sends the versioned API headers and
//! turns non-2xx responses into [`NotifyError::Api`].

use std::process::Command;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{NotificationApi, PageQuery, SubscriptionState, API_VERSION};
use crate::error::{NotifyError, Result};
use crate::notification::Notification;

const USER_AGENT: &str = concat!("gh-notify/", env!("CARGO_PKG_VERSION"));

const SUBSCRIPTION_QUERY: &str = r#"query($url: URI!) {
  resource(url: $url) {
    ... on Subscribable { id viewerSubscription }
  }
}"#;

const UPDATE_SUBSCRIPTION: &str = r#"mutation($id: ID!, $state: SubscriptionState!) {
  updateSubscription(input: {subscribableId: $id, state: $state}) {
    subscribable { viewerSubscription }
  }
}"#;

/// Client for the GitHub API
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client for `base_url` (e.g. `https://api.github.com`)
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create a client using the token stored by `gh`
    pub fn from_gh(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::new(base_url, resolve_token()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// GraphQL endpoint: `/graphql` on github.com, `/api/graphql` on Enterprise
    fn graphql_url(&self) -> String {
        match self.base_url.strip_suffix("/api/v3") {
            Some(host) => format!("{}/api/graphql", host),
            None => format!("{}/graphql", self.base_url),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::debug!(status = %status, message = %message, "GitHub API error");
        Err(NotifyError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// GET `endpoint` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(url = %url, "GET");
        let response = self.send(self.request(Method::GET, &url)).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Run a GraphQL document and return its `data`
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let url = self.graphql_url();
        let builder = self
            .request(Method::POST, &url)
            .json(&json!({ "query": query, "variables": variables }));
        let mut body: Value = self.send(builder).await?.json().await?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(NotifyError::Api {
                    status: 200,
                    message,
                });
            }
        }
        Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl NotificationApi for GitHubClient {
    async fn list_notifications(&self, query: PageQuery) -> Result<Vec<Notification>> {
        self.get_json(&query.endpoint()).await
    }

    async fn mark_all_read(&self, last_read_at: &str) -> Result<()> {
        let url = self.url("notifications");
        let builder = self
            .request(Method::PUT, &url)
            .json(&json!({ "last_read_at": last_read_at, "read": true }));
        self.send(builder).await?;
        Ok(())
    }

    async fn mark_thread_read(&self, thread_id: &str) -> Result<()> {
        let url = self.url(&format!("notifications/threads/{}", thread_id));
        self.send(self.request(Method::PATCH, &url)).await?;
        Ok(())
    }

    async fn toggle_subscription(&self, url: &str) -> Result<SubscriptionState> {
        let data = self
            .graphql(SUBSCRIPTION_QUERY, json!({ "url": url }))
            .await?;
        let resource = &data["resource"];
        let id = resource["id"].as_str().ok_or_else(|| {
            NotifyError::Action(format!("'{}' is not a subscribable issue or pull request", url))
        })?;

        let (next, state) = match resource["viewerSubscription"].as_str() {
            Some("SUBSCRIBED") => ("UNSUBSCRIBED", SubscriptionState::Unsubscribed),
            _ => ("SUBSCRIBED", SubscriptionState::Subscribed),
        };
        self.graphql(UPDATE_SUBSCRIPTION, json!({ "id": id, "state": next }))
            .await?;
        tracing::debug!(url, state = next, "subscription updated");
        Ok(state)
    }
}

/// Find an API token: `GH_TOKEN`, `GITHUB_TOKEN`, then `gh auth token`
pub fn resolve_token() -> Result<String> {
    for var in ["GH_TOKEN", "GITHUB_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|e| NotifyError::Auth(format!("failed to run 'gh auth token': {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NotifyError::Auth(stderr.trim().to_string()));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(NotifyError::Auth("'gh auth token' returned no token".to_string()));
    }
    Ok(token)
}

const MAX_ERROR_MESSAGE: usize = 200;

/// One-line message for a failed response: the JSON `message`, else the first
/// line of a plain-text body, else the status reason. Markup bodies are skipped.
fn error_message(status: StatusCode, body: &str) -> String {
    let text = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string());

    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| !line.starts_with('<'));

    match line {
        Some(line) if line.chars().count() > MAX_ERROR_MESSAGE => {
            let cut: String = line.chars().take(MAX_ERROR_MESSAGE).collect();
            format!("{}...", cut)
        }
        Some(line) => line.to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
