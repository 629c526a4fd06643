//! Test fixtures and helpers

#![allow(dead_code)]

use gh_notify::Notification;
use serde_json::{json, Value};

/// One notification as the API returns it
pub fn notification_json(id: &str, title: &str, unread: bool) -> Value {
    json!({
        "id": id,
        "unread": unread,
        "reason": "review_requested",
        "updated_at": "2024-03-05T10:00:00Z",
        "last_read_at": null,
        "subject": {
            "title": title,
            "url": format!("https://api.github.com/repos/octo/hello-world/pulls/{}", id),
            "latest_comment_url": null,
            "type": "PullRequest"
        },
        "repository": {
            "full_name": "octo/hello-world",
            "name": "hello-world",
            "owner": { "login": "octo" }
        }
    })
}

pub fn notification(id: &str, title: &str, unread: bool) -> Notification {
    serde_json::from_value(notification_json(id, title, unread)).unwrap()
}

/// `count` unread notifications with ids `1..=count`
pub fn feed(count: usize) -> Vec<Notification> {
    (1..=count)
        .map(|i| notification(&i.to_string(), &format!("Notification {}", i), true))
        .collect()
}
