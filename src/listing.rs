//! Static listing
//!
//! One tab-separated row per notification. The column order is relied on by
//! anything piping the output (e.g. a fuzzy selector using `--with-nth`):
//!
//! ```text
//! 1 YYYY-MM of update     7 unread glyph
//! 2 current ISO time      8 owner/name (abbreviated)
//! 3 thread id             9 subject type
//! 4 UNREAD | READ        10 subject url
//! 5 latest comment id    11 reason
//! 6 repo full name       12 title
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use crate::notification::{last_path_segment, Notification};

pub const UNREAD_GLYPH: &str = "●";
pub const OWNER_WIDTH: usize = 10;
pub const NAME_WIDTH: usize = 13;

/// Shorten to `max` characters, ending in `…` when truncated
pub fn abbreviate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

/// `YYYY-MM` of an RFC 3339 timestamp, `2020` when it can't be parsed
pub fn short_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%Y-%m").to_string())
        .unwrap_or_else(|_| "2020".to_string())
}

/// Current UTC time as `2024-03-05T10:00:00Z`
pub fn iso_now() -> String {
    iso_time(Utc::now())
}

pub fn iso_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Relative age: last read time for unread records, update time otherwise
pub fn time_ago(n: &Notification, now: DateTime<Utc>) -> String {
    let reference = if n.unread && !n.last_read_at().is_empty() {
        n.last_read_at()
    } else {
        n.updated_at.as_str()
    };
    let Ok(time) = DateTime::parse_from_rfc3339(reference) else {
        return "Not available".to_string();
    };

    let diff = now.signed_duration_since(time.with_timezone(&Utc));
    if diff.num_hours() < 1 {
        format!("{}min ago", diff.num_minutes().max(0))
    } else if diff.num_hours() < 24 {
        format!("{}h ago", diff.num_hours())
    } else {
        time.format("%d/%b %H:%M").to_string()
    }
}

/// `owner/name` abbreviated for display columns
pub fn short_repo(n: &Notification) -> String {
    format!(
        "{}/{}",
        abbreviate(n.repository_owner(), OWNER_WIDTH),
        abbreviate(n.repository_name(), NAME_WIDTH)
    )
}

/// One listing row, without trailing newline
pub fn format_row(n: &Notification, now_iso: &str) -> String {
    let state = if n.unread { "UNREAD" } else { "READ" };
    let glyph = if n.unread { UNREAD_GLYPH } else { " " };

    let date = short_date(&n.updated_at);
    let repo = short_repo(n);
    let columns: [&str; 12] = [
        &date,
        now_iso,
        &n.id,
        state,
        last_path_segment(n.subject_latest_comment_url()),
        n.repository_full_name(),
        glyph,
        &repo,
        n.subject_type(),
        n.subject_url(),
        &n.reason,
        n.subject_title(),
    ];
    columns.join("\t")
}

/// All rows, newline terminated
pub fn render_rows(records: &[Notification], now_iso: &str) -> String {
    let mut out = String::new();
    for n in records {
        out.push_str(&format_row(n, now_iso));
        out.push('\n');
    }
    out
}
