//! One-shot presentation: subscription toggle, mark-all-read, static listing
//!
//! Everything that can finish without a terminal UI is handled here. When the
//! interactive list is needed the fetched records are handed back to the
//! caller, which owns the terminal.

use std::io::Write;

use crate::cli::Cli;
use crate::error::Result;
use crate::fetcher::NotificationFetcher;
use crate::github::SubscriptionState;
use crate::listing::{iso_now, render_rows};
use crate::notification::Notification;

pub const CAUGHT_UP_MSG: &str = "All caught up!";
pub const MARKED_ALL_READ_MSG: &str = "All notifications have been marked as read.";

/// What is left to do after [`present`]
#[derive(Debug)]
pub enum Presentation {
    /// Output written, nothing left
    Done,
    /// Show these records in the interactive list
    Interactive(Vec<Notification>),
}

pub async fn present(
    cli: &Cli,
    fetcher: &NotificationFetcher,
    out: &mut impl Write,
) -> Result<Presentation> {
    cli.validate()?;

    if let Some(url) = &cli.url {
        let state = fetcher.api().toggle_subscription(url).await?;
        match state {
            SubscriptionState::Subscribed => writeln!(out, "Subscribed to {}", url)?,
            SubscriptionState::Unsubscribed => writeln!(out, "Unsubscribed from {}", url)?,
        }
        return Ok(Presentation::Done);
    }

    if cli.mark_read {
        fetcher.api().mark_all_read(&iso_now()).await?;
        fetcher.cache().clear();
        writeln!(out, "{}", MARKED_ALL_READ_MSG)?;
        return Ok(Presentation::Done);
    }

    let records = fetcher.fetch(&cli.fetch_options()).await?;
    if records.is_empty() {
        writeln!(out, "{}", CAUGHT_UP_MSG)?;
        return Ok(Presentation::Done);
    }

    if cli.static_mode {
        out.write_all(render_rows(&records, &iso_now()).as_bytes())?;
        return Ok(Presentation::Done);
    }

    Ok(Presentation::Interactive(records))
}
