//! TUI Module - interactive notification list
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (view.rs)                           │
//! │  Pure rendering. No business logic. Borrows state and records.      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ NavigationState
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      DOMAIN LAYER (state.rs)                        │
//! │  Pure reducer. NavEvent → (NavigationState, Effect).                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ NavEvent (events.rs key map)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      APP LAYER (app.rs)                             │
//! │  Terminal setup, event loop, effects: gh processes and API calls.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;
mod view;

pub use app::TuiApp;
pub use events::{help_entries, KeyChord, KeyMap};
pub use state::{visible_window, Effect, NavEvent, NavigationState, PreviewLayout, Viewport};
pub use theme::NotifyTheme;
pub use view::View;

use crate::config::NotifyConfig;
use crate::fetcher::{FetchOptions, NotificationFetcher};
use crate::notification::Notification;

/// Run the interactive list until the user quits
pub async fn run(
    fetcher: NotificationFetcher,
    options: FetchOptions,
    records: Vec<Notification>,
    config: &NotifyConfig,
    preview: bool,
) -> anyhow::Result<()> {
    let app = TuiApp::new(fetcher, options, records, config, preview)?;
    app.run().await
}
