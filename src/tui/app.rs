//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};

use chrono::Utc;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use super::events::{help_entries, KeyMap};
use super::state::{Effect, NavEvent, NavigationState};
use super::theme::NotifyTheme;
use super::view::View;
use crate::actions::{Actions, GhActions};
use crate::config::NotifyConfig;
use crate::error::Result as NotifyResult;
use crate::fetcher::{FetchOptions, NotificationFetcher};
use crate::notification::Notification;

/// TUI Application
pub struct TuiApp {
    fetcher: NotificationFetcher,
    options: FetchOptions,
    actions: Box<dyn Actions>,
    keymap: KeyMap,
    help: Vec<(String, &'static str)>,
    help_key: String,
    theme: NotifyTheme,
    records: Vec<Notification>,
    state: NavigationState,
    /// Last failed action, shown in the header
    status: Option<String>,
    /// Set while the terminal is in raw mode on the alternate screen
    raw_mode: bool,
}

impl TuiApp {
    /// Create the app over an already fetched list
    pub fn new(
        fetcher: NotificationFetcher,
        options: FetchOptions,
        records: Vec<Notification>,
        config: &NotifyConfig,
        preview: bool,
    ) -> anyhow::Result<Self> {
        let keymap = KeyMap::from_bindings(&config.keys)?;
        let state = NavigationState::new(records.len()).with_preview(preview);

        Ok(Self {
            fetcher,
            options,
            actions: Box::new(GhActions::new()),
            keymap,
            help: help_entries(&config.keys),
            help_key: config.keys.toggle_help.clone(),
            theme: NotifyTheme::new(),
            records,
            state,
            status: None,
            raw_mode: false,
        })
    }

    /// Replace the external-process actions
    pub fn with_actions(mut self, actions: Box<dyn Actions>) -> Self {
        self.actions = actions;
        self
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn records(&self) -> &[Notification] {
        &self.records
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Run the TUI application
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;
        let result = self.main_loop(&mut terminal).await;
        self.restore_terminal(&mut terminal)?;
        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&mut self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        self.raw_mode = true;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        self.raw_mode = false;
        Ok(())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let size = terminal.size()?;
        self.handle(
            NavEvent::Resize {
                width: size.width,
                height: size.height,
            },
            terminal,
        )
        .await?;

        while !self.state.should_quit {
            self.draw(terminal)?;

            // Blocks until the next key or resize
            if let Some(nav) = self.keymap.map_event(event::read()?) {
                self.handle(nav, terminal).await?;
            }
        }

        Ok(())
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let view = View {
            state: &self.state,
            records: &self.records,
            help: &self.help,
            help_key: &self.help_key,
            status: self.status.as_deref(),
            now: Utc::now(),
            theme: &self.theme,
        };
        terminal.draw(|frame| view.render(frame))?;
        Ok(())
    }

    /// Reduce one event and carry out its effect
    pub async fn handle<B: Backend>(
        &mut self,
        event: NavEvent,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        let (state, effect) = std::mem::take(&mut self.state).reduce(event, &self.records);
        self.state = state;

        match effect {
            Some(effect) => self.apply(effect, terminal).await,
            None => Ok(()),
        }
    }

    async fn apply<B: Backend>(
        &mut self,
        effect: Effect,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        match effect {
            Effect::View(index) => {
                self.external(terminal, index, |a, n| a.view(n))?;
            }
            Effect::Diff { index, patch } => {
                self.external(terminal, index, |a, n| a.view_diff(n, patch))?;
            }
            Effect::Browse(index) => {
                self.external(terminal, index, |a, n| a.open_in_browser(n))?;
            }
            Effect::Comment(index) => {
                if self.external(terminal, index, |a, n| a.comment(n))? {
                    self.state.should_quit = true;
                }
            }
            Effect::MarkRead(ids) => {
                for id in &ids {
                    self.fetcher.api().mark_thread_read(id).await?;
                }
                tracing::debug!(count = ids.len(), "marked threads read");
                self.fetcher.cache().clear();
                self.reload().await?;
            }
            Effect::MarkAllRead => {
                for n in &self.records {
                    self.fetcher.api().mark_thread_read(&n.id).await?;
                }
                tracing::debug!(count = self.records.len(), "marked displayed threads read");
                self.fetcher.cache().clear();
                self.reload().await?;
            }
            Effect::Reload => {
                self.fetcher.cache().clear();
                self.reload().await?;
            }
            Effect::Quit => {}
        }
        Ok(())
    }

    async fn reload(&mut self) -> anyhow::Result<()> {
        self.records = self.fetcher.fetch(&self.options).await?;
        self.state = std::mem::take(&mut self.state).with_len(self.records.len());
        // Marks only apply to rows still listed
        let records = &self.records;
        self.state
            .marked
            .retain(|id| records.iter().any(|n| &n.id == id));
        self.status = None;
        Ok(())
    }

    /// Run an external process on record `index` with the terminal suspended
    ///
    /// Returns whether it succeeded; a failure lands in the status line.
    fn external<B, F>(
        &mut self,
        terminal: &mut Terminal<B>,
        index: usize,
        action: F,
    ) -> anyhow::Result<bool>
    where
        B: Backend,
        F: FnOnce(&dyn Actions, &Notification) -> NotifyResult<()>,
    {
        let Some(n) = self.records.get(index) else {
            return Ok(false);
        };

        if self.raw_mode {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        let result = action(self.actions.as_ref(), n);
        if self.raw_mode {
            execute!(io::stdout(), EnterAlternateScreen)?;
            enable_raw_mode()?;
            terminal.clear()?;
        }

        match result {
            Ok(()) => {
                self.status = None;
                Ok(true)
            }
            Err(e) => {
                tracing::debug!(error = %e, "action failed");
                self.status = Some(e.to_string());
                Ok(false)
            }
        }
    }
}
