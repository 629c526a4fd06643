//! Rendering - pure drawing of one frame
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ header: prompt, status, position counter      │
//! ├──────────────────────────────┬───────────────┤
//! │ visible window of the list   │ preview       │
//! ├──────────────────────────────┴───────────────┤
//! │ help line (optional)                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The bottom preview layout stacks the preview under the list instead.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::state::{NavigationState, PreviewLayout, HEADER_ROWS, HELP_ROWS};
use super::theme::{icons, NotifyTheme};
use crate::listing::{short_repo, time_ago, UNREAD_GLYPH};
use crate::notification::Notification;

/// Everything a frame needs, borrowed from the app
pub struct View<'a> {
    pub state: &'a NavigationState,
    pub records: &'a [Notification],
    pub help: &'a [(String, &'static str)],
    /// Configured token of the help toggle, shown in the header hint
    pub help_key: &'a str,
    pub status: Option<&'a str>,
    pub now: DateTime<Utc>,
    pub theme: &'a NotifyTheme,
}

impl View<'_> {
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let help_rows = if self.state.help_visible { HELP_ROWS } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_ROWS),
                Constraint::Min(0),
                Constraint::Length(help_rows),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        let (list_area, preview_area) = self.split_body(chunks[1]);
        self.render_list(frame, list_area);
        if let Some(preview_area) = preview_area {
            self.render_preview(frame, preview_area);
        }

        if self.state.help_visible {
            self.render_help(frame, chunks[2]);
        }
    }

    fn split_body(&self, body: Rect) -> (Rect, Option<Rect>) {
        if !self.state.preview_visible {
            return (body, None);
        }
        let layout = self.state.preview_layout;
        let chunks = match layout {
            PreviewLayout::Bottom => Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(self.state.list_height() as u16),
                    Constraint::Min(0),
                ])
                .split(body),
            PreviewLayout::Right | PreviewLayout::Wide => Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(100 - layout.percent()),
                    Constraint::Percentage(layout.percent()),
                ])
                .split(body),
        };
        (chunks[0], Some(chunks[1]))
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let position = match self.state.cursor() {
            Some(cursor) => format!("{}/{}", cursor + 1, self.state.len()),
            None => "0/0".to_string(),
        };

        let mut spans = vec![
            Span::styled("GitHub Notifications> ", self.theme.header()),
            Span::styled(position, self.theme.accent()),
        ];
        if !self.state.marked.is_empty() {
            spans.push(Span::styled(
                format!(" ({} marked)", self.state.marked.len()),
                self.theme.unread(),
            ));
        }
        match self.status {
            Some(status) => spans.push(Span::styled(format!("  {}", status), self.theme.error())),
            None => spans.push(Span::styled(
                format!("  {} help · esc quit", self.help_key),
                self.theme.dimmed(),
            )),
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        if self.records.is_empty() {
            let line = Line::from(Span::styled("All caught up!", self.theme.dimmed()));
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let cursor = self.state.cursor();
        let lines: Vec<Line> = self
            .state
            .window()
            .filter_map(|i| self.records.get(i).map(|n| (i, n)))
            .map(|(i, n)| self.row(n, cursor == Some(i)))
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn row(&self, n: &Notification, selected: bool) -> Line<'static> {
        let marked = self.state.marked.contains(&n.id);
        let base = if n.unread {
            self.theme.text().add_modifier(Modifier::BOLD)
        } else {
            self.theme.dimmed()
        };
        let number = match n.number() {
            "" => String::new(),
            num if num.chars().all(|c| c.is_ascii_digit()) => format!("#{}", num),
            sha => sha.chars().take(7).collect(),
        };

        let line = Line::from(vec![
            Span::styled(
                if selected { icons::CURSOR } else { " " },
                self.theme.accent(),
            ),
            Span::styled(
                if marked { icons::MARKED } else { " " },
                self.theme.unread(),
            ),
            Span::styled(
                if n.unread { UNREAD_GLYPH } else { " " },
                self.theme.unread(),
            ),
            Span::raw(" "),
            Span::styled(format!("{:<25}", short_repo(n)), base),
            Span::styled(
                format!("{:<12}", n.subject_type()),
                Style::default().fg(self.theme.kind_color(n.kind())),
            ),
            Span::styled(format!("{:<8}", number), base),
            Span::styled(format!("{:<17}", n.reason), self.theme.dimmed()),
            Span::styled(format!("{:<14}", time_ago(n, self.now)), self.theme.dimmed()),
            Span::styled(n.subject_title().to_string(), base),
        ]);

        if selected {
            line.style(self.theme.cursor())
        } else {
            line
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(" Preview ");

        let Some(n) = self.state.cursor().and_then(|i| self.records.get(i)) else {
            frame.render_widget(block, area);
            return;
        };

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<9}", label), self.theme.dimmed()),
                Span::styled(value, self.theme.text()),
            ])
        };
        let url = n
            .html_url()
            .unwrap_or_else(|| n.subject_url().to_string());

        let lines = vec![
            Line::from(Span::styled(
                n.subject_title().to_string(),
                self.theme.header(),
            )),
            Line::from(""),
            field("repo", n.repository_full_name().to_string()),
            field("type", n.subject_type().to_string()),
            field("reason", n.reason.clone()),
            field("url", url),
            field("updated", time_ago(n, self.now)),
            field(
                "state",
                if n.unread { "UNREAD" } else { "READ" }.to_string(),
            ),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(self.help.len() * 2);
        for (token, description) in self.help {
            spans.push(Span::styled(format!(" {}", token), self.theme.accent()));
            spans.push(Span::styled(format!(" {} ", description), self.theme.dimmed()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed());
        let paragraph = Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
