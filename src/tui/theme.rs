//! Theme - colors and styles for the notification list

use ratatui::style::{Color, Modifier, Style};

use crate::notification::SubjectKind;

/// Color palette
pub struct NotifyTheme {
    pub magenta: Color,
    pub amber: Color,
    pub cyan: Color,
    pub green: Color,
    pub red: Color,
    pub white: Color,
    pub gray: Color,
    pub selection: Color,
}

impl Default for NotifyTheme {
    fn default() -> Self {
        Self {
            magenta: Color::Rgb(188, 140, 255), // #BC8CFF
            amber: Color::Rgb(255, 191, 0),     // #FFBF00
            cyan: Color::Rgb(57, 197, 207),     // #39C5CF
            green: Color::Rgb(63, 185, 80),     // #3FB950
            red: Color::Rgb(248, 81, 73),       // #F85149
            white: Color::Rgb(230, 237, 243),   // #E6EDF3
            gray: Color::Rgb(128, 128, 128),
            selection: Color::Rgb(48, 54, 61), // #30363D
        }
    }
}

impl NotifyTheme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Styles
    // ─────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> Style {
        Style::default().fg(self.white)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.gray)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.magenta).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    /// Row under the cursor
    pub fn cursor(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.red).add_modifier(Modifier::BOLD)
    }

    /// Unread glyph and marked rows
    pub fn unread(&self) -> Style {
        Style::default().fg(self.magenta)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.cyan)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subject Colors
    // ─────────────────────────────────────────────────────────────────────

    /// Color for the subject type column
    pub fn kind_color(&self, kind: SubjectKind) -> Color {
        match kind {
            SubjectKind::PullRequest => self.green,
            SubjectKind::Issue => self.amber,
            SubjectKind::Release => self.cyan,
            SubjectKind::Discussion => self.magenta,
            SubjectKind::Commit | SubjectKind::Other => self.gray,
        }
    }
}

/// Symbols used in the list
pub mod icons {
    pub const CURSOR: &str = "▶";
    pub const MARKED: &str = "✓";
}
