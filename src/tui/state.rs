//! NavigationState - Domain Layer
//!
//! Pure state transitions for the notification list. Input events go in,
//! the next state and at most one [`Effect`] come out. Nothing here touches
//! the terminal, the network or the filesystem.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::notification::Notification;

/// Rows taken by the header line
pub const HEADER_ROWS: u16 = 1;
/// Rows taken by the help line when shown
pub const HELP_ROWS: u16 = 3;
/// Percentage of the screen the bottom preview takes
pub const BOTTOM_PREVIEW_PERCENT: u16 = 75;

// ─────────────────────────────────────────────────────────────────────────────
// Events & Effects
// ─────────────────────────────────────────────────────────────────────────────

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    MoveUp,
    MoveDown,
    First,
    Last,
    TogglePreview,
    ToggleHelp,
    Open,
    ResizePreview,
    ToggleMark,
    Resize { width: u16, height: u16 },
    ViewDiff,
    ViewPatch,
    OpenInBrowser,
    Comment,
    MarkRead,
    MarkAllRead,
    Reload,
    Quit,
}

/// Work the app must do outside the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    View(usize),
    Diff { index: usize, patch: bool },
    Browse(usize),
    Comment(usize),
    /// Thread ids to mark read
    MarkRead(Vec<String>),
    MarkAllRead,
    Reload,
    Quit,
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Where the preview sits, cycled by the resize-preview key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewLayout {
    /// Right side, 60% wide
    #[default]
    Right,
    /// Right side, 75% wide
    Wide,
    /// Below the list, 75% high
    Bottom,
}

impl PreviewLayout {
    pub fn next(&self) -> Self {
        match self {
            Self::Right => Self::Wide,
            Self::Wide => Self::Bottom,
            Self::Bottom => Self::Right,
        }
    }

    /// Share of the screen given to the preview, in percent
    pub fn percent(&self) -> u16 {
        match self {
            Self::Right => 60,
            Self::Wide | Self::Bottom => BOTTOM_PREVIEW_PERCENT,
        }
    }
}

/// Terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Rows of the list to draw so that `cursor` stays visible
///
/// Near the top the window starts at 0, near the bottom it shows the last
/// `height` rows, and anywhere else the cursor sits in the middle.
pub fn visible_window(cursor: usize, len: usize, height: usize) -> Range<usize> {
    if len <= height {
        return 0..len;
    }
    if height == 0 {
        return cursor..cursor;
    }
    let half = height / 2;
    let start = if cursor < half {
        0
    } else if cursor + half >= len {
        len - height
    } else {
        cursor - half
    };
    start..start + height
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    cursor: usize,
    len: usize,
    pub viewport: Option<Viewport>,
    pub preview_visible: bool,
    pub help_visible: bool,
    pub preview_layout: PreviewLayout,
    /// Ids toggled for multi-selection
    pub marked: BTreeSet<String>,
    pub should_quit: bool,
}

impl NavigationState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    /// Start with the preview open
    pub fn with_preview(mut self, visible: bool) -> Self {
        self.preview_visible = visible;
        self
    }

    /// Replace the sequence length (after a reload), keeping the cursor in range
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index under the cursor, `None` for an empty list
    pub fn cursor(&self) -> Option<usize> {
        (self.len > 0).then_some(self.cursor)
    }

    /// Rows available to the list
    pub fn list_height(&self) -> usize {
        let Some(viewport) = self.viewport else {
            return 0;
        };
        let mut height = usize::from(viewport.height.saturating_sub(HEADER_ROWS));
        if self.help_visible {
            height = height.saturating_sub(usize::from(HELP_ROWS));
        }
        if self.preview_visible && self.preview_layout == PreviewLayout::Bottom {
            height = height * usize::from(100 - BOTTOM_PREVIEW_PERCENT) / 100;
        }
        height
    }

    /// Indices to draw this frame
    pub fn window(&self) -> Range<usize> {
        visible_window(self.cursor, self.len, self.list_height())
    }

    /// Apply one event
    pub fn reduce(mut self, event: NavEvent, records: &[Notification]) -> (Self, Option<Effect>) {
        let effect = match event {
            NavEvent::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            NavEvent::MoveDown => {
                self.cursor = (self.cursor + 1).min(self.len.saturating_sub(1));
                None
            }
            NavEvent::First => {
                self.cursor = 0;
                None
            }
            NavEvent::Last => {
                self.cursor = self.len.saturating_sub(1);
                None
            }
            NavEvent::TogglePreview => {
                self.preview_visible = !self.preview_visible;
                None
            }
            NavEvent::ToggleHelp => {
                self.help_visible = !self.help_visible;
                None
            }
            NavEvent::ResizePreview => {
                if self.preview_visible {
                    self.preview_layout = self.preview_layout.next();
                }
                self.preview_visible = true;
                None
            }
            NavEvent::Resize { width, height } => {
                self.viewport = Some(Viewport { width, height });
                None
            }
            NavEvent::Open => {
                self.preview_visible = true;
                self.cursor().map(Effect::View)
            }
            NavEvent::ToggleMark => {
                if let Some(n) = self.cursor().and_then(|i| records.get(i)) {
                    if !self.marked.remove(&n.id) {
                        self.marked.insert(n.id.clone());
                    }
                    self.cursor = (self.cursor + 1).min(self.len.saturating_sub(1));
                }
                None
            }
            NavEvent::ViewDiff => self.cursor().map(|index| Effect::Diff { index, patch: false }),
            NavEvent::ViewPatch => self.cursor().map(|index| Effect::Diff { index, patch: true }),
            NavEvent::OpenInBrowser => self.cursor().map(Effect::Browse),
            NavEvent::Comment => self.cursor().map(Effect::Comment),
            NavEvent::MarkRead => {
                let ids: Vec<String> = if self.marked.is_empty() {
                    self.cursor()
                        .and_then(|i| records.get(i))
                        .map(|n| vec![n.id.clone()])
                        .unwrap_or_default()
                } else {
                    std::mem::take(&mut self.marked).into_iter().collect()
                };
                (!ids.is_empty()).then_some(Effect::MarkRead(ids))
            }
            NavEvent::MarkAllRead => {
                self.marked.clear();
                (!self.is_empty()).then_some(Effect::MarkAllRead)
            }
            NavEvent::Reload => Some(Effect::Reload),
            NavEvent::Quit => {
                self.should_quit = true;
                Some(Effect::Quit)
            }
        };
        (self, effect)
    }
}
