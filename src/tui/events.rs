//! Event Handling - key chords and keyboard input mapping

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::NavEvent;
use crate::config::KeyBindings;
use crate::error::{NotifyError, Result};

/// A key with modifiers, parsed from an fzf-style token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Parse `ctrl-x`, `alt-x`, `enter`, `tab`, `btab`, `esc`, `space`,
    /// `up`, `down`, `home`, `end`, `f1`..`f12` or a single character
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || NotifyError::Config {
            reason: format!("invalid key binding '{}'", token),
        };
        let lower = token.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("ctrl-") {
            let c = single_char(rest).ok_or_else(invalid)?;
            return Ok(Self::new(KeyCode::Char(c), KeyModifiers::CONTROL));
        }
        // Prefix is case-insensitive; the alt character keeps its case
        if lower.starts_with("alt-") {
            let c = single_char(&token["alt-".len()..]).ok_or_else(invalid)?;
            return Ok(Self::new(KeyCode::Char(c), KeyModifiers::ALT));
        }

        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "btab" | "shift-tab" => KeyCode::BackTab,
            "esc" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "page-up" => KeyCode::PageUp,
            "pgdn" | "page-down" => KeyCode::PageDown,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().map_err(|_| invalid())?;
                if !(1..=12).contains(&n) {
                    return Err(invalid());
                }
                KeyCode::F(n)
            }
            _ => KeyCode::Char(single_char(token).ok_or_else(invalid)?),
        };
        Ok(Self::new(code, KeyModifiers::NONE))
    }

    /// Normalize a terminal key event for lookup
    ///
    /// Shift is implied by the character itself (`?`, `G`) and by BackTab.
    pub fn from_event(key: KeyEvent) -> Self {
        let mut modifiers = key.modifiers;
        if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self::new(key.code, modifiers)
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Configured chords first, then the fixed navigation keys
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyChord, NavEvent)>,
}

impl KeyMap {
    pub fn from_bindings(keys: &KeyBindings) -> Result<Self> {
        let configured = [
            (&keys.mark_all_read, NavEvent::MarkAllRead),
            (&keys.open_browser, NavEvent::OpenInBrowser),
            (&keys.view_diff, NavEvent::ViewDiff),
            (&keys.view_patch, NavEvent::ViewPatch),
            (&keys.reload, NavEvent::Reload),
            (&keys.mark_read, NavEvent::MarkRead),
            (&keys.comment, NavEvent::Comment),
            (&keys.toggle, NavEvent::ToggleMark),
            (&keys.resize_preview, NavEvent::ResizePreview),
            (&keys.view, NavEvent::Open),
            (&keys.toggle_preview, NavEvent::TogglePreview),
            (&keys.toggle_help, NavEvent::ToggleHelp),
        ];

        let mut bindings = Vec::with_capacity(configured.len() + 12);
        for (token, event) in configured {
            bindings.push((KeyChord::parse(token)?, event));
        }

        let none = KeyModifiers::NONE;
        bindings.extend([
            (KeyChord::new(KeyCode::Up, none), NavEvent::MoveUp),
            (KeyChord::new(KeyCode::Char('k'), none), NavEvent::MoveUp),
            (KeyChord::new(KeyCode::Down, none), NavEvent::MoveDown),
            (KeyChord::new(KeyCode::Char('j'), none), NavEvent::MoveDown),
            (KeyChord::new(KeyCode::Home, none), NavEvent::First),
            (KeyChord::new(KeyCode::Char('g'), none), NavEvent::First),
            (KeyChord::new(KeyCode::End, none), NavEvent::Last),
            (KeyChord::new(KeyCode::Char('G'), none), NavEvent::Last),
            (KeyChord::new(KeyCode::Enter, none), NavEvent::Open),
            (KeyChord::new(KeyCode::Esc, none), NavEvent::Quit),
            (KeyChord::new(KeyCode::Char('q'), none), NavEvent::Quit),
            (
                KeyChord::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                NavEvent::Quit,
            ),
        ]);
        Ok(Self { bindings })
    }

    pub fn lookup(&self, key: KeyEvent) -> Option<NavEvent> {
        let chord = KeyChord::from_event(key);
        self.bindings
            .iter()
            .find(|(c, _)| *c == chord)
            .map(|(_, event)| *event)
    }

    /// Map a terminal event; key releases and unbound keys map to nothing
    pub fn map_event(&self, event: Event) -> Option<NavEvent> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.lookup(key),
            Event::Resize(width, height) => Some(NavEvent::Resize { width, height }),
            _ => None,
        }
    }
}

/// Help line entries: `(token, description)` in display order
pub fn help_entries(keys: &KeyBindings) -> Vec<(String, &'static str)> {
    vec![
        (keys.view.clone(), "view"),
        (keys.toggle_preview.clone(), "preview"),
        (keys.resize_preview.clone(), "resize preview"),
        (keys.view_diff.clone(), "diff"),
        (keys.view_patch.clone(), "patch"),
        (keys.open_browser.clone(), "browser"),
        (keys.comment.clone(), "comment"),
        (keys.toggle.clone(), "mark"),
        (keys.mark_read.clone(), "mark read"),
        (keys.mark_all_read.clone(), "mark all read"),
        (keys.reload.clone(), "reload"),
        (keys.toggle_help.clone(), "help"),
        ("esc".to_string(), "quit"),
    ]
}
