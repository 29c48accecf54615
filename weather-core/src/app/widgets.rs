//! Small interactive pieces shared by the screens.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::command::Command;
use crate::app::event::{Key, SpinnerTick};
use crate::app::layout::fit;
use crate::model::Location;

const ELLIPSIS: [&str; 4] = ["", ".", "..", "..."];

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(333);

static NEXT_SPINNER_ID: AtomicU64 = AtomicU64::new(1);

/// Ellipsis progress indicator driven by tick commands.
///
/// Every accepted tick bumps the tag, and so does a restart, so at most one
/// tick chain is alive per spinner.
#[derive(Debug)]
pub struct Spinner {
    id: u64,
    tag: u64,
    frame: usize,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            id: NEXT_SPINNER_ID.fetch_add(1, Ordering::Relaxed),
            tag: 0,
            frame: 0,
        }
    }

    /// Start a fresh tick chain; ticks from earlier chains become inert.
    pub fn restart(&mut self) -> Command {
        self.tag += 1;
        self.frame = 0;
        self.tick_command()
    }

    /// Advance on a tick from the live chain and re-arm. Stale ticks return `None`.
    pub fn update(&mut self, tick: SpinnerTick) -> Option<Command> {
        if tick.id != self.id || tick.tag != self.tag {
            return None;
        }
        self.frame = (self.frame + 1) % ELLIPSIS.len();
        self.tag += 1;
        Some(self.tick_command())
    }

    pub fn view(&self) -> &'static str {
        ELLIPSIS[self.frame]
    }

    fn tick_command(&self) -> Command {
        Command::Tick {
            tick: SpinnerTick {
                id: self.id,
                tag: self.tag,
            },
            after: SPINNER_INTERVAL,
        }
    }
}

/// Vertical list of locations with one selected entry.
#[derive(Debug, Default)]
pub struct SelectList {
    items: Vec<Location>,
    selected: usize,
}

impl SelectList {
    pub fn set_items(&mut self, items: Vec<Location>) {
        self.items = items;
        self.selected = 0;
    }

    pub fn items(&self) -> &[Location] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> Option<&Location> {
        self.items.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn reset_selected(&mut self) {
        self.selected = 0;
    }

    /// Move the selection for up/down keys. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            Key::Down => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
                true
            }
            _ => false,
        }
    }

    /// Render at most `height` rows, scrolled so the selection is visible.
    pub fn render(&self, width: usize, height: usize) -> String {
        let height = height.max(1);
        let start = (self.selected + 1).saturating_sub(height);

        self.items
            .iter()
            .enumerate()
            .skip(start)
            .take(height)
            .map(|(i, item)| {
                let marker = if i == self.selected { "> " } else { "  " };
                let line = format!("{marker}{}", item.title());
                if width > 0 {
                    fit(&line, width).trim_end().to_string()
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-line text field. The cursor always sits at the end.
#[derive(Debug)]
pub struct TextInput {
    value: String,
    placeholder: &'static str,
    char_limit: usize,
}

impl TextInput {
    pub fn new(placeholder: &'static str, char_limit: usize) -> Self {
        Self {
            value: String::new(),
            placeholder,
            char_limit,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Apply an editing key. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Char(c) if !c.is_control() => {
                if self.value.chars().count() < self.char_limit {
                    self.value.push(c);
                }
                true
            }
            Key::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, width: usize) -> String {
        if self.value.is_empty() {
            return format!("> _  e.g. {}", self.placeholder);
        }

        let line = format!("> {}_", self.value);
        if width == 0 || line.width() <= width {
            return line;
        }

        // Keep the tail, where the cursor is.
        let mut tail = Vec::new();
        let mut used = 0;
        for c in line.chars().rev() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            tail.push(c);
            used += w;
        }
        std::iter::once('…').chain(tail.into_iter().rev()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(name: &str) -> Location {
        Location {
            name: name.into(),
            admin1: None,
            country: None,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn tick_of(cmd: &Command) -> SpinnerTick {
        match cmd {
            Command::Tick { tick, .. } => *tick,
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[test]
    fn spinner_cycles_and_rearms() {
        let mut spinner = Spinner::new();
        let first = tick_of(&spinner.restart());
        assert_eq!(spinner.view(), "");

        let second = tick_of(&spinner.update(first).expect("live tick re-arms"));
        assert_eq!(spinner.view(), ".");
        assert_ne!(first, second);

        // The consumed tick is now stale.
        assert!(spinner.update(first).is_none());
    }

    #[test]
    fn restart_invalidates_the_previous_chain() {
        let mut spinner = Spinner::new();
        let old = tick_of(&spinner.restart());
        let fresh = tick_of(&spinner.restart());

        assert!(spinner.update(old).is_none());
        assert!(spinner.update(fresh).is_some());
    }

    #[test]
    fn spinners_ignore_each_others_ticks() {
        let mut a = Spinner::new();
        let mut b = Spinner::new();
        let tick_a = tick_of(&a.restart());
        b.restart();
        assert!(b.update(tick_a).is_none());
    }

    #[test]
    fn list_selection_clamps_at_both_ends() {
        let mut list = SelectList::default();
        list.set_items(vec![loc("a"), loc("b")]);

        list.handle_key(Key::Up);
        assert_eq!(list.selected_index(), 0);
        list.handle_key(Key::Down);
        list.handle_key(Key::Down);
        assert_eq!(list.selected().unwrap().name, "b");

        list.reset_selected();
        assert_eq!(list.selected().unwrap().name, "a");
    }

    #[test]
    fn list_render_scrolls_to_selection() {
        let mut list = SelectList::default();
        list.set_items(vec![loc("a"), loc("b"), loc("c")]);
        list.handle_key(Key::Down);
        list.handle_key(Key::Down);

        assert_eq!(list.render(0, 2), "  b\n> c");
        assert_eq!(list.render(0, 5), "  a\n  b\n> c");
    }

    #[test]
    fn input_edits_and_respects_limit() {
        let mut input = TextInput::new("Salinas", 3);
        for c in "Lima".chars() {
            input.handle_key(Key::Char(c));
        }
        assert_eq!(input.value(), "Lim");

        input.handle_key(Key::Backspace);
        assert_eq!(input.value(), "Li");
        assert!(!input.handle_key(Key::Up));
    }

    #[test]
    fn input_render_shows_placeholder_and_tail() {
        let mut input = TextInput::new("Salinas", 256);
        assert_eq!(input.render(40), "> _  e.g. Salinas");

        for c in "Valparaiso".chars() {
            input.handle_key(Key::Char(c));
        }
        assert_eq!(input.render(40), "> Valparaiso_");
        assert_eq!(input.render(6), "…aiso_");
    }

    #[test]
    fn wide_characters_are_measured_in_columns() {
        let mut list = SelectList::default();
        list.set_items(vec![loc("札幌市中央区")]);
        let row = list.render(8, 1);
        assert_eq!(row, "> 札幌…");
        assert!(row.width() <= 8);

        let mut input = TextInput::new("Salinas", 256);
        for c in "北海道札幌".chars() {
            input.handle_key(Key::Char(c));
        }
        assert_eq!(input.render(6), "…札幌_");
    }
}
