use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true when both directions lie on the same axis (equal or opposite).
    #[must_use]
    pub fn is_same_axis(self, other: Self) -> bool {
        other == self || other == self.opposite()
    }
}

/// Mapping from raw key names (`"ArrowLeft"`, `"a"`, ...) to directions.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(HashMap<String, Direction>);

impl KeyBindings {
    /// Builds bindings from `(key, direction)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Direction)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, direction)| (key.to_owned(), direction))
                .collect(),
        )
    }

    /// Arrow keys.
    #[must_use]
    pub fn arrows() -> Self {
        Self::from_pairs([
            ("ArrowLeft", Direction::Left),
            ("ArrowRight", Direction::Right),
            ("ArrowUp", Direction::Up),
            ("ArrowDown", Direction::Down),
        ])
    }

    /// WASD keys.
    #[must_use]
    pub fn wasd() -> Self {
        Self::from_pairs([
            ("a", Direction::Left),
            ("d", Direction::Right),
            ("w", Direction::Up),
            ("s", Direction::Down),
        ])
    }

    #[must_use]
    pub fn direction_for(&self, key: &str) -> Option<Direction> {
        self.0.get(key).copied()
    }
}

/// Input events produced by the terminal layer for the driver loop.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TerminalInput {
    /// A raw key name, dispatched to every snake.
    Key(String),
    Confirm,
    Quit,
}

/// Polls crossterm for key presses and translates them into [`TerminalInput`].
#[derive(Debug, Clone, Copy)]
pub struct InputHandler {
    max_poll: Duration,
}

impl InputHandler {
    /// Creates a handler that never blocks longer than `max_poll` per call.
    #[must_use]
    pub fn new(max_poll: Duration) -> Self {
        Self { max_poll }
    }

    /// Waits for the next relevant key press, at most until `until_tick` (when
    /// given) or the handler's maximum poll, whichever is shorter.
    pub fn poll_input(
        &mut self,
        until_tick: Option<Duration>,
    ) -> io::Result<Option<TerminalInput>> {
        let timeout = until_tick.map_or(self.max_poll, |remaining| remaining.min(self.max_poll));
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(translate_key(key)),
            _ => Ok(None),
        }
    }
}

/// Translates a terminal key event into the driver's vocabulary.
///
/// Arrow keys become browser-style names so bindings read the same whether
/// they come from a config file or the defaults.
#[must_use]
pub fn translate_key(key: KeyEvent) -> Option<TerminalInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(TerminalInput::Quit);
    }

    let name = match key.code {
        KeyCode::Esc => return Some(TerminalInput::Quit),
        KeyCode::Enter => return Some(TerminalInput::Confirm),
        KeyCode::Left => "ArrowLeft".to_owned(),
        KeyCode::Right => "ArrowRight".to_owned(),
        KeyCode::Up => "ArrowUp".to_owned(),
        KeyCode::Down => "ArrowDown".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };

    Some(TerminalInput::Key(name))
}
