use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GridSize, SnakeConfig};
use crate::food::Pellet;
use crate::input::{Direction, KeyBindings};

/// Segments added per pellet, realized one per tick.
pub const GROWTH_PER_PELLET: u32 = 2;

/// Grid position in logical cell coordinates.
///
/// Row and column zero, and the rows/columns at `width`/`height`, are wall
/// cells; the playable interior is the open range between them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies on or beyond the surrounding wall.
    #[must_use]
    pub fn is_out_of_bounds(self, grid: GridSize) -> bool {
        self.x <= 0
            || self.y <= 0
            || self.x >= i32::from(grid.width)
            || self.y >= i32::from(grid.height)
    }

    /// Samples a uniformly random interior position.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, grid: GridSize) -> Self {
        debug_assert!(grid.width >= 2 && grid.height >= 2);

        Self {
            x: rng.gen_range(1..i32::from(grid.width)),
            y: rng.gen_range(1..i32::from(grid.height)),
        }
    }

    /// Returns true when `other` is exactly one horizontal or vertical step away.
    #[must_use]
    pub fn is_adjacent_to(self, other: Self) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }

    /// Returns the neighbouring position one cell towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

/// One player-controlled snake.
///
/// The body is never empty: construction rejects empty segment lists and
/// every `move_forward` is paired with at most one tail removal.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_growth: u32,
    key_bindings: KeyBindings,
    color: String,
}

impl Snake {
    /// Creates a one-cell snake at `start` with no key bindings.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake body needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_growth: 0,
            key_bindings: KeyBindings::default(),
            color: String::new(),
        }
    }

    /// Builds a snake from a validated configuration entry.
    #[must_use]
    pub fn from_config(config: &SnakeConfig) -> Self {
        Self::from_segments(config.body.clone(), config.direction)
            .with_key_bindings(config.key_bindings.clone())
            .with_color(config.color.clone())
    }

    #[must_use]
    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Routes a raw key name through this snake's bindings; unknown keys are ignored.
    pub fn handle_key(&mut self, key: &str) {
        if let Some(direction) = self.key_bindings.direction_for(key) {
            self.request_direction_change(direction);
        }
    }

    /// Changes heading unless `direction` lies on the current axis.
    ///
    /// Same-axis requests cover both "keep going" and the 180° reversal, and
    /// both leave the heading untouched. The latest orthogonal request before
    /// a tick wins.
    pub fn request_direction_change(&mut self, direction: Direction) {
        if self.direction.is_same_axis(direction) {
            return;
        }

        debug!(from = ?self.direction, to = ?direction, "direction change");
        self.direction = direction;
    }

    /// Prepends the next head; the body is one segment longer until [`Snake::truncate`].
    pub fn move_forward(&mut self) {
        let next_head = self.head().step(self.direction);
        self.body.push_front(next_head);
    }

    /// Drops the tail, or spends one unit of pending growth instead.
    ///
    /// Must follow [`Snake::move_forward`] in the same tick.
    pub fn truncate(&mut self) {
        if self.pending_growth == 0 {
            debug_assert!(self.body.len() > 1, "truncate called without move_forward");
            let _ = self.body.pop_back();
        } else {
            self.pending_growth -= 1;
        }
    }

    /// Queues growth for one eaten pellet.
    pub fn grow(&mut self) {
        self.pending_growth += GROWTH_PER_PELLET;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if any non-head segment occupies `position`.
    #[must_use]
    pub fn body_occupies(&self, position: Position) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == position)
    }

    #[must_use]
    pub fn crashed_into_self(&self) -> bool {
        self.body_occupies(self.head())
    }

    #[must_use]
    pub fn crashed_into_wall(&self, grid: GridSize) -> bool {
        self.head().is_out_of_bounds(grid)
    }

    /// Head touches any segment of `other`, its head included.
    #[must_use]
    pub fn crashed_into(&self, other: &Snake) -> bool {
        other.occupies(self.head())
    }

    /// Returns the pellet under the head, if any.
    #[must_use]
    pub fn eats(&self, food: &[Pellet]) -> Option<Pellet> {
        let head = self.head();
        food.iter().copied().find(|pellet| pellet.position == head)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
