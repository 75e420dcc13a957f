use rand::Rng;
use serde::Serialize;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Food pellet currently on the board.
///
/// Pellets compare by coordinate, so removing "this pellet" removes whatever
/// pellet sits on that cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Pellet {
    pub position: Position,
}

impl Pellet {
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self { position }
    }

    /// Spawns a pellet on an interior cell free of snakes and other pellets.
    ///
    /// Rejection-samples random interior cells. Returns `None` only when no
    /// free cell is left, so callers never spin on a full board.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        grid: GridSize,
        snakes: &[Snake],
        food: &[Pellet],
    ) -> Option<Self> {
        if free_cell_count(grid, snakes, food) == 0 {
            return None;
        }

        loop {
            let position = Position::random(rng, grid);
            if is_free(position, snakes, food) {
                return Some(Self::new(position));
            }
        }
    }
}

fn is_free(position: Position, snakes: &[Snake], food: &[Pellet]) -> bool {
    !snakes.iter().any(|snake| snake.occupies(position))
        && !food.iter().any(|pellet| pellet.position == position)
}

/// Counts interior cells not covered by any snake or pellet.
#[must_use]
pub fn free_cell_count(grid: GridSize, snakes: &[Snake], food: &[Pellet]) -> usize {
    let mut free = 0;
    for y in 1..i32::from(grid.height) {
        for x in 1..i32::from(grid.width) {
            if is_free(Position::new(x, y), snakes, food) {
                free += 1;
            }
        }
    }

    free
}
