use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, GameConfig, GridSize};
use crate::food::Pellet;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Why a snake was found dead at the start of a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum DeathReason {
    Wall,
    SelfCollision,
    /// Ran into snake `other` (index into the game's snake list).
    Snake { other: usize },
}

/// A snake found dead on the terminal tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Casualty {
    pub snake: usize,
    pub reason: DeathReason,
}

/// Result of one [`GameState::advance_tick`] call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    Continue,
    GameOver { casualties: Vec<Casualty> },
}

/// Read-only view of one snake for renderers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SnakeView {
    pub body: Vec<Position>,
    pub color: String,
    pub direction: Direction,
}

/// Read-only view of the whole board after a tick.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub tick: u64,
    pub grid: GridSize,
    pub snakes: Vec<SnakeView>,
    pub food: Vec<Position>,
    pub casualties: Vec<Casualty>,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snakes: Vec<Snake>,
    pub food: Vec<Pellet>,
    pub status: GameStatus,
    pub tick_count: u64,
    casualties: Vec<Casualty>,
    grid: GridSize,
    target_food_count: usize,
    rng: StdRng,
}

impl GameState {
    /// Creates a game seeded from system entropy.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    pub fn new_with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut state = Self {
            snakes: config.snakes.iter().map(Snake::from_config).collect(),
            food: Vec::with_capacity(config.target_food_count),
            status: GameStatus::Running,
            tick_count: 0,
            casualties: Vec::new(),
            grid: config.grid,
            target_food_count: config.target_food_count,
            rng,
        };
        state.refill_food();

        Ok(state)
    }

    /// Dispatches a raw key name to every snake; each decides via its own bindings.
    pub fn handle_key(&mut self, key: &str) {
        if self.status != GameStatus::Running {
            return;
        }

        for snake in &mut self.snakes {
            snake.handle_key(key);
        }
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// Collisions are judged on the heads left by the previous tick, before
    /// anything moves, so a fatal move is reported one tick after it happens.
    /// Once the game is over this is a no-op that keeps reporting the same
    /// casualties.
    pub fn advance_tick(&mut self) -> TickOutcome {
        if self.status == GameStatus::GameOver {
            return TickOutcome::GameOver {
                casualties: self.casualties.clone(),
            };
        }

        trace!(tick = self.tick_count, "tick");

        let casualties = self.find_casualties();
        if !casualties.is_empty() {
            info!(tick = self.tick_count, ?casualties, "game over");
            self.status = GameStatus::GameOver;
            self.casualties = casualties.clone();
            return TickOutcome::GameOver { casualties };
        }

        self.tick_count += 1;

        // Every snake judges food against the board as it stood before this
        // tick, so two heads landing on one pellet both eat it.
        let available = self.food.clone();
        for (index, snake) in self.snakes.iter_mut().enumerate() {
            snake.move_forward();
            snake.truncate();

            if let Some(pellet) = snake.eats(&available) {
                debug!(snake = index, x = pellet.position.x, y = pellet.position.y, "pellet eaten");
                self.food.retain(|candidate| *candidate != pellet);
                snake.grow();
            }
        }

        self.refill_food();
        TickOutcome::Continue
    }

    fn find_casualties(&self) -> Vec<Casualty> {
        self.snakes
            .iter()
            .enumerate()
            .filter_map(|(index, snake)| {
                let reason = if snake.crashed_into_wall(self.grid) {
                    DeathReason::Wall
                } else if snake.crashed_into_self() {
                    DeathReason::SelfCollision
                } else {
                    let other = self
                        .snakes
                        .iter()
                        .enumerate()
                        .find(|(other, other_snake)| {
                            *other != index && snake.crashed_into(other_snake)
                        })
                        .map(|(other, _)| other)?;
                    DeathReason::Snake { other }
                };

                Some(Casualty {
                    snake: index,
                    reason,
                })
            })
            .collect()
    }

    /// Tops the board back up to the target pellet count.
    fn refill_food(&mut self) {
        while self.food.len() < self.target_food_count {
            let Some(pellet) = Pellet::spawn(&mut self.rng, self.grid, &self.snakes, &self.food)
            else {
                warn!(
                    food = self.food.len(),
                    target = self.target_food_count,
                    "no free cell left for food"
                );
                return;
            };

            debug!(x = pellet.position.x, y = pellet.position.y, "pellet spawned");
            self.food.push(pellet);
        }
    }

    /// Builds the read-only view consumed by renderers.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            tick: self.tick_count,
            grid: self.grid,
            snakes: self
                .snakes
                .iter()
                .map(|snake| SnakeView {
                    body: snake.segments().copied().collect(),
                    color: snake.color().to_owned(),
                    direction: snake.direction(),
                })
                .collect(),
            food: self.food.iter().map(|pellet| pellet.position).collect(),
            casualties: self.casualties.clone(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn target_food_count(&self) -> usize {
        self.target_food_count
    }

    /// Snakes found dead on the terminal tick; empty while running.
    #[must_use]
    pub fn casualties(&self) -> &[Casualty] {
        &self.casualties
    }
}
