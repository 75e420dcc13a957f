use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{Direction, KeyBindings};
use crate::snake::Position;

const APP_DIR_NAME: &str = "duel-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default grid width and height in cells, walls included.
pub const DEFAULT_GRID_WIDTH: u16 = 30;
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Default interval between ticks in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 400;

/// Default number of pellets kept on the board.
pub const DEFAULT_TARGET_FOOD_COUNT: usize = 3;

/// Logical grid dimensions passed through the game as a named type.
///
/// Cells on `x == 0`, `x == width`, `y == 0` and `y == height` are walls.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the number of playable interior cells.
    #[must_use]
    pub fn interior_cells(self) -> usize {
        usize::from(self.width.saturating_sub(1)) * usize::from(self.height.saturating_sub(1))
    }
}

/// Starting layout and controls for one snake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Initial segments, head first.
    pub body: Vec<Position>,
    pub direction: Direction,
    pub key_bindings: KeyBindings,
    /// Render-only color name, opaque to the game rules.
    #[serde(default)]
    pub color: String,
}

/// Immutable settings for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridSize,
    pub tick_interval_ms: u64,
    pub target_food_count: usize,
    pub snakes: Vec<SnakeConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize {
                width: DEFAULT_GRID_WIDTH,
                height: DEFAULT_GRID_HEIGHT,
            },
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            target_food_count: DEFAULT_TARGET_FOOD_COUNT,
            snakes: vec![
                SnakeConfig {
                    body: vec![Position::new(20, 20)],
                    direction: Direction::Right,
                    key_bindings: KeyBindings::arrows(),
                    color: "purple".to_owned(),
                },
                SnakeConfig {
                    body: vec![Position::new(10, 10)],
                    direction: Direction::Right,
                    key_bindings: KeyBindings::wasd(),
                    color: "pink".to_owned(),
                },
            ],
        }
    }
}

/// Reasons a configuration cannot start a game.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("grid {width}x{height} has no playable interior")]
    GridTooSmall { width: u16, height: u16 },
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("at least one snake is required")]
    NoSnakes,
    #[error("snake {snake} has an empty body")]
    EmptySnakeBody { snake: usize },
    #[error("snake {snake} starts out of bounds at ({}, {})", .position.x, .position.y)]
    SnakeOutOfBounds { snake: usize, position: Position },
    #[error("snake {snake} segment {segment} is not adjacent to the segment before it")]
    DisjointBody { snake: usize, segment: usize },
    #[error("snake {snake} covers ({}, {}) twice", .position.x, .position.y)]
    RepeatedSegment { snake: usize, position: Position },
    #[error("snakes {first} and {second} both start on ({}, {})", .position.x, .position.y)]
    OverlappingSnakes {
        first: usize,
        second: usize,
        position: Position,
    },
    #[error("{cells} interior cells cannot hold {occupied} snake segments and {food} pellets")]
    InsufficientCapacity {
        cells: usize,
        occupied: usize,
        food: usize,
    },
}

impl GameConfig {
    /// Reads a JSON config file; fields it omits keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` when given, else the user config file when it exists,
    /// else the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Rejects configurations that cannot start a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width < 2 || self.grid.height < 2 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid.width,
                height: self.grid.height,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.snakes.is_empty() {
            return Err(ConfigError::NoSnakes);
        }

        let mut owners = HashMap::<Position, usize>::new();
        for (index, snake) in self.snakes.iter().enumerate() {
            if snake.body.is_empty() {
                return Err(ConfigError::EmptySnakeBody { snake: index });
            }

            if let Some(position) = snake
                .body
                .iter()
                .find(|segment| segment.is_out_of_bounds(self.grid))
            {
                return Err(ConfigError::SnakeOutOfBounds {
                    snake: index,
                    position: *position,
                });
            }

            if let Some(segment) = snake
                .body
                .windows(2)
                .position(|pair| !pair[0].is_adjacent_to(pair[1]))
            {
                return Err(ConfigError::DisjointBody {
                    snake: index,
                    segment: segment + 1,
                });
            }

            for position in &snake.body {
                match owners.insert(*position, index) {
                    Some(owner) if owner == index => {
                        return Err(ConfigError::RepeatedSegment {
                            snake: index,
                            position: *position,
                        });
                    }
                    Some(owner) => {
                        return Err(ConfigError::OverlappingSnakes {
                            first: owner,
                            second: index,
                            position: *position,
                        });
                    }
                    None => {}
                }
            }
        }

        let occupied = owners.len();
        let cells = self.grid.interior_cells();
        if occupied + self.target_food_count > cells {
            return Err(ConfigError::InsufficientCapacity {
                cells,
                occupied,
                food: self.target_food_count,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Returns the platform-correct location of the user config file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::input::{Direction, KeyBindings};
    use crate::snake::Position;

    use super::{ConfigError, GameConfig, GridSize, SnakeConfig};

    #[test]
    fn default_config_is_the_classic_two_player_setup() {
        let config = GameConfig::default();

        assert_eq!(config.grid, GridSize {
            width: 30,
            height: 30
        });
        assert_eq!(config.tick_interval_ms, 400);
        assert_eq!(config.target_food_count, 3);
        assert_eq!(config.snakes.len(), 2);
        assert_eq!(config.snakes[0].body, vec![Position::new(20, 20)]);
        assert_eq!(
            config.snakes[0].key_bindings.direction_for("ArrowUp"),
            Some(Direction::Up)
        );
        assert_eq!(config.snakes[1].body, vec![Position::new(10, 10)]);
        assert_eq!(
            config.snakes[1].key_bindings.direction_for("s"),
            Some(Direction::Down)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn grid_without_interior_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 1,
                height: 30,
            },
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { width: 1, .. })
        ));
    }

    #[test]
    fn snake_starting_on_a_wall_is_rejected() {
        let mut config = GameConfig::default();
        config.snakes[1].body = vec![Position::new(10, 1), Position::new(10, 0)];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeOutOfBounds { snake: 1, position })
                if position == Position::new(10, 0)
        ));
    }

    #[test]
    fn empty_snake_lists_and_bodies_are_rejected() {
        let mut config = GameConfig::default();
        config.snakes[0].body.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySnakeBody { snake: 0 })
        ));

        config.snakes.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoSnakes)));
    }

    #[test]
    fn snakes_sharing_a_start_cell_are_rejected() {
        let mut config = GameConfig::default();
        config.snakes[1].body = vec![Position::new(20, 20)];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::OverlappingSnakes { first: 0, second: 1, position })
                if position == Position::new(20, 20)
        ));
    }

    #[test]
    fn body_covering_a_cell_twice_is_rejected() {
        let mut config = GameConfig::default();
        config.snakes[0].body = vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(5, 5),
        ];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::RepeatedSegment { snake: 0, position })
                if position == Position::new(5, 5)
        ));
    }

    #[test]
    fn body_with_a_gap_is_rejected() {
        let mut config = GameConfig::default();
        config.snakes[0].body = vec![Position::new(20, 20), Position::new(3, 7)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DisjointBody {
                snake: 0,
                segment: 1
            })
        ));

        config.snakes[0].body = vec![
            Position::new(20, 20),
            Position::new(19, 20),
            Position::new(18, 21),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DisjointBody {
                snake: 0,
                segment: 2
            })
        ));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..GameConfig::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::ZeroTickInterval)));
    }

    #[test]
    fn board_too_small_for_food_is_rejected() {
        let config = GameConfig {
            grid: GridSize {
                width: 3,
                height: 3,
            },
            target_food_count: 4,
            snakes: vec![SnakeConfig {
                body: vec![Position::new(1, 1)],
                direction: Direction::Right,
                key_bindings: KeyBindings::default(),
                color: String::new(),
            }],
            ..GameConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InsufficientCapacity {
                cells: 4,
                occupied: 1,
                food: 4
            })
        ));
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let path = unique_test_path("partial");
        write_test_file(&path, r#"{"tick_interval_ms": 150, "target_food_count": 5}"#);

        let config = GameConfig::load(&path).expect("partial config should load");

        assert_eq!(config.tick_interval_ms, 150);
        assert_eq!(config.target_food_count, 5);
        assert_eq!(config.snakes, GameConfig::default().snakes);
        cleanup_test_path(&path);
    }

    #[test]
    fn snake_entries_load_from_json() {
        let path = unique_test_path("snakes");
        write_test_file(
            &path,
            r#"{
                "grid": {"width": 12, "height": 8},
                "snakes": [{
                    "body": [{"x": 3, "y": 3}, {"x": 2, "y": 3}],
                    "direction": "right",
                    "key_bindings": {"i": "up", "k": "down"},
                    "color": "cyan"
                }]
            }"#,
        );

        let config = GameConfig::load(&path).expect("config should load");

        assert_eq!(config.grid, GridSize {
            width: 12,
            height: 8
        });
        assert_eq!(config.snakes.len(), 1);
        assert_eq!(config.snakes[0].body[1], Position::new(2, 3));
        assert_eq!(
            config.snakes[0].key_bindings.direction_for("k"),
            Some(Direction::Down)
        );
        assert!(config.validate().is_ok());
        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_config_file_returns_parse_error() {
        let path = unique_test_path("malformed");
        write_test_file(&path, "not-json");

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let path = unique_test_path("missing");

        assert!(matches!(
            GameConfig::resolve(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("duel-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn write_test_file(path: &PathBuf, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(path, contents).expect("test file write should succeed");
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
