pub mod hud;
pub mod menu;

/// Human-facing label for the snake at `index`.
#[must_use]
pub fn player_label(index: usize) -> String {
    format!("P{}", index + 1)
}
