use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::GridSize;
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::render_game_over_menu;

/// Terminal columns per grid cell; two keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

const CELL_SNAKE_HEAD: &str = "▓▓";
const CELL_SNAKE_BODY: &str = "██";
const CELL_FOOD: &str = "()";

const FOOD_COLOR: Color = Color::Green;
const BORDER_COLOR: Color = Color::DarkGray;

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot);
    let board = centered_board(play_area, snapshot.grid);

    let block = Block::bordered().border_style(Style::new().fg(BORDER_COLOR));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_food(frame, inner, snapshot);
    render_snakes(frame, inner, snapshot);

    if snapshot.status == GameStatus::GameOver {
        render_game_over_menu(frame, play_area, snapshot);
    }
}

/// Maps a snake's opaque color name onto a terminal color.
///
/// Accepts ratatui's own names and `#rrggbb` as well as a few web names the
/// terminal palette lacks. Unknown names fall back to white.
#[must_use]
pub fn snake_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "purple" => Color::Magenta,
        "pink" => Color::LightMagenta,
        "orange" => Color::Rgb(255, 165, 0),
        other => other.parse().unwrap_or(Color::White),
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();
    for pellet in &snapshot.food {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *pellet) else {
            continue;
        };

        buffer.set_string(x, y, CELL_FOOD, Style::new().fg(FOOD_COLOR));
    }
}

fn render_snakes(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();
    for snake in &snapshot.snakes {
        let color = snake_color(&snake.color);

        // Tail first so the head stays visible where a snake overlaps itself.
        for (index, segment) in snake.body.iter().enumerate().rev() {
            let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
                continue;
            };

            if index == 0 {
                buffer.set_string(
                    x,
                    y,
                    CELL_SNAKE_HEAD,
                    Style::new().fg(color).add_modifier(Modifier::BOLD),
                );
            } else {
                buffer.set_string(x, y, CELL_SNAKE_BODY, Style::new().fg(color));
            }
        }
    }
}

/// Returns the bordered board rectangle, centered and clipped to `area`.
fn centered_board(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_sub(1)
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(1).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Converts an interior grid position to the terminal cell inside `inner`.
fn logical_to_terminal(inner: Rect, grid: GridSize, position: Position) -> Option<(u16, u16)> {
    if position.is_out_of_bounds(grid) {
        return None;
    }

    let column = u16::try_from(position.x - 1).ok()?;
    let row = u16::try_from(position.y - 1).ok()?;

    let x = inner.x.saturating_add(column.saturating_mul(CELL_WIDTH));
    let y = inner.y.saturating_add(row);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use crate::config::GridSize;
    use crate::snake::Position;

    use super::{centered_board, logical_to_terminal, snake_color};

    const GRID: GridSize = GridSize {
        width: 30,
        height: 30,
    };

    #[test]
    fn web_color_names_map_to_terminal_colors() {
        assert_eq!(snake_color("purple"), Color::Magenta);
        assert_eq!(snake_color("Pink"), Color::LightMagenta);
        assert_eq!(snake_color("cyan"), Color::Cyan);
        assert_eq!(snake_color("no-such-color"), Color::White);
    }

    #[test]
    fn first_interior_cell_sits_at_the_inner_origin() {
        let inner = Rect::new(3, 2, 58, 29);

        assert_eq!(
            logical_to_terminal(inner, GRID, Position::new(1, 1)),
            Some((3, 2))
        );
        assert_eq!(
            logical_to_terminal(inner, GRID, Position::new(29, 29)),
            Some((59, 30))
        );
    }

    #[test]
    fn wall_cells_are_not_drawn() {
        let inner = Rect::new(0, 0, 58, 29);

        assert_eq!(logical_to_terminal(inner, GRID, Position::new(0, 4)), None);
        assert_eq!(logical_to_terminal(inner, GRID, Position::new(4, 30)), None);
    }

    #[test]
    fn cells_past_a_small_terminal_are_clipped() {
        let inner = Rect::new(0, 0, 10, 5);

        assert_eq!(logical_to_terminal(inner, GRID, Position::new(6, 1)), None);
        assert_eq!(logical_to_terminal(inner, GRID, Position::new(1, 6)), None);
        assert_eq!(
            logical_to_terminal(inner, GRID, Position::new(5, 5)),
            Some((8, 4))
        );
    }

    #[test]
    fn board_is_centered_in_a_large_area() {
        let board = centered_board(Rect::new(0, 0, 100, 40), GRID);

        assert_eq!(board, Rect::new(20, 4, 60, 31));
    }
}
