use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::{Casualty, DeathReason, Snapshot};
use crate::ui::player_label;

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let popup = centered_popup(area, 60, 40);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];
    lines.extend(
        snapshot
            .casualties
            .iter()
            .map(|casualty| Line::from(casualty_text(*casualty))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Survived {} ticks", snapshot.tick)));
    lines.push(Line::from(""));
    lines.push(Line::from("[Enter]/[Esc] Exit"));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// Describes one casualty, e.g. `P2 ran into P1`.
#[must_use]
pub fn casualty_text(casualty: Casualty) -> String {
    let player = player_label(casualty.snake);
    match casualty.reason {
        DeathReason::Wall => format!("{player} hit the wall"),
        DeathReason::SelfCollision => format!("{player} hit itself"),
        DeathReason::Snake { other } => format!("{player} ran into {}", player_label(other)),
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
