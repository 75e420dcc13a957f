use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::{SnakeView, Snapshot};
use crate::renderer::snake_color;
use crate::ui::player_label;

const HUD_MARGIN_X: u16 = 1;

/// Renders the one-line status bar and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let status_area = inset_horizontal(status_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(status_line(snapshot))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    play_area
}

fn status_line(snapshot: &Snapshot) -> Line<'static> {
    let mut spans = vec![
        Span::raw("Tick "),
        Span::styled(
            snapshot.tick.to_string(),
            Style::default().fg(Color::White),
        ),
    ];

    for (index, snake) in snapshot.snakes.iter().enumerate() {
        spans.push(Span::raw("  "));
        spans.extend(snake_spans(index, snake));
    }

    Line::from(spans)
}

fn snake_spans(index: usize, snake: &SnakeView) -> [Span<'static>; 3] {
    [
        Span::styled(
            player_label(index),
            Style::default()
                .fg(snake_color(&snake.color))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" length "),
        Span::styled(
            snake.body.len().to_string(),
            Style::default().fg(Color::White),
        ),
    ]
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let total_margin = margin.saturating_mul(2);
    Rect {
        x: area.x.saturating_add(margin),
        y: area.y,
        width: area.width.saturating_sub(total_margin),
        height: area.height,
    }
}
