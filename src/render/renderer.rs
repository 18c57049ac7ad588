use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::game::{GameStatus, Position, RenderFrame, Renderer};
use crate::metrics::GameMetrics;
use crate::scores::HighScoreEntry;

/// Draws frames into a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    metrics: GameMetrics,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            metrics: GameMetrics::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, view: &RenderFrame<'_>) {
        self.metrics.observe(view.status, view.score);
        let metrics = &self.metrics;
        if let Err(err) = self.terminal.draw(|frame| draw(frame, view, metrics)) {
            tracing::warn!(error = %err, "failed to draw frame");
        }
    }
}

fn draw(frame: &mut Frame, view: &RenderFrame<'_>, metrics: &GameMetrics) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    frame.render_widget(render_stats(view, metrics), chunks[0]);

    let body = match view.status {
        GameStatus::Idle => render_menu(view),
        GameStatus::Playing | GameStatus::Paused => render_grid(view),
        GameStatus::GameOver => render_game_over(view),
    };
    frame.render_widget(body, chunks[1]);

    frame.render_widget(render_controls(view.status), chunks[2]);
}

fn render_grid(view: &RenderFrame<'_>) -> Paragraph<'static> {
    let head = view.snake.first().copied();
    let body: HashSet<Position> = view.snake.iter().skip(1).copied().collect();
    let mut lines = Vec::with_capacity(view.grid_height);

    for y in 0..view.grid_height {
        let mut spans = Vec::with_capacity(view.grid_width);

        for x in 0..view.grid_width {
            let pos = Position::new(x as i32, y as i32);

            let cell = if Some(pos) == head {
                Span::styled(
                    "■ ",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else if body.contains(&pos) {
                Span::styled("□ ", Style::default().fg(Color::Green))
            } else if pos == view.food {
                Span::styled(
                    "O ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else if Some(pos) == view.bonus {
                Span::styled(
                    "$ ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(". ", Style::default().fg(Color::DarkGray))
            };

            spans.push(cell);
        }

        lines.push(Line::from(spans));
    }

    let (title, border) = if view.status == GameStatus::Paused {
        (" PAUSED ", Color::Yellow)
    } else {
        (" Snake ", Color::White)
    };

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(title),
        )
        .alignment(Alignment::Center)
}

fn render_stats(view: &RenderFrame<'_>, metrics: &GameMetrics) -> Paragraph<'static> {
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
    let value = |text: String| {
        Span::styled(
            text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };

    let text = vec![Line::from(vec![
        label("Score: "),
        value(view.score.to_string()),
        Span::raw("    "),
        label("Level: "),
        value(view.level.to_string()),
        Span::raw("    "),
        label("Lives: "),
        value(view.lives.to_string()),
        Span::raw("    "),
        label("Time: "),
        Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
    ])];

    Paragraph::new(text).alignment(Alignment::Center)
}

fn render_menu(view: &RenderFrame<'_>) -> Paragraph<'static> {
    let mut text = vec![
        Line::from(Span::styled(
            "SNAKE ARCADE",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ];
    text.extend(high_score_lines(view.high_scores));

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    )
}

fn render_game_over(view: &RenderFrame<'_>) -> Paragraph<'static> {
    let mut text = vec![
        Line::from(vec![Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(view.level.to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];
    text.extend(high_score_lines(view.high_scores));
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            "R",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
        Span::styled(
            "Esc",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" for the menu", Style::default().fg(Color::Gray)),
    ]));

    Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
}

fn high_score_lines(scores: &[HighScoreEntry]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "HIGH SCORES",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    if scores.is_empty() {
        lines.push(Line::from(Span::styled(
            "No high scores yet!",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    lines.extend(scores.iter().enumerate().map(|(rank, entry)| {
        Line::from(format!(
            "#{:<2} {:<12} {:>6}  L{:<2} {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.date
        ))
    }));
    lines
}

fn render_controls(status: GameStatus) -> Paragraph<'static> {
    let key = |text: &'static str, color| Span::styled(text, Style::default().fg(color));

    let spans = match status {
        GameStatus::Idle => vec![
            key("Enter", Color::Green),
            Span::raw(" start | "),
            key("1/2/3", Color::Cyan),
            Span::raw(" difficulty | "),
            key("Q", Color::Red),
            Span::raw(" quit"),
        ],
        _ => vec![
            key("↑↓←→", Color::Cyan),
            Span::raw(" or "),
            key("WASD", Color::Cyan),
            Span::raw(" move | "),
            key("Space", Color::Cyan),
            Span::raw(" pause | "),
            key("Esc", Color::Cyan),
            Span::raw(" menu | "),
            key("Q", Color::Red),
            Span::raw(" quit"),
        ],
    };

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}
