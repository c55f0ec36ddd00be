use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, GameStateMachine, Position};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, game: &GameStateMachine, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(game, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match game.state() {
            GameState::Playing => {
                frame.render_widget(self.render_grid(game, " Snake "), game_area);
            }
            GameState::Paused => {
                frame.render_widget(self.render_grid(game, " Paused "), game_area);
            }
            GameState::Ready => {
                frame.render_widget(self.render_ready(), game_area);
            }
            GameState::GameOver => {
                frame.render_widget(self.render_game_over(game), game_area);
            }
        }

        let controls = self.render_controls(game.state());
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, game: &GameStateMachine, title: &'static str) -> Paragraph<'_> {
        let snake = game.snake();
        let head = snake.head();
        let occupied = snake.occupied();
        let food = game.food();
        let size = game.grid().size() as i32;

        let mut lines = Vec::with_capacity(size as usize);
        for y in 0..size {
            let mut spans = Vec::with_capacity(size as usize);

            for x in 0..size {
                let pos = Position::new(x, y);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if occupied.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(pos) == food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let border = if game.state() == GameState::Paused {
            Color::Yellow
        } else {
            Color::White
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

    fn render_stats(&self, game: &GameStateMachine, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut score_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if metrics.score_flashing() {
            score_style = score_style.fg(Color::Black).bg(Color::Yellow);
        }

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(game.score().to_string(), score_style),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(game.high_score().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", game.tick_interval().as_millis()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_ready(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
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
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, game: &GameStateMachine) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    game.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if game.score() > 0 && game.score() == game.high_score() {
            text.push(Line::from(vec![Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: GameState) -> Paragraph<'_> {
        let pause_hint = if state == GameState::Paused {
            " to resume | "
        } else {
            " to pause | "
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(pause_hint),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use crate::persistence::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(game: &GameStateMachine) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        let metrics = GameMetrics::new();
        terminal
            .draw(|frame| Renderer::new().render(frame, game, &metrics))
            .unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_ready_screen() {
        let game = GameStateMachine::new(GameConfig::new(10), Box::new(MemoryStore::new(70)));
        let screen = draw(&game);

        assert!(screen.contains("to start"));
        assert!(screen.contains("Best: 70"));
        assert!(screen.contains("150ms"));
    }

    #[test]
    fn test_board_shows_snake_and_food() {
        let mut game = GameStateMachine::new(GameConfig::new(10), Box::new(MemoryStore::default()));
        game.start();
        let screen = draw(&game);

        assert!(screen.contains("Snake"));
        assert!(screen.contains('■'));
        assert!(screen.contains('●'));
    }

    #[test]
    fn test_paused_title() {
        let mut game = GameStateMachine::new(GameConfig::new(10), Box::new(MemoryStore::default()));
        game.start();
        game.pause();

        let screen = draw(&game);
        assert!(screen.contains("Paused"));
        assert!(screen.contains("Space to resume"));
    }
}
