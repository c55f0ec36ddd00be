use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, trace, warn};

use super::timer::TickTimer;
use crate::audio::{AudioCue, Cue, play_quietly};
use crate::game::{GameConfig, GameEvent, GameState, GameStateMachine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Interactive play in the terminal
pub struct HumanMode {
    game: GameStateMachine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: Box<dyn AudioCue>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(
        config: GameConfig,
        store: Box<dyn HighScoreStore>,
        audio: Box<dyn AudioCue>,
    ) -> Self {
        Self {
            game: GameStateMachine::new(config, store),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            audio,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks only while playing; the period follows the game's speed
        let mut tick_timer = TickTimer::new(self.game.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    self.handle_input(maybe_event, &mut tick_timer);
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    let events = self.game.tick();
                    self.dispatch(events, &mut tick_timer);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.game, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(games = self.metrics.games_played, best = self.game.high_score(), "Quitting");
        Ok(())
    }

    fn handle_input(&mut self, maybe_event: Option<io::Result<Event>>, timer: &mut TickTimer) {
        match maybe_event {
            Some(Ok(event)) => self.handle_event(event, timer),
            Some(Err(err)) => warn!("Terminal event error: {err}"),
            // Input closed, nothing can reach the game any more
            None => self.should_quit = true,
        }
    }

    fn handle_event(&mut self, event: Event, timer: &mut TickTimer) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let events = match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                self.game.handle_direction_input(direction);
                Vec::new()
            }
            KeyAction::TogglePause => self.game.toggle_pause(),
            KeyAction::Start => self.new_game(|game| game.start()),
            KeyAction::Restart => self.new_game(|game| game.restart()),
            KeyAction::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            KeyAction::None => Vec::new(),
        };

        self.dispatch(events, timer);
    }

    fn new_game(
        &mut self,
        begin: impl FnOnce(&mut GameStateMachine) -> Vec<GameEvent>,
    ) -> Vec<GameEvent> {
        let events = begin(&mut self.game);
        if !events.is_empty() {
            self.metrics.on_game_start();
        }
        events
    }

    /// Hand game events to the timer, the score display and the speaker
    fn dispatch(&mut self, events: Vec<GameEvent>, timer: &mut TickTimer) {
        for event in events {
            if let Some(cue) = Cue::for_event(&event) {
                play_quietly(self.audio.as_mut(), cue);
            }

            match event {
                GameEvent::StateChanged(GameState::Playing) => {
                    timer.start(self.game.tick_interval());
                    self.metrics.on_resume();
                }
                GameEvent::StateChanged(GameState::Paused) => {
                    timer.stop();
                    self.metrics.on_pause();
                }
                GameEvent::StateChanged(_) => timer.stop(),
                GameEvent::SpeedChanged(period) => timer.reschedule(period),
                GameEvent::ScoreChanged { .. } => self.metrics.on_score_changed(),
                GameEvent::GameOver { score, .. } => {
                    self.metrics.on_game_over();
                    trace!(score, "Recorded finished game");
                }
                GameEvent::Eat | GameEvent::Move | GameEvent::Render => {}
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
