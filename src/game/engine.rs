use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{
    action::Direction,
    config::GameConfig,
    food::FoodSpawner,
    grid::Grid,
    state::{GameState, Position, Snake},
};
use crate::persistence::HighScoreStore;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// The snake covers every cell, nothing left to eat
    BoardFilled,
}

/// Signals emitted for the collaborators around the core (renderer, audio,
/// score display, tick timer)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Snake ate food this tick
    Eat,
    /// Snake moved without eating
    Move,
    /// A tick finished and the game is still running
    Render,
    ScoreChanged {
        score: u32,
        high_score: u32,
    },
    /// The tick period changed; running timers must be rescheduled
    SpeedChanged(Duration),
    StateChanged(GameState),
    GameOver {
        score: u32,
        high_score: u32,
        new_record: bool,
        cause: GameOverCause,
    },
}

/// Owns one game: the snake, the food, score and speed, and the
/// Ready/Playing/Paused/GameOver lifecycle.
///
/// Every operation returns the events it produced; nothing here performs I/O
/// except the injected high score store.
pub struct GameStateMachine {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Option<Position>,
    state: GameState,
    score: u32,
    high_score: u32,
    tick_interval: Duration,
    pending_direction: Option<Direction>,
    spawner: FoodSpawner,
    store: Box<dyn HighScoreStore>,
}

impl GameStateMachine {
    /// Create a game in the Ready state, loading the high score from `store`
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Self {
        let grid = Grid::new(config.grid_size);
        let spawner = match config.rng_seed {
            Some(seed) => FoodSpawner::with_seed(grid, seed),
            None => FoodSpawner::new(grid),
        };

        let high_score = store.load().unwrap_or_else(|err| {
            warn!("Could not load high score, starting from 0: {err:#}");
            0
        });

        let snake = Snake::new(grid.center(), config.start_direction, 1);
        let mut machine = Self {
            tick_interval: config.initial_tick(),
            config,
            grid,
            snake,
            food: None,
            state: GameState::Ready,
            score: 0,
            high_score,
            pending_direction: None,
            spawner,
            store,
        };
        machine.reset_round();
        machine
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Ready -> Playing, or GameOver -> Playing with a fresh game.
    /// No-op while Playing or Paused.
    pub fn start(&mut self) -> Vec<GameEvent> {
        match self.state {
            GameState::Ready => {
                self.snake.set_direction(self.config.start_direction);
                self.transition(GameState::Playing)
            }
            GameState::GameOver => self.restart(),
            GameState::Playing | GameState::Paused => Vec::new(),
        }
    }

    /// Throw away the current game, whatever its state, and play a new one.
    /// An abandoned game does not count towards the high score.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.reset_round();
        let mut events = vec![
            GameEvent::ScoreChanged {
                score: self.score,
                high_score: self.high_score,
            },
            GameEvent::SpeedChanged(self.tick_interval),
        ];
        events.extend(self.transition(GameState::Playing));
        events
    }

    pub fn pause(&mut self) -> Vec<GameEvent> {
        if self.state != GameState::Playing {
            return Vec::new();
        }
        self.transition(GameState::Paused)
    }

    pub fn resume(&mut self) -> Vec<GameEvent> {
        if self.state != GameState::Paused {
            return Vec::new();
        }
        self.transition(GameState::Playing)
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        match self.state {
            GameState::Playing => self.pause(),
            GameState::Paused => self.resume(),
            _ => Vec::new(),
        }
    }

    /// Queue a turn for the next tick. Only the latest request before a tick
    /// counts, and only while Playing.
    pub fn handle_direction_input(&mut self, direction: Direction) {
        if self.state == GameState::Playing {
            self.pending_direction = Some(direction);
        }
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.state != GameState::Playing {
            return Vec::new();
        }

        let mut events = Vec::new();

        if let Some(direction) = self.pending_direction.take()
            && !self.snake.set_direction(direction)
        {
            trace!(?direction, "Ignored reversal");
        }

        // Bounds are checked before the body is touched
        let new_head = self.snake.next_head();
        if !self.grid.in_bounds(new_head) {
            self.finish(GameOverCause::Wall, &mut events);
            return events;
        }

        self.snake.advance();
        if self.food == Some(new_head) {
            self.score += self.config.points_per_food;
            self.food = self.spawner.spawn(&self.snake.occupied());
            self.snake.grow();
            events.push(GameEvent::Eat);
            events.push(GameEvent::ScoreChanged {
                score: self.score,
                high_score: self.high_score,
            });
            if self.speed_up() {
                events.push(GameEvent::SpeedChanged(self.tick_interval));
            }
            debug!(score = self.score, length = self.snake.len(), "Ate food");
        } else {
            self.snake.shrink();
            events.push(GameEvent::Move);
        }

        if self.snake.collides_with_self() {
            self.finish(GameOverCause::SelfCollision, &mut events);
            return events;
        }

        if self.food.is_none() {
            self.finish(GameOverCause::BoardFilled, &mut events);
            return events;
        }

        trace!(head = ?new_head, "Tick");
        events.push(GameEvent::Render);
        events
    }

    /// Put the board into a known position
    #[cfg(test)]
    pub(crate) fn place(&mut self, snake: Snake, food: Option<Position>) {
        self.snake = snake;
        self.food = food;
    }

    /// Shorten the tick interval by one step, never below the floor.
    /// Returns whether it changed.
    fn speed_up(&mut self) -> bool {
        let next = self
            .tick_interval
            .saturating_sub(self.config.tick_step())
            .max(self.config.min_tick());
        let changed = next != self.tick_interval;
        self.tick_interval = next;
        changed
    }

    fn reset_round(&mut self) {
        self.snake = Snake::new(self.grid.center(), self.config.start_direction, 1);
        self.food = self.spawner.spawn(&self.snake.occupied());
        self.score = 0;
        self.tick_interval = self.config.initial_tick();
        self.pending_direction = None;
    }

    fn transition(&mut self, next: GameState) -> Vec<GameEvent> {
        info!(from = self.state.as_str(), to = next.as_str(), "State change");
        self.state = next;
        vec![GameEvent::StateChanged(next)]
    }

    fn finish(&mut self, cause: GameOverCause, events: &mut Vec<GameEvent>) {
        self.pending_direction = None;

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
            if let Err(err) = self.store.save(self.high_score) {
                warn!("Could not save high score {}: {err:#}", self.high_score);
            }
            events.push(GameEvent::ScoreChanged {
                score: self.score,
                high_score: self.high_score,
            });
        }

        info!(?cause, score = self.score, new_record, "Game over");
        events.extend(self.transition(GameState::GameOver));
        events.push(GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record,
            cause,
        });
    }
}
