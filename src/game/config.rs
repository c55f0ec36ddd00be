use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;

/// Largest board edge accepted; beyond this the board no longer fits a terminal
pub const MAX_GRID_SIZE: usize = 200;

/// Invalid game configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("grid size must be at most {MAX_GRID_SIZE}, got {0}")]
    GridTooLarge(usize),
    #[error("tick intervals must be positive")]
    ZeroInterval,
    #[error("minimum tick ({min_ms}ms) exceeds initial tick ({initial_ms}ms)")]
    FloorAboveInitial { min_ms: u64, initial_ms: u64 },
    #[error("points per food must be positive")]
    ZeroPoints,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square board
    pub grid_size: usize,
    /// Tick interval at the start of a game, in milliseconds
    pub initial_tick_ms: u64,
    /// How much faster each meal makes the game, in milliseconds
    pub tick_step_ms: u64,
    /// Fastest tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// Score awarded per food eaten
    pub points_per_food: u32,
    /// Heading of a freshly started snake
    pub start_direction: Direction,
    /// Seed for food placement; random when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_tick_ms: 150,
            tick_step_ms: 2,
            min_tick_ms: 80,
            points_per_food: 10,
            start_direction: Direction::Right,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).with_context(|| format!("Invalid config in {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        if self.initial_tick_ms == 0 || self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::FloorAboveInitial {
                min_ms: self.min_tick_ms,
                initial_ms: self.initial_tick_ms,
            });
        }
        if self.points_per_food == 0 {
            return Err(ConfigError::ZeroPoints);
        }
        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn tick_step(&self) -> Duration {
        Duration::from_millis(self.tick_step_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }
}
