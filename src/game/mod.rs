//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The only outside collaborator is the high score store injected into
//! [`GameStateMachine`].

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig, MAX_GRID_SIZE};
pub use engine::{GameEvent, GameOverCause, GameStateMachine};
pub use food::FoodSpawner;
pub use grid::Grid;
pub use state::{GameState, Position, Snake};
