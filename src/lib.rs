//! Snake - a terminal Snake game with a persistent high score
//!
//! This library provides:
//! - Core game logic and the game state machine (game module)
//! - High score storage (persistence module)
//! - Sound cues (audio module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive loop (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
