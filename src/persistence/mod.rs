//! High score storage
//!
//! The game only ever persists a single number. Where it lives is up to the
//! [`HighScoreStore`] handed to the state machine.

pub mod high_score;

pub use high_score::{HighScoreRecord, HighScoreStore, JsonFileStore, MemoryStore};
