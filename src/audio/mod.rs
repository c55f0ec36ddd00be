//! Sound cues for game events
//!
//! Playback is fire-and-forget: the game never waits on it and never learns
//! whether it worked.

pub mod cue;

pub use cue::{AudioCue, Cue, Silent, TerminalBell, play_quietly};
