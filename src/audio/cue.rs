use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::game::GameEvent;

/// Sounds the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Eat,
    Move,
    GameOver,
}

impl Cue {
    /// The cue a game event maps to, if any
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Eat => Some(Cue::Eat),
            GameEvent::Move => Some(Cue::Move),
            GameEvent::GameOver { .. } => Some(Cue::GameOver),
            _ => None,
        }
    }
}

pub trait AudioCue {
    fn play(&mut self, cue: Cue) -> Result<()>;
}

/// Play a cue, logging and dropping any failure
pub fn play_quietly(audio: &mut dyn AudioCue, cue: Cue) {
    if let Err(err) = audio.play(cue) {
        debug!(?cue, "Sound playback failed: {err:#}");
    }
}

/// Does nothing; used for `--mute`
#[derive(Debug, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell. Move cues are skipped, a bell every tick is noise.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioCue for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<()> {
        let bells: &[u8] = match cue {
            Cue::Move => return Ok(()),
            Cue::Eat => b"\x07",
            Cue::GameOver => b"\x07\x07",
        };
        self.out.write_all(bells).context("Failed to ring bell")?;
        self.out.flush().context("Failed to flush bell")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOverCause;
    use std::io;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(Cue::for_event(&GameEvent::Eat), Some(Cue::Eat));
        assert_eq!(Cue::for_event(&GameEvent::Move), Some(Cue::Move));
        assert_eq!(Cue::for_event(&GameEvent::Render), None);

        let game_over = GameEvent::GameOver {
            score: 0,
            high_score: 0,
            new_record: false,
            cause: GameOverCause::Wall,
        };
        assert_eq!(Cue::for_event(&game_over), Some(Cue::GameOver));
    }

    #[test]
    fn test_bell_output() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(Cue::Move).unwrap();
        bell.play(Cue::Eat).unwrap();
        bell.play(Cue::GameOver).unwrap();

        assert_eq!(bell.out, b"\x07\x07\x07");
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut bell = TerminalBell::new(ClosedPipe);
        assert!(bell.play(Cue::Eat).is_err());

        // Must not panic or propagate
        play_quietly(&mut bell, Cue::Eat);
    }
}
