use std::time::{Duration, Instant};

/// How long the score stays highlighted after it changes
pub const SCORE_FLASH: Duration = Duration::from_millis(500);

/// Session bookkeeping for the score display: play time, games played and
/// the score highlight
pub struct GameMetrics {
    /// Play time banked before the last pause
    banked: Duration,
    /// Set while the clock runs
    running_since: Option<Instant>,
    pub elapsed_time: Duration,
    pub games_played: u32,
    flash_until: Option<Instant>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            banked: Duration::ZERO,
            running_since: None,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            flash_until: None,
        }
    }

    pub fn update(&mut self) {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        self.elapsed_time = self.banked + running;
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.running_since = Some(Instant::now());
        self.flash_until = None;
    }

    pub fn on_pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked += since.elapsed();
        }
        self.update();
    }

    pub fn on_resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self) {
        self.on_pause();
        self.games_played += 1;
    }

    pub fn on_score_changed(&mut self) {
        self.flash_until = Some(Instant::now() + SCORE_FLASH);
    }

    pub fn score_flashing(&self) -> bool {
        self.flash_until
            .is_some_and(|until| Instant::now() < until)
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
