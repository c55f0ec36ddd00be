use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Drives game ticks. The underlying interval is dropped and rebuilt on
/// every period change, so a new period only affects ticks not yet due.
pub struct TickTimer {
    interval: Option<Interval>,
    period: Duration,
}

impl TickTimer {
    /// A timer that is not running
    pub fn new(period: Duration) -> Self {
        Self {
            interval: None,
            period,
        }
    }

    /// (Re)start ticking; the first tick is one full period away
    pub fn start(&mut self, period: Duration) {
        self.period = period;
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Change the period. A stopped timer stays stopped and uses the new
    /// period when it is next started.
    pub fn reschedule(&mut self, period: Duration) {
        if self.is_running() {
            self.start(period);
        } else {
            self.period = period;
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next tick. Never completes while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}
