//! Case countdown
//!
//! A polled clock. The session checks it on every tick instead of being
//! called back from another thread.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Countdown {
    limit: Duration,
    started_at: Option<Instant>,
    /// Remaining time captured by `stop`
    frozen: Option<Duration>,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            started_at: None,
            frozen: None,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Start the clock; a running clock is left alone
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.started_at.is_some() {
            return;
        }
        self.started_at = Some(now);
        self.frozen = None;
    }

    /// Stop the clock, keeping whatever time was left
    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, now: Instant) {
        if self.started_at.is_some() && self.frozen.is_none() {
            self.frozen = Some(self.remaining_at(now));
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        match self.started_at {
            Some(start) => self.limit.saturating_sub(now.saturating_duration_since(start)),
            None => self.limit,
        }
    }

    /// Time spent since the clock started
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.limit.saturating_sub(self.remaining_at(now))
    }

    pub fn is_running(&self) -> bool {
        self.is_running_at(Instant::now())
    }

    pub fn is_running_at(&self, now: Instant) -> bool {
        self.started_at.is_some() && self.frozen.is_none() && !self.remaining_at(now).is_zero()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.started_at.is_some() && self.remaining_at(now).is_zero()
    }
}

/// `MM:SS`, rounded down
pub fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
