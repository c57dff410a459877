use std::time::Duration;

/// Fixed simulation step (60 Hz).
pub(crate) const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Monotonic simulation clock. Every timer in the world reads time from here,
/// so pausing the game is just "stop advancing".
#[derive(Clone, Debug, Default)]
pub(crate) struct Clock {
    now: Duration,
    paused: bool,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        if !self.paused {
            self.now += dt;
        }
    }

    pub(crate) fn pause(&mut self) {
        self.paused = true;
    }

    pub(crate) fn resume(&mut self) {
        self.paused = false;
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Countdown measured against a [`Clock`] reading.
///
/// A timer that was never started reports itself as elapsed, which lets
/// cooldowns begin in the "ready" position.
#[derive(Clone, Debug)]
pub(crate) struct Timer {
    duration: Duration,
    started_at: Option<Duration>,
    /// Elapsed time frozen by `stop`.
    frozen: Option<Duration>,
}

impl Timer {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
            frozen: None,
        }
    }

    pub(crate) fn start(&mut self, now: Duration) {
        self.started_at = Some(now);
        self.frozen = None;
    }

    pub(crate) fn stop(&mut self, now: Duration) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed(now));
        }
    }

    pub(crate) fn resume(&mut self, now: Duration) {
        if let Some(elapsed) = self.frozen.take() {
            self.started_at = Some(now.saturating_sub(elapsed));
        }
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub(crate) fn elapsed(&self, now: Duration) -> Duration {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        match self.started_at {
            Some(start) => now.saturating_sub(start),
            None => self.duration,
        }
    }

    pub(crate) fn is_end(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.duration
    }
}
