//! Cancellable scheduled tasks driven by host-supplied elapsed time
//!
//! Nothing here reads a wall clock. The session forwards the time that
//! passed since the previous frame and the tasks report whether they fired.
//! A canceled or finished task never fires again.

use std::time::Duration;

/// One-shot task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeout {
    remaining: Option<Duration>,
}

impl Timeout {
    pub fn new(delay: Duration) -> Self {
        Self {
            remaining: Some(delay),
        }
    }

    /// An already-canceled timeout
    pub fn idle() -> Self {
        Self { remaining: None }
    }

    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Returns true exactly once, on the advance that reaches the deadline
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        match self.remaining {
            Some(left) if elapsed >= left => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - elapsed);
                false
            }
            None => false,
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::idle()
    }
}

/// Repeating task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    until_next: Duration,
    running: bool,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            until_next: period,
            running: true,
        }
    }

    pub fn stopped(period: Duration) -> Self {
        Self {
            running: false,
            ..Self::new(period)
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restart from a full period
    pub fn start(&mut self) {
        self.until_next = self.period;
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Number of periods completed during `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running || self.period.is_zero() {
            return 0;
        }
        if elapsed < self.until_next {
            self.until_next -= elapsed;
            return 0;
        }
        let overshoot = elapsed - self.until_next;
        let extra = (overshoot.as_nanos() / self.period.as_nanos()) as u32;
        let carried = overshoot.as_nanos() % self.period.as_nanos();
        self.until_next = self.period - Duration::from_nanos(carried as u64);
        1 + extra
    }
}
