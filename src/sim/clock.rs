//! Session countdown, one-second resolution
//!
//! Runs on elapsed real time rather than physics steps, so a slow frame
//! never stretches the round.

use std::time::Duration;

use super::timer::Interval;

const SECOND: Duration = Duration::from_secs(1);

/// What happened to the countdown during an advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// One second elapsed; seconds left after the tick
    Tick(u32),
    /// Reached zero; the clock stopped itself
    Expired,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    limit: u32,
    left: u32,
    ticker: Interval,
}

impl SessionClock {
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit: limit_secs,
            left: limit_secs,
            ticker: Interval::stopped(SECOND),
        }
    }

    pub fn time_left(&self) -> u32 {
        self.left
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Start counting down from the full limit
    pub fn start(&mut self) {
        self.left = self.limit;
        self.ticker.start();
    }

    pub fn stop(&mut self) {
        self.ticker.cancel();
    }

    /// Stop and refill
    pub fn reset(&mut self) {
        self.stop();
        self.left = self.limit;
    }

    /// Ticks produced by `elapsed`, in order, ending with `Expired` at zero
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ClockTick> {
        let mut ticks = Vec::new();
        for _ in 0..self.ticker.advance(elapsed) {
            self.left = self.left.saturating_sub(1);
            ticks.push(ClockTick::Tick(self.left));
            if self.left == 0 {
                self.ticker.cancel();
                ticks.push(ClockTick::Expired);
                break;
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_until_started() {
        let mut clock = SessionClock::new(60);
        assert!(clock.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(clock.time_left(), 60);
    }

    #[test]
    fn test_counts_down_and_expires_once() {
        let mut clock = SessionClock::new(3);
        clock.start();
        assert_eq!(clock.advance(Duration::from_millis(1500)), vec![ClockTick::Tick(2)]);
        assert_eq!(
            clock.advance(Duration::from_secs(5)),
            vec![ClockTick::Tick(1), ClockTick::Tick(0), ClockTick::Expired]
        );
        assert!(!clock.is_running());
        assert!(clock.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_stop_prevents_phantom_ticks() {
        let mut clock = SessionClock::new(60);
        clock.start();
        clock.advance(Duration::from_secs(2));
        clock.stop();
        assert!(clock.advance(Duration::from_secs(100)).is_empty());
        assert_eq!(clock.time_left(), 58);

        clock.reset();
        assert_eq!(clock.time_left(), 60);
        assert!(!clock.is_running());
    }
}
