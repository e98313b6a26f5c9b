//! Frame-driven timers
//!
//! Timers advance with the frame clock instead of wall-clock callbacks, so
//! cancelling an overlay's tick subscription also stops every timer it owns.

/// One-shot timer
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining: f32,
    fired: bool,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            fired: false,
        }
    }

    /// Advance; returns true on the single tick where the timer expires
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.fired = true;
            return true;
        }
        false
    }

    pub fn is_done(&self) -> bool {
        self.fired
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Upper bound on catch-up firings per tick
const MAX_FIRES_PER_TICK: u32 = 8;

/// Repeating timer
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: f32,
    accumulator: f32,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            accumulator: 0.0,
        }
    }

    /// Advance; returns how many periods elapsed during this tick
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut fires = 0;
        while self.accumulator >= self.period && fires < MAX_FIRES_PER_TICK {
            self.accumulator -= self.period;
            fires += 1;
        }
        if fires == MAX_FIRES_PER_TICK {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(self.period);
        }
        fires
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut t = Countdown::new(0.05);
        assert!(!t.tick(0.03));
        assert!(t.tick(0.03));
        assert!(t.is_done());
        assert!(!t.tick(0.03));
    }

    #[test]
    fn test_interval_counts_periods() {
        let mut t = Interval::new(0.05);
        assert_eq!(t.tick(0.016), 0);
        assert_eq!(t.tick(0.016), 0);
        assert_eq!(t.tick(0.02), 1);
        assert_eq!(t.tick(0.1), 2);
    }

    #[test]
    fn test_interval_caps_backlog() {
        let mut t = Interval::new(0.01);
        assert_eq!(t.tick(10.0), MAX_FIRES_PER_TICK);
        assert!(t.tick(0.0) <= 1);
    }
}
