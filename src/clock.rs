use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source driving hold sessions.
/// Implementations: SystemClock (production), ManualClock (testing).
pub trait Clock {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// System clock backed by std::time::Instant.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Manually advanced clock for deterministic tests.
pub struct ManualClock {
    current: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Cell::new(Duration::ZERO),
        }
    }

    pub fn set(&self, to: Duration) {
        self.current.set(to);
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn manual_clock_advance_accumulates() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(100));
        assert_eq!(clock.now(), Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(150));
    }

    #[test]
    fn manual_clock_set_overrides() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_secs(5));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
