//! Time sources for the control loop
//!
//! The core never reads a clock on its own: the driver samples a
//! [`TimeSource`] once per tick and hands the timestamp down. This keeps the
//! tracker deterministic and lets tests script time exactly.
//!
//! - [`MonotonicClock`]: milliseconds since the clock was created (std only)
//! - [`ManualClock`]: fully controlled time for tests and simulation

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of time for the control loop
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Milliseconds between two timestamps, zero if `later` is behind `earlier`
#[inline]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

/// Monotonic clock backed by `std::time::Instant`
///
/// Starts at 0 when created, like `millis()` on a microcontroller.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Clock counting from now
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}

/// Manually driven clock for testing and simulation
#[derive(Debug, Clone)]
pub struct ManualClock {
    timestamp: Timestamp,
}

impl ManualClock {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`, backwards included
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        clock.set(200);
        assert_eq!(clock.now(), 200);
    }

    #[test]
    fn elapsed_never_underflows() {
        assert_eq!(elapsed_ms(100, 350), 250);
        assert_eq!(elapsed_ms(350, 100), 0);
        assert_eq!(elapsed_ms(7, 7), 0);
    }

    #[test]
    fn manual_clock_saturates() {
        let mut clock = ManualClock::new(u64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now(), u64::MAX);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
