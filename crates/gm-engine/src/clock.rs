//! Time as seen by the engine.
//!
//! The engine never reads a clock itself. Drivers pick a [`Clock`] and pass
//! its [`Timestamp`] into every operation: [`SystemClock`] for real-time play,
//! [`ManualClock`] for scripted replays and tests.

use std::fmt;
use std::ops::Add;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Milliseconds elapsed since the start of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The start of the run.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The timestamp in milliseconds.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1000, self.0 % 1000)
    }
}

/// A source of timestamps.
pub trait Clock {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time since construction, optionally sped up.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    speed: f64,
}

impl SystemClock {
    /// Start a clock at zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            speed: 1.0,
        }
    }

    /// Scale elapsed time by `speed` (2.0 runs twice as fast). Values that
    /// are not finite and positive are ignored.
    pub fn with_speed(mut self, speed: f64) -> Self {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        }
        self
    }

    /// Real time until the clock reads `at`. Saturates at [`Duration::MAX`]
    /// when the clock runs slow enough to overflow.
    pub fn until(&self, at: Timestamp) -> Duration {
        let remaining = at.saturating_since(self.now());
        Duration::try_from_secs_f64(remaining.as_secs_f64() / self.speed)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let scaled = self.origin.elapsed().as_secs_f64() * self.speed * 1000.0;
        Timestamp(scaled as u64)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Timestamp,
}

impl ManualClock {
    /// Start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward by `by`. Returns the new time.
    pub fn advance(&mut self, by: Duration) -> Timestamp {
        self.now = self.now + by;
        self.now
    }

    /// Jump to `at` if it is later than the current time.
    pub fn set(&mut self, at: Timestamp) {
        self.now = self.now.max(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp::from_millis(1500) + Duration::from_millis(250);
        assert_eq!(t.as_millis(), 1750);
        assert_eq!(
            t.saturating_since(Timestamp::from_millis(750)),
            Duration::from_secs(1)
        );
        assert_eq!(t.saturating_since(Timestamp::from_millis(9000)), Duration::ZERO);
    }

    #[test]
    fn timestamp_display() {
        assert_eq!(Timestamp::from_millis(4500).to_string(), "4.500s");
        assert_eq!(Timestamp::ZERO.to_string(), "0.000s");
    }

    #[test]
    fn manual_clock_moves_forward_only() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.advance(Duration::from_millis(400)).as_millis(), 400);
        clock.set(Timestamp::from_millis(100));
        assert_eq!(clock.now().as_millis(), 400);
        clock.set(Timestamp::from_millis(1000));
        assert_eq!(clock.now().as_millis(), 1000);
    }

    #[test]
    fn system_clock_ignores_bad_speed() {
        let clock = SystemClock::new().with_speed(0.0);
        assert!((clock.speed - 1.0).abs() < f64::EPSILON);
        let fast = SystemClock::new().with_speed(4.0);
        assert!(fast.until(Timestamp::from_millis(4000)) <= Duration::from_secs(1));
        let nan = SystemClock::new().with_speed(f64::NAN);
        assert!((nan.speed - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn slow_clock_saturates_wait() {
        let crawl = SystemClock::new().with_speed(1e-300);
        assert_eq!(crawl.until(Timestamp::from_millis(500)), Duration::MAX);
        assert_eq!(crawl.until(Timestamp::ZERO), Duration::ZERO);
    }
}
