//! Time sources
//!
//! Audit stamps and application dates are taken from an injected [`Clock`]
//! rather than the system clock directly, so tests control time
//! deterministically. All timestamps are UTC.

use chrono::{DateTime, NaiveDate, Utc};

/// UTC timestamp source
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a controllable instant, for tests
#[cfg(any(test, feature = "mock"))]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(any(test, feature = "mock"))]
impl FixedClock {
    /// Creates a clock frozen at the given instant
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(std::sync::Mutex::new(instant))
    }

    /// Moves the clock forward
    pub fn advance(&self, duration: chrono::Duration) {
        let mut instant = self.0.lock().unwrap();
        *instant += duration;
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
