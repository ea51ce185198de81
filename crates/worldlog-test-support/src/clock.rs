//! Test clock — deterministic `Clock` implementation for tests.

use chrono::{DateTime, TimeDelta, Utc};
use worldlog_core::clock::Clock;

/// Seconds from the Unix epoch to 2026-01-15T10:00:00Z.
const DEFAULT_INSTANT_SECS: i64 = 1_768_471_200;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// The timestamp shared by most tests: 2026-01-15T10:00:00Z.
    #[must_use]
    pub fn default_instant() -> Self {
        Self(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(DEFAULT_INSTANT_SECS))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_default_instant_is_mid_january_2026() {
        assert_eq!(
            FixedClock::default_instant().now(),
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
        );
    }
}
