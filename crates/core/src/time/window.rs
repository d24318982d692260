use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Lower bound (`from_date`, unix seconds) of the next status query.
///
/// Recomputed from "now" on every cycle, so each cycle rescans the same
/// trailing window regardless of what earlier cycles saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollWindow(i64);

impl PollWindow {
    pub fn ending_at(now: DateTime<Utc>, lookback: Duration) -> Self {
        let lookback = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
        Self(now.timestamp().saturating_sub(lookback).max(0))
    }

    pub fn from_date(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PollWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn subtracts_lookback_from_now() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let w = PollWindow::ending_at(now, Duration::from_secs(30 * 24 * 3600));
        let expected = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(w.from_date(), expected.timestamp());
    }

    #[test]
    fn same_now_gives_same_window() {
        // Nothing is carried between cycles.
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let a = PollWindow::ending_at(now, Duration::from_secs(60));
        let b = PollWindow::ending_at(now, Duration::from_secs(60));
        assert_eq!(a, b);
    }

    #[test]
    fn never_negative() {
        let now = Utc.with_ymd_and_hms(1970, 1, 1, 0, 1, 0).unwrap();
        let w = PollWindow::ending_at(now, Duration::from_secs(3600));
        assert_eq!(w.from_date(), 0);
        assert_eq!(w.to_string(), "0");
    }
}
