//! Wall-clock access and timestamp formatting.
//!
//! The cleaning pipeline stamps every record with the processing time. The
//! clock is injected through [`Clock`] so tests can pin it with
//! [`FixedClock`] while production runs use [`SystemClock`].

use chrono::{Local, NaiveDateTime};

/// Default textual timestamp layout (`2024-01-31 12:00:00`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Current local date-time (no zone attached).
    fn now(&self) -> NaiveDateTime;
}

/// Local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Render `dt` with a `strftime`-style format string.
pub fn format_timestamp(dt: NaiveDateTime, fmt: &str) -> String {
    dt.format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(12, 5, 9)
            .unwrap()
    }

    #[test]
    fn fixed_clock_never_moves() {
        let clock = FixedClock(noon());
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn default_format() {
        assert_eq!(
            format_timestamp(noon(), DEFAULT_TIMESTAMP_FORMAT),
            "2024-01-31 12:05:09"
        );
    }

    #[test]
    fn custom_format() {
        assert_eq!(format_timestamp(noon(), "%Y%m%dT%H%M"), "20240131T1205");
    }
}
