//! Broken-down wall clock time for record timestamps.

use chrono::{Datelike, Timelike};

/// Largest year the four-digit field can hold.
pub const MAX_YEAR: u32 = 9999;

/// Calendar date and time of day, as rendered in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrokenDownTime {
    /// Year, rendered with four digits.
    pub year: u32,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
    /// Second, 0-60 (leap seconds are passed through).
    pub second: u32,
}

impl BrokenDownTime {
    /// Creates a timestamp from its components. The year is capped at
    /// [`MAX_YEAR`].
    pub const fn new(year: u32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year: if year > MAX_YEAR { MAX_YEAR } else { year },
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Current time: UTC when built with the `utc` feature, local time otherwise.
    #[inline]
    pub fn now() -> Self {
        #[cfg(feature = "utc")]
        let now = chrono::Utc::now();
        #[cfg(not(feature = "utc"))]
        let now = chrono::Local::now();
        Self::from_datetime(&now)
    }

    /// Extracts the rendered fields from any chrono date-time.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        Self {
            // The field holds four digits: years outside 0..=9999 are clamped.
            year: dt.year().clamp(0, MAX_YEAR as i32) as u32,
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    /// Returns true when timestamps are rendered in UTC.
    pub const fn is_utc() -> bool {
        cfg!(feature = "utc")
    }
}
