//! Billing periods.
//!
//! The API only speaks in calendar months: `"07-2025"` becomes
//! `2025-07-01T00:00:00Z` and no day component is ever accepted.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid date format, expected MM-YYYY")]
    Format,
    #[error("invalid month, should be between [1-12]")]
    Month,
    #[error("invalid year")]
    Year,
}

/// Parse `MM-YYYY` into the first instant of that month in UTC.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use service::subscription::period::{parse_period, PeriodError};
///
/// assert_eq!(parse_period("07-2025"), Ok(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()));
/// assert_eq!(parse_period("13-2025"), Err(PeriodError::Month));
/// assert_eq!(parse_period("01-07-2025"), Err(PeriodError::Format));
/// ```
pub fn parse_period(s: &str) -> Result<DateTime<Utc>, PeriodError> {
    let mut parts = s.split('-');
    let (Some(mm), Some(yyyy), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PeriodError::Format);
    };

    let month = mm.parse::<i64>().map_err(|_| PeriodError::Month)?;
    if !(1..=12).contains(&month) {
        return Err(PeriodError::Month);
    }

    let year = yyyy.parse::<i64>().map_err(|_| PeriodError::Year)?;
    if year < 1 {
        return Err(PeriodError::Year);
    }
    let year = i32::try_from(year).map_err(|_| PeriodError::Year)?;

    // years past the calendar's range have no representation
    Utc.with_ymd_and_hms(year, month as u32, 1, 0, 0, 0)
        .single()
        .ok_or(PeriodError::Year)
}
