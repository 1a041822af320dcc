//! Business-day durations between calendar dates.
//!
//! A duration counts the weekdays (Mon–Fri) in the half-open interval
//! `(start, end]`: the start date itself never counts, the end date counts
//! when it is a weekday. Same-day durations are therefore zero.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::domain::{LeadTimeError, Result};

/// Weekdays in `(start, end]`.
///
/// Returns [`LeadTimeError::InvalidDateRange`] when `start > end`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> Result<u32> {
    if start > end {
        return Err(LeadTimeError::InvalidDateRange { start, end });
    }

    let total_days = (end - start).num_days() as u64;
    let full_weeks = total_days / 7;
    let remainder = total_days % 7;

    let mut count = full_weeks * 5;
    // The remaining days are the last `remainder` days of the interval.
    let tail_start = start + Days::new(full_weeks * 7);
    for offset in 1..=remainder {
        let day = tail_start + Days::new(offset);
        if is_weekday(day) {
            count += 1;
        }
    }

    Ok(count as u32)
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
