//! Calendar date arithmetic for billing periods
//!
//! Billing dates in the strata system are plain `YYYY-MM-DD` calendar dates
//! with no time or timezone component. This module provides the month
//! arithmetic used by period generation, with day-of-month clamping so that
//! adding months to 31 January never produces an invalid date.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to calendar operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid range: start {start} must be before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Returns the last day of the given month (handles leap years)
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // The day before the first of the next month.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Adds a number of calendar months to a date, clamping the day of month
///
/// `2026-01-31 + 1 month` is `2026-02-28`, not an invalid 31 February.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("clamped day is always valid for its month")
}

/// Returns the date in `date`'s month with the given day, clamped to the
/// month's last day
///
/// Used for due-date anchoring: a due day of 31 in April resolves to 30 April.
pub fn clamp_day_of_month(date: NaiveDate, day: u32) -> NaiveDate {
    let clamped = day.min(last_day_of_month(date.year(), date.month())).max(1);
    NaiveDate::from_ymd_opt(date.year(), date.month(), clamped)
        .expect("clamped day is always valid for its month")
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if this range shares any date with another
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2026, 1), 31);
        assert_eq!(last_day_of_month(2026, 4), 30);
        assert_eq!(last_day_of_month(2026, 2), 28);
        assert_eq!(last_day_of_month(2028, 2), 29);
        assert_eq!(last_day_of_month(2026, 12), 31);
    }

    #[test]
    fn test_add_months_simple() {
        assert_eq!(add_months(ymd(2026, 7, 1), 3), ymd(2026, 10, 1));
        assert_eq!(add_months(ymd(2026, 10, 1), 3), ymd(2027, 1, 1));
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(ymd(2026, 1, 31), 1), ymd(2026, 2, 28));
        assert_eq!(add_months(ymd(2026, 8, 31), 1), ymd(2026, 9, 30));
    }

    #[test]
    fn test_add_months_year_rollover() {
        assert_eq!(add_months(ymd(2026, 12, 15), 1), ymd(2027, 1, 15));
        assert_eq!(add_months(ymd(2026, 7, 1), 12), ymd(2027, 7, 1));
    }

    #[test]
    fn test_clamp_day_of_month() {
        assert_eq!(clamp_day_of_month(ymd(2026, 4, 1), 31), ymd(2026, 4, 30));
        assert_eq!(clamp_day_of_month(ymd(2026, 7, 1), 31), ymd(2026, 7, 31));
        assert_eq!(clamp_day_of_month(ymd(2026, 2, 10), 30), ymd(2026, 2, 28));
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(ymd(2026, 7, 1), ymd(2026, 9, 30)).unwrap();
        assert!(range.contains(ymd(2026, 8, 15)));
        assert!(!range.contains(ymd(2026, 10, 1)));
        assert_eq!(range.days(), 92);
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let result = DateRange::new(ymd(2026, 9, 30), ymd(2026, 7, 1));
        assert!(matches!(result, Err(CalendarError::InvalidRange { .. })));
    }

    #[test]
    fn test_date_range_overlaps() {
        let q1 = DateRange::new(ymd(2026, 7, 1), ymd(2026, 9, 30)).unwrap();
        let q2 = DateRange::new(ymd(2026, 10, 1), ymd(2026, 12, 31)).unwrap();
        assert!(!q1.overlaps(&q2));
        let wide = DateRange::new(ymd(2026, 9, 1), ymd(2026, 11, 1)).unwrap();
        assert!(q1.overlaps(&wide));
        assert!(q2.overlaps(&wide));
    }
}
