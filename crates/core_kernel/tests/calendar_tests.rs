//! Tests for calendar date arithmetic

use chrono::NaiveDate;
use core_kernel::{add_months, clamp_day_of_month, last_day_of_month, DateRange};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_month_lengths() {
    assert_eq!(last_day_of_month(2026, 1), 31);
    assert_eq!(last_day_of_month(2026, 2), 28);
    assert_eq!(last_day_of_month(2026, 4), 30);
    assert_eq!(last_day_of_month(2026, 6), 30);
    assert_eq!(last_day_of_month(2026, 9), 30);
    assert_eq!(last_day_of_month(2026, 11), 30);
}

#[test]
fn test_leap_years() {
    assert_eq!(last_day_of_month(2028, 2), 29);
    assert_eq!(last_day_of_month(2100, 2), 28);
    assert_eq!(last_day_of_month(2000, 2), 29);
}

#[test]
fn test_add_zero_months() {
    assert_eq!(add_months(ymd(2026, 7, 15), 0), ymd(2026, 7, 15));
}

#[test]
fn test_add_months_preserves_day_when_valid() {
    assert_eq!(add_months(ymd(2026, 3, 30), 1), ymd(2026, 4, 30));
}

#[test]
fn test_add_months_clamps_into_february() {
    assert_eq!(add_months(ymd(2026, 1, 30), 1), ymd(2026, 2, 28));
    assert_eq!(add_months(ymd(2028, 1, 30), 1), ymd(2028, 2, 29));
}

#[test]
fn test_add_many_months() {
    assert_eq!(add_months(ymd(2026, 7, 1), 24), ymd(2028, 7, 1));
    assert_eq!(add_months(ymd(2026, 11, 1), 14), ymd(2028, 1, 1));
}

#[test]
fn test_due_day_clamp_april() {
    // Due day 31 in a 30-day month resolves to the month's last day.
    let due = clamp_day_of_month(ymd(2027, 4, 1), 31);
    assert_eq!(due, ymd(2027, 4, 30));
}

#[test]
fn test_due_day_clamp_noop_for_valid_day() {
    let due = clamp_day_of_month(ymd(2026, 7, 1), 15);
    assert_eq!(due, ymd(2026, 7, 15));
}

#[test]
fn test_range_days_inclusive() {
    let range = DateRange::new(ymd(2026, 7, 1), ymd(2026, 7, 1)).unwrap();
    assert_eq!(range.days(), 1);

    let year = DateRange::new(ymd(2026, 7, 1), ymd(2027, 6, 30)).unwrap();
    assert_eq!(year.days(), 365);
}

#[test]
fn test_adjacent_ranges_do_not_overlap() {
    let a = DateRange::new(ymd(2026, 7, 1), ymd(2026, 9, 30)).unwrap();
    let b = DateRange::new(ymd(2026, 10, 1), ymd(2026, 12, 31)).unwrap();
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}
