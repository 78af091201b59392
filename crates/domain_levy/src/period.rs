//! Billing period generation
//!
//! Periods partition a schedule's budget year into contiguous,
//! non-overlapping intervals of equal calendar-month length. All dates are
//! plain calendar dates; no time or timezone semantics apply.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{add_months, clamp_day_of_month, LevyPeriodId, LevyScheduleId};

use crate::error::LevyError;
use crate::schedule::LevyFrequency;

/// First calendar month of the financial year (July–June convention).
/// A period starting in this month or later is labelled with the next
/// calendar year, e.g. a start of 2026-07-01 falls in FY2027.
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

/// Lifecycle status of a billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Pending,
    Active,
    Closed,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Pending => "pending",
            PeriodStatus::Active => "active",
            PeriodStatus::Closed => "closed",
        }
    }
}

impl FromStr for PeriodStatus {
    type Err = LevyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PeriodStatus::Pending),
            "active" => Ok(PeriodStatus::Active),
            "closed" => Ok(PeriodStatus::Closed),
            other => Err(LevyError::Validation(format!(
                "Unknown period status: {}",
                other
            ))),
        }
    }
}

/// One billing cycle belonging to a levy schedule
///
/// Created in a batch at schedule-creation time and never individually
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevyPeriod {
    /// Unique identifier
    pub id: LevyPeriodId,
    /// Owning schedule
    pub schedule_id: LevyScheduleId,
    /// 1-based period number
    pub period_number: u32,
    /// Human label, e.g. "Q1 FY2027"
    pub label: String,
    /// First day of the period
    pub start_date: NaiveDate,
    /// Last day of the period
    pub end_date: NaiveDate,
    /// Levy due date within the period's start month
    pub due_date: NaiveDate,
    /// Lifecycle status
    pub status: PeriodStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

/// Returns the financial-year label for a period start date
///
/// July–June convention: a start in July or later belongs to the FY named
/// after the following calendar year.
pub fn fiscal_year_label(start: NaiveDate) -> i32 {
    if start.month() >= FISCAL_YEAR_START_MONTH {
        start.year() + 1
    } else {
        start.year()
    }
}

/// Generates the billing periods for a schedule
///
/// Produces exactly `periods_per_year` periods. Period *i* (0-indexed)
/// starts `i * (12 / periods_per_year)` months after `budget_year_start`
/// and ends the day before the next period starts, so the periods partition
/// exactly one year. The due date is `due_day` clamped to the last day of
/// each period's start month.
///
/// Callers must validate `periods_per_year ∈ {1, 2, 4, 12}` and
/// `due_day ∈ 1..=31` before calling; this function is pure and performs
/// no validation of its own.
pub fn generate_periods(
    schedule_id: LevyScheduleId,
    budget_year_start: NaiveDate,
    frequency: LevyFrequency,
    periods_per_year: u32,
    due_day: u32,
) -> Vec<LevyPeriod> {
    let months_per_period = 12 / periods_per_year;
    let now = Utc::now();

    (0..periods_per_year)
        .map(|i| {
            let start = add_months(budget_year_start, i * months_per_period);
            let end = add_months(start, months_per_period)
                .pred_opt()
                .expect("period end predates year zero");
            let due = clamp_day_of_month(start, due_day);
            let number = i + 1;

            LevyPeriod {
                id: LevyPeriodId::new_v7(),
                schedule_id,
                period_number: number,
                label: period_label(frequency, periods_per_year, number, start),
                start_date: start,
                end_date: end,
                due_date: due,
                status: PeriodStatus::Pending,
                created_at: now,
            }
        })
        .collect()
}

/// Builds the human label for a period
///
/// The quarterly, monthly and annual forms apply only when the period count
/// matches the frequency's conventional cardinality; any other pairing
/// falls back to a numbered label.
fn period_label(
    frequency: LevyFrequency,
    periods_per_year: u32,
    number: u32,
    start: NaiveDate,
) -> String {
    let fy = fiscal_year_label(start);
    match (frequency, periods_per_year) {
        (LevyFrequency::Quarterly, 4) => format!("Q{} FY{}", number, fy),
        (LevyFrequency::Monthly, 12) => format!("{} FY{}", start.format("%b"), fy),
        (LevyFrequency::Annual, 1) => format!("Annual FY{}", fy),
        _ => format!("Period {} FY{}", number, fy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::LevyFrequency;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fiscal_year_label_boundaries() {
        assert_eq!(fiscal_year_label(ymd(2026, 7, 1)), 2027);
        assert_eq!(fiscal_year_label(ymd(2026, 6, 30)), 2026);
        assert_eq!(fiscal_year_label(ymd(2027, 1, 1)), 2027);
        assert_eq!(fiscal_year_label(ymd(2026, 12, 1)), 2027);
    }

    #[test]
    fn test_quarterly_count_and_numbering() {
        let periods = generate_periods(
            LevyScheduleId::new(),
            ymd(2026, 7, 1),
            LevyFrequency::Quarterly,
            4,
            31,
        );
        assert_eq!(periods.len(), 4);
        for (i, p) in periods.iter().enumerate() {
            assert_eq!(p.period_number, i as u32 + 1);
            assert_eq!(p.status, PeriodStatus::Pending);
        }
    }

    #[test]
    fn test_monthly_labels() {
        let periods = generate_periods(
            LevyScheduleId::new(),
            ymd(2026, 7, 1),
            LevyFrequency::Monthly,
            12,
            1,
        );
        assert_eq!(periods[0].label, "Jul FY2027");
        assert_eq!(periods[5].label, "Dec FY2027");
        assert_eq!(periods[6].label, "Jan FY2027");
    }

    #[test]
    fn test_annual_label() {
        let periods = generate_periods(
            LevyScheduleId::new(),
            ymd(2026, 7, 1),
            LevyFrequency::Annual,
            1,
            15,
        );
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].label, "Annual FY2027");
        assert_eq!(periods[0].end_date, ymd(2027, 6, 30));
    }

    #[test]
    fn test_mismatched_cardinality_falls_back_to_numbered_label() {
        let periods = generate_periods(
            LevyScheduleId::new(),
            ymd(2026, 7, 1),
            LevyFrequency::Annual,
            2,
            15,
        );
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].label, "Period 1 FY2027");
        assert_eq!(periods[1].label, "Period 2 FY2027");
        assert_eq!(periods[1].start_date, ymd(2027, 1, 1));
    }

    #[test]
    fn test_calendar_year_schedule_labels() {
        let periods = generate_periods(
            LevyScheduleId::new(),
            ymd(2026, 1, 1),
            LevyFrequency::Quarterly,
            4,
            15,
        );
        // Q1 starts in January, before July: same-year FY label.
        assert_eq!(periods[0].label, "Q1 FY2026");
        // Q3 starts in July: next-year FY label.
        assert_eq!(periods[2].label, "Q3 FY2027");
    }
}
