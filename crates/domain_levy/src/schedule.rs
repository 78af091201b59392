//! Levy schedules
//!
//! A levy schedule is a scheme's annual billing plan: the budget year it
//! covers, the fund totals being raised, and the billing cadence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{LevyScheduleId, Money, SchemeId};

use crate::error::LevyError;

/// Supported billing period counts per budget year
pub const SUPPORTED_PERIODS_PER_YEAR: [u32; 4] = [1, 2, 4, 12];

/// Billing frequency for a levy schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyFrequency {
    Annual,
    Quarterly,
    Monthly,
}

impl LevyFrequency {
    /// The conventional period count for this frequency
    pub fn default_periods_per_year(&self) -> u32 {
        match self {
            LevyFrequency::Annual => 1,
            LevyFrequency::Quarterly => 4,
            LevyFrequency::Monthly => 12,
        }
    }

    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LevyFrequency::Annual => "annual",
            LevyFrequency::Quarterly => "quarterly",
            LevyFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for LevyFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LevyFrequency {
    type Err = LevyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "annual" => Ok(LevyFrequency::Annual),
            "quarterly" => Ok(LevyFrequency::Quarterly),
            "monthly" => Ok(LevyFrequency::Monthly),
            other => Err(LevyError::Validation(format!(
                "Unknown levy frequency: {}",
                other
            ))),
        }
    }
}

/// A scheme's annual levy billing plan
///
/// # Invariants
///
/// - `budget_year_end > budget_year_start`
/// - `periods_per_year` is one of 1, 2, 4, 12
/// - Immutable once any levy item exists for any of its periods; the
///   `BillingService` enforces this with a pre-update guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevySchedule {
    /// Unique identifier
    pub id: LevyScheduleId,
    /// Owning scheme
    pub scheme_id: SchemeId,
    /// First day of the budget year
    pub budget_year_start: NaiveDate,
    /// Last day of the budget year
    pub budget_year_end: NaiveDate,
    /// Total to raise for the administrative fund
    pub admin_fund_total: Money,
    /// Total to raise for the capital works fund
    pub capital_works_fund_total: Money,
    /// Billing frequency
    pub frequency: LevyFrequency,
    /// Billing periods per budget year (1, 2, 4 or 12)
    pub periods_per_year: u32,
    /// Day of month levies fall due, clamped per period to the month's end
    pub due_day: u32,
    /// Whether this schedule is the scheme's active plan
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl LevySchedule {
    /// Creates a new active schedule
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scheme_id: SchemeId,
        budget_year_start: NaiveDate,
        budget_year_end: NaiveDate,
        admin_fund_total: Money,
        capital_works_fund_total: Money,
        frequency: LevyFrequency,
        periods_per_year: u32,
        due_day: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: LevyScheduleId::new_v7(),
            scheme_id,
            budget_year_start,
            budget_year_end,
            admin_fund_total,
            capital_works_fund_total,
            frequency,
            periods_per_year,
            due_day,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the schedule's invariants
    pub fn validate(&self) -> Result<(), LevyError> {
        if self.budget_year_end <= self.budget_year_start {
            return Err(LevyError::Validation(format!(
                "Budget year end {} must be after start {}",
                self.budget_year_end, self.budget_year_start
            )));
        }
        if !SUPPORTED_PERIODS_PER_YEAR.contains(&self.periods_per_year) {
            return Err(LevyError::Validation(format!(
                "Unsupported periods per year: {} (expected 1, 2, 4 or 12)",
                self.periods_per_year
            )));
        }
        if self.due_day < 1 || self.due_day > 31 {
            return Err(LevyError::Validation(format!(
                "Due day {} is outside 1..=31",
                self.due_day
            )));
        }
        if self.admin_fund_total.is_negative() || self.capital_works_fund_total.is_negative() {
            return Err(LevyError::Validation(
                "Fund totals cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Soft-deactivates the schedule
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn schedule(ppy: u32, due_day: u32) -> LevySchedule {
        LevySchedule::new(
            SchemeId::new(),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
            Money::new(dec!(40000), Currency::AUD),
            Money::new(dec!(10000), Currency::AUD),
            LevyFrequency::Quarterly,
            ppy,
            due_day,
        )
    }

    #[test]
    fn test_valid_schedule() {
        assert!(schedule(4, 31).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_cardinality() {
        let result = schedule(3, 31).validate();
        assert!(matches!(result, Err(LevyError::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_due_day() {
        assert!(schedule(4, 0).validate().is_err());
        assert!(schedule(4, 32).validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_year() {
        let mut s = schedule(4, 31);
        s.budget_year_end = s.budget_year_start;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_frequency_round_trip() {
        for f in [
            LevyFrequency::Annual,
            LevyFrequency::Quarterly,
            LevyFrequency::Monthly,
        ] {
            let parsed: LevyFrequency = f.as_str().parse().unwrap();
            assert_eq!(parsed, f);
        }
    }

    #[test]
    fn test_deactivate() {
        let mut s = schedule(4, 31);
        s.deactivate();
        assert!(!s.is_active);
    }
}
