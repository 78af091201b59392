//! Budget-vs-actual variance
//!
//! Compares budget line items against actual spend per category and
//! classifies each row. Variance percentages are computed on rounded
//! amounts and have no meaning when nothing was budgeted, hence the
//! explicit division-by-zero escape.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;

use crate::budget::BudgetLineItem;

/// Three-way variance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    OnTrack,
    Monitor,
    OverBudget,
}

impl VarianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceStatus::OnTrack => "on_track",
            VarianceStatus::Monitor => "monitor",
            VarianceStatus::OverBudget => "over_budget",
        }
    }
}

impl fmt::Display for VarianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actual spend for one category, as fetched by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryActual {
    pub category_code: String,
    pub actual: Money,
}

/// One category's budget-vs-actual comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetVsActualRow {
    pub category_code: String,
    pub category_name: String,
    pub budgeted: Money,
    pub actual: Money,
    /// `actual - budgeted`
    pub variance: Money,
    /// `variance / budgeted * 100`; None when nothing was budgeted
    pub variance_pct: Option<Decimal>,
    pub status: VarianceStatus,
}

/// Compares budget lines against actuals, one row per budget line
///
/// Categories with no recorded actual are treated as zero spend. Rows
/// come out sorted by category code ascending.
pub fn budget_vs_actual(
    lines: &[BudgetLineItem],
    actuals: &[CategoryActual],
) -> Vec<BudgetVsActualRow> {
    let mut rows: Vec<BudgetVsActualRow> = lines
        .iter()
        .map(|line| {
            let budgeted = line.budgeted_amount;
            let actual = actuals
                .iter()
                .find(|a| a.category_code == line.category_code)
                .map(|a| a.actual)
                .unwrap_or_else(|| Money::zero(budgeted.currency()));

            let variance = actual - budgeted;
            let variance_pct = if budgeted.amount().is_zero() {
                None
            } else {
                Some(
                    (variance.amount() / budgeted.amount() * dec!(100)).round_dp(2),
                )
            };
            let status = classify(budgeted, actual, variance_pct);

            BudgetVsActualRow {
                category_code: line.category_code.clone(),
                category_name: line.category_name.clone(),
                budgeted,
                actual,
                variance,
                variance_pct,
                status,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.category_code.cmp(&b.category_code));
    rows
}

fn classify(budgeted: Money, actual: Money, variance_pct: Option<Decimal>) -> VarianceStatus {
    match variance_pct {
        Some(pct) if pct > dec!(10) => VarianceStatus::OverBudget,
        Some(pct) if pct > Decimal::ZERO => VarianceStatus::Monitor,
        Some(_) => VarianceStatus::OnTrack,
        // Nothing budgeted: any spend at all is over budget.
        None if budgeted.amount().is_zero() && actual.is_positive() => VarianceStatus::OverBudget,
        None => VarianceStatus::OnTrack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{BudgetId, Currency};

    fn aud(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::AUD)
    }

    fn line(code: &str, budgeted: rust_decimal::Decimal) -> BudgetLineItem {
        BudgetLineItem::new(BudgetId::new(), code, format!("Category {code}"), aud(budgeted), None)
    }

    fn actual(code: &str, amount: rust_decimal::Decimal) -> CategoryActual {
        CategoryActual {
            category_code: code.to_string(),
            actual: aud(amount),
        }
    }

    fn single_row(
        budgeted: rust_decimal::Decimal,
        spent: rust_decimal::Decimal,
    ) -> BudgetVsActualRow {
        budget_vs_actual(&[line("6100", budgeted)], &[actual("6100", spent)])
            .pop()
            .unwrap()
    }

    #[test]
    fn test_monitor_at_five_percent_over() {
        let row = single_row(dec!(1000), dec!(1050));
        assert_eq!(row.variance, aud(dec!(50)));
        assert_eq!(row.variance_pct, Some(dec!(5)));
        assert_eq!(row.status, VarianceStatus::Monitor);
    }

    #[test]
    fn test_over_budget_at_twenty_percent() {
        let row = single_row(dec!(1000), dec!(1200));
        assert_eq!(row.variance_pct, Some(dec!(20)));
        assert_eq!(row.status, VarianceStatus::OverBudget);
    }

    #[test]
    fn test_on_track_when_under_budget() {
        let row = single_row(dec!(1000), dec!(900));
        assert_eq!(row.variance_pct, Some(dec!(-10)));
        assert_eq!(row.status, VarianceStatus::OnTrack);
    }

    #[test]
    fn test_zero_budget_with_spend_is_over_budget_without_pct() {
        let row = single_row(dec!(0), dec!(50));
        assert_eq!(row.variance, aud(dec!(50)));
        assert_eq!(row.variance_pct, None);
        assert_eq!(row.status, VarianceStatus::OverBudget);
    }

    #[test]
    fn test_zero_budget_zero_spend_is_on_track() {
        let row = single_row(dec!(0), dec!(0));
        assert_eq!(row.variance_pct, None);
        assert_eq!(row.status, VarianceStatus::OnTrack);
    }

    #[test]
    fn test_boundary_exactly_ten_percent_is_monitor() {
        let row = single_row(dec!(1000), dec!(1100));
        assert_eq!(row.variance_pct, Some(dec!(10)));
        assert_eq!(row.status, VarianceStatus::Monitor);
    }

    #[test]
    fn test_exactly_on_budget_is_on_track() {
        let row = single_row(dec!(1000), dec!(1000));
        assert_eq!(row.variance_pct, Some(dec!(0)));
        assert_eq!(row.status, VarianceStatus::OnTrack);
    }

    #[test]
    fn test_missing_actual_treated_as_zero() {
        let rows = budget_vs_actual(&[line("6100", dec!(500))], &[]);
        assert_eq!(rows[0].actual, aud(dec!(0)));
        assert_eq!(rows[0].variance, aud(dec!(-500)));
        assert_eq!(rows[0].status, VarianceStatus::OnTrack);
    }

    #[test]
    fn test_rows_sorted_by_category_code() {
        let rows = budget_vs_actual(
            &[line("6400", dec!(10)), line("6100", dec!(10)), line("6200", dec!(10))],
            &[],
        );
        let codes: Vec<&str> = rows.iter().map(|r| r.category_code.as_str()).collect();
        assert_eq!(codes, vec!["6100", "6200", "6400"]);
    }
}
