//! Levy items
//!
//! A levy item is the amount one lot owes for one billing period. Totals
//! and balances are always derived from the component amounts, never stored
//! as independent truth.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{LevyItemId, LevyPeriodId, LotId, Money, SchemeId};

use crate::error::LevyError;

/// Status of a levy item
///
/// Transitions are driven by allocation events and the overdue refresh;
/// a zero balance always means `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevyItemStatus {
    Pending,
    Sent,
    Partial,
    Overdue,
    Paid,
}

impl LevyItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevyItemStatus::Pending => "pending",
            LevyItemStatus::Sent => "sent",
            LevyItemStatus::Partial => "partial",
            LevyItemStatus::Overdue => "overdue",
            LevyItemStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for LevyItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LevyItemStatus {
    type Err = LevyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LevyItemStatus::Pending),
            "sent" => Ok(LevyItemStatus::Sent),
            "partial" => Ok(LevyItemStatus::Partial),
            "overdue" => Ok(LevyItemStatus::Overdue),
            "paid" => Ok(LevyItemStatus::Paid),
            other => Err(LevyError::Validation(format!(
                "Unknown levy item status: {}",
                other
            ))),
        }
    }
}

/// The amount owed by one lot for one billing period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevyItem {
    /// Unique identifier
    pub id: LevyItemId,
    /// Owning scheme
    pub scheme_id: SchemeId,
    /// The lot being billed
    pub lot_id: LotId,
    /// The billing period this item belongs to
    pub period_id: LevyPeriodId,
    /// Administrative fund component
    pub admin_levy: Money,
    /// Capital works fund component
    pub capital_levy: Money,
    /// Optional special levy component
    pub special_levy: Option<Money>,
    /// Amount paid so far, maintained by allocation events
    pub amount_paid: Money,
    /// Status reflecting the current balance
    pub status: LevyItemStatus,
    /// Due date (copied from the period at calculation time)
    pub due_date: NaiveDate,
    /// When a levy notice was generated for this item
    pub notice_generated_at: Option<DateTime<Utc>>,
    /// When the notice was sent
    pub notice_sent_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl LevyItem {
    /// Creates a new unpaid levy item
    pub fn new(
        scheme_id: SchemeId,
        lot_id: LotId,
        period_id: LevyPeriodId,
        admin_levy: Money,
        capital_levy: Money,
        special_levy: Option<Money>,
        due_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: LevyItemId::new_v7(),
            scheme_id,
            lot_id,
            period_id,
            admin_levy,
            capital_levy,
            special_levy,
            amount_paid: Money::zero(admin_levy.currency()),
            status: LevyItemStatus::Pending,
            due_date,
            notice_generated_at: None,
            notice_sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Total levied: admin + capital + special (derived, never stored)
    pub fn total_levy(&self) -> Money {
        let base = self.admin_levy + self.capital_levy;
        match self.special_levy {
            Some(special) => base + special,
            None => base,
        }
    }

    /// Outstanding balance: total − paid (derived, never stored)
    pub fn balance(&self) -> Money {
        self.total_levy() - self.amount_paid
    }

    /// Applies an allocated payment amount to this item
    ///
    /// The orchestrator calls this immediately after persisting each
    /// allocation, then writes the updated paid amount and status back.
    /// Paid-amount maintenance lives here rather than in a database trigger
    /// so the status transition is visible in one place.
    pub fn apply_allocation(&mut self, amount: Money) {
        self.amount_paid = self.amount_paid + amount;
        self.updated_at = Utc::now();

        if !self.balance().is_positive() {
            self.status = LevyItemStatus::Paid;
        } else if self.amount_paid.is_positive() {
            self.status = LevyItemStatus::Partial;
        }
    }

    /// Marks the item overdue when unpaid past its due date
    pub fn refresh_overdue(&mut self, today: NaiveDate) {
        if self.balance().is_positive() && today > self.due_date {
            self.status = LevyItemStatus::Overdue;
            self.updated_at = Utc::now();
        }
    }

    /// Records that a levy notice was generated
    pub fn mark_notice_generated(&mut self) {
        self.notice_generated_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Records that the levy notice was sent
    pub fn mark_notice_sent(&mut self) {
        self.notice_sent_at = Some(Utc::now());
        if self.status == LevyItemStatus::Pending {
            self.status = LevyItemStatus::Sent;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn item(admin: rust_decimal::Decimal, capital: rust_decimal::Decimal) -> LevyItem {
        LevyItem::new(
            SchemeId::new(),
            LotId::new(),
            LevyPeriodId::new(),
            Money::new(admin, Currency::AUD),
            Money::new(capital, Currency::AUD),
            None,
            NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
        )
    }

    #[test]
    fn test_totals_are_derived() {
        let mut i = item(dec!(300), dec!(150));
        assert_eq!(i.total_levy().amount(), dec!(450));
        assert_eq!(i.balance().amount(), dec!(450));

        i.special_levy = Some(Money::new(dec!(50), Currency::AUD));
        assert_eq!(i.total_levy().amount(), dec!(500));
    }

    #[test]
    fn test_partial_allocation() {
        let mut i = item(dec!(300), dec!(150));
        i.apply_allocation(Money::new(dec!(100), Currency::AUD));

        assert_eq!(i.amount_paid.amount(), dec!(100));
        assert_eq!(i.balance().amount(), dec!(350));
        assert_eq!(i.status, LevyItemStatus::Partial);
    }

    #[test]
    fn test_full_allocation_marks_paid() {
        let mut i = item(dec!(300), dec!(150));
        i.apply_allocation(Money::new(dec!(450), Currency::AUD));

        assert!(i.balance().is_zero());
        assert_eq!(i.status, LevyItemStatus::Paid);
    }

    #[test]
    fn test_refresh_overdue() {
        let mut i = item(dec!(300), dec!(150));
        i.refresh_overdue(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(i.status, LevyItemStatus::Overdue);
    }

    #[test]
    fn test_refresh_overdue_skips_paid() {
        let mut i = item(dec!(300), dec!(150));
        i.apply_allocation(Money::new(dec!(450), Currency::AUD));
        i.refresh_overdue(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(i.status, LevyItemStatus::Paid);
    }

    #[test]
    fn test_notice_lifecycle() {
        let mut i = item(dec!(300), dec!(150));
        i.mark_notice_generated();
        i.mark_notice_sent();
        assert!(i.notice_generated_at.is_some());
        assert!(i.notice_sent_at.is_some());
        assert_eq!(i.status, LevyItemStatus::Sent);
    }
}
