//! FIFO payment allocation
//!
//! The allocation engine walks a caller-ordered list of outstanding levy
//! items and spends a payment against them oldest-first. It is pure: it
//! mutates nothing and persists nothing. Persisting the resulting
//! allocations and recomputing item balances is the orchestrator's job.

use serde::{Deserialize, Serialize};

use core_kernel::{LevyItemId, Money};

/// An outstanding levy item, as seen by the allocation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingItem {
    pub item_id: LevyItemId,
    pub balance: Money,
}

/// One allocation produced by the FIFO pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub item_id: LevyItemId,
    pub amount: Money,
}

/// Result of allocating one payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Per-item allocations, in input order
    pub allocations: Vec<AllocationEntry>,
    /// Remainder left after exhausting the list; a normal result, not an
    /// error
    pub unallocated: Money,
}

impl AllocationOutcome {
    /// Sum of all allocated amounts
    pub fn total_allocated(&self) -> Money {
        self.allocations
            .iter()
            .fold(Money::zero(self.unallocated.currency()), |acc, a| {
                acc + a.amount
            })
    }
}

/// Allocates a payment across outstanding items, oldest first
///
/// # Precondition
///
/// `outstanding` must already be ordered oldest-due-date-first. The engine
/// does not sort; FIFO semantics come entirely from the caller's ordering.
///
/// # Behaviour
///
/// Each item with a positive balance receives `min(remaining, balance)`,
/// rounded to 2 decimal places; the remaining amount is decremented by the
/// same rounded value. Items with a non-positive balance are skipped
/// without consuming any payment. The walk stops as soon as the remainder
/// reaches zero. Anything left after the list is exhausted is returned as
/// `unallocated`.
pub fn allocate(payment_amount: Money, outstanding: &[OutstandingItem]) -> AllocationOutcome {
    let mut remaining = payment_amount;
    let mut allocations = Vec::new();

    for item in outstanding {
        if !remaining.is_positive() {
            break;
        }
        if !item.balance.is_positive() {
            continue;
        }

        let amount = remaining.min(item.balance);
        allocations.push(AllocationEntry {
            item_id: item.item_id,
            amount,
        });
        remaining = remaining - amount;
    }

    AllocationOutcome {
        allocations,
        unallocated: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn aud(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::AUD)
    }

    fn items(balances: &[rust_decimal::Decimal]) -> Vec<OutstandingItem> {
        balances
            .iter()
            .map(|b| OutstandingItem {
                item_id: LevyItemId::new(),
                balance: aud(*b),
            })
            .collect()
    }

    #[test]
    fn test_fifo_order() {
        let outstanding = items(&[dec!(100), dec!(50)]);
        let outcome = allocate(aud(dec!(120)), &outstanding);

        assert_eq!(outcome.allocations.len(), 2);
        assert_eq!(outcome.allocations[0].amount, aud(dec!(100)));
        assert_eq!(outcome.allocations[1].amount, aud(dec!(20)));
        assert!(outcome.unallocated.is_zero());
    }

    #[test]
    fn test_partial_second_item_scenario() {
        // Q1 450 outstanding, Q2 450 outstanding, payment 500.
        let outstanding = items(&[dec!(450), dec!(450)]);
        let outcome = allocate(aud(dec!(500)), &outstanding);

        assert_eq!(outcome.allocations[0].amount, aud(dec!(450)));
        assert_eq!(outcome.allocations[1].amount, aud(dec!(50)));
        assert!(outcome.unallocated.is_zero());
    }

    #[test]
    fn test_empty_list_returns_everything_unallocated() {
        let outcome = allocate(aud(dec!(250)), &[]);
        assert!(outcome.allocations.is_empty());
        assert_eq!(outcome.unallocated, aud(dec!(250)));
    }

    #[test]
    fn test_overpayment_leaves_remainder() {
        let outstanding = items(&[dec!(100)]);
        let outcome = allocate(aud(dec!(150)), &outstanding);

        assert_eq!(outcome.allocations[0].amount, aud(dec!(100)));
        assert_eq!(outcome.unallocated, aud(dec!(50)));
    }

    #[test]
    fn test_zero_balance_items_skipped() {
        let outstanding = items(&[dec!(0), dec!(-10), dec!(80)]);
        let outcome = allocate(aud(dec!(100)), &outstanding);

        assert_eq!(outcome.allocations.len(), 1);
        assert_eq!(outcome.allocations[0].item_id, outstanding[2].item_id);
        assert_eq!(outcome.allocations[0].amount, aud(dec!(80)));
        assert_eq!(outcome.unallocated, aud(dec!(20)));
    }

    #[test]
    fn test_stops_early_once_spent() {
        let outstanding = items(&[dec!(30), dec!(30), dec!(30)]);
        let outcome = allocate(aud(dec!(60)), &outstanding);

        assert_eq!(outcome.allocations.len(), 2);
        assert!(outcome.unallocated.is_zero());
    }

    #[test]
    fn test_cent_precision() {
        let outstanding = items(&[dec!(33.33), dec!(33.33), dec!(33.34)]);
        let outcome = allocate(aud(dec!(100)), &outstanding);

        assert_eq!(outcome.total_allocated(), aud(dec!(100)));
        assert!(outcome.unallocated.is_zero());
    }
}
