//! Fund balance summary
//!
//! Rolls fund-level receipts and payments forward from an opening balance:
//! `closing = opening + receipts - payments` per statutory fund.

use serde::{Deserialize, Serialize};

use core_kernel::{FundType, Money};

use crate::transaction::{FundMovement, TransactionType};

/// Opening balances per fund at the start of a reporting range
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FundOpeningBalances {
    pub admin: Money,
    pub capital_works: Money,
}

impl FundOpeningBalances {
    pub fn zero(currency: core_kernel::Currency) -> Self {
        Self {
            admin: Money::zero(currency),
            capital_works: Money::zero(currency),
        }
    }

    fn for_fund(&self, fund: FundType) -> Money {
        match fund {
            FundType::Admin => self.admin,
            FundType::CapitalWorks => self.capital_works,
        }
    }
}

/// One fund's movement summary for a reporting range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundBalance {
    pub fund_type: FundType,
    pub opening_balance: Money,
    pub total_receipts: Money,
    pub total_payments: Money,
    pub closing_balance: Money,
}

/// Reduces fund movements into per-fund balance summaries
///
/// Returns one row per fund in reporting order (admin first), including
/// funds with no movements in the range.
pub fn fund_balance_summary(
    opening: FundOpeningBalances,
    movements: &[FundMovement],
) -> Vec<FundBalance> {
    FundType::ALL
        .into_iter()
        .map(|fund| {
            let opening_balance = opening.for_fund(fund);
            let zero = Money::zero(opening_balance.currency());

            let mut receipts = zero;
            let mut payments = zero;
            for movement in movements.iter().filter(|m| m.fund_type == fund) {
                match movement.transaction_type {
                    TransactionType::Receipt => receipts = receipts + movement.amount,
                    TransactionType::Payment => payments = payments + movement.amount,
                }
            }

            FundBalance {
                fund_type: fund,
                opening_balance,
                total_receipts: receipts,
                total_payments: payments,
                closing_balance: opening_balance + receipts - payments,
            }
        })
        .collect()
}
