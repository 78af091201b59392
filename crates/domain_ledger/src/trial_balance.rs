//! Trial balance aggregation
//!
//! Reduces posted lines into per-account debit/credit totals. Every
//! accumulation step goes through `Money`, which rounds to the currency's
//! precision on each operation, so totals never drift.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Currency, Money};

use crate::transaction::{LineType, PostedLine};

/// Per-account totals in a trial balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: AccountId,
    pub account_code: String,
    pub account_name: String,
    pub total_debits: Money,
    pub total_credits: Money,
    /// `total_debits - total_credits`
    pub balance: Money,
}

/// A complete trial balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Rows sorted by account code ascending
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: Money,
    pub total_credits: Money,
    /// Exact rounded equality of the grand totals, not an epsilon check
    pub is_balanced: bool,
}

/// Reduces posted lines into a trial balance
pub fn trial_balance(lines: &[PostedLine]) -> TrialBalance {
    let currency = lines
        .first()
        .map(|l| l.amount.currency())
        .unwrap_or_default();
    let zero = Money::zero(currency);

    struct Acc {
        account_id: AccountId,
        account_name: String,
        debits: Money,
        credits: Money,
    }

    // BTreeMap keyed by code gives the sorted row order for free.
    let mut by_code: BTreeMap<String, Acc> = BTreeMap::new();

    for line in lines {
        let acc = by_code.entry(line.account_code.clone()).or_insert(Acc {
            account_id: line.account_id,
            account_name: line.account_name.clone(),
            debits: zero,
            credits: zero,
        });
        match line.line_type {
            LineType::Debit => acc.debits = acc.debits + line.amount,
            LineType::Credit => acc.credits = acc.credits + line.amount,
        }
    }

    let mut total_debits = zero;
    let mut total_credits = zero;
    let rows: Vec<TrialBalanceRow> = by_code
        .into_iter()
        .map(|(code, acc)| {
            total_debits = total_debits + acc.debits;
            total_credits = total_credits + acc.credits;
            TrialBalanceRow {
                account_id: acc.account_id,
                account_code: code,
                account_name: acc.account_name,
                total_debits: acc.debits,
                total_credits: acc.credits,
                balance: acc.debits - acc.credits,
            }
        })
        .collect();

    TrialBalance {
        rows,
        total_debits,
        total_credits,
        is_balanced: total_debits == total_credits,
    }
}

/// Returns an empty, balanced trial balance in the given currency
pub fn empty_trial_balance(currency: Currency) -> TrialBalance {
    let zero = Money::zero(currency);
    TrialBalance {
        rows: Vec::new(),
        total_debits: zero,
        total_credits: zero,
        is_balanced: true,
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

    fn line(
        account_id: AccountId,
        code: &str,
        line_type: LineType,
        amount: rust_decimal::Decimal,
    ) -> PostedLine {
        PostedLine {
            account_id,
            account_code: code.to_string(),
            account_name: format!("Account {code}"),
            line_type,
            amount: aud(amount),
        }
    }

    #[test]
    fn test_balanced_lines_produce_balanced_report() {
        let cash = AccountId::new();
        let income = AccountId::new();
        let lines = vec![
            line(cash, "1100", LineType::Debit, dec!(450)),
            line(income, "4100", LineType::Credit, dec!(450)),
            line(cash, "1100", LineType::Debit, dec!(50)),
            line(income, "4100", LineType::Credit, dec!(50)),
        ];

        let tb = trial_balance(&lines);

        assert!(tb.is_balanced);
        assert_eq!(tb.total_debits, aud(dec!(500)));
        assert_eq!(tb.total_credits, aud(dec!(500)));
        assert_eq!(tb.rows.len(), 2);
        assert_eq!(tb.rows[0].account_code, "1100");
        assert_eq!(tb.rows[0].balance, aud(dec!(500)));
        assert_eq!(tb.rows[1].balance, aud(dec!(-500)));
    }

    #[test]
    fn test_unbalanced_lines_flagged() {
        let lines = vec![
            line(AccountId::new(), "1100", LineType::Debit, dec!(100)),
            line(AccountId::new(), "4100", LineType::Credit, dec!(99.99)),
        ];

        let tb = trial_balance(&lines);
        assert!(!tb.is_balanced);
    }

    #[test]
    fn test_rows_sorted_by_account_code() {
        let lines = vec![
            line(AccountId::new(), "6200", LineType::Debit, dec!(10)),
            line(AccountId::new(), "1100", LineType::Debit, dec!(10)),
            line(AccountId::new(), "4100", LineType::Credit, dec!(20)),
        ];

        let tb = trial_balance(&lines);
        let codes: Vec<&str> = tb.rows.iter().map(|r| r.account_code.as_str()).collect();
        assert_eq!(codes, vec!["1100", "4100", "6200"]);
    }

    #[test]
    fn test_thousand_cent_lines_sum_exactly() {
        // 1000 one-cent debits must total exactly 10.00.
        let cash = AccountId::new();
        let income = AccountId::new();
        let mut lines = Vec::new();
        for _ in 0..1000 {
            lines.push(line(cash, "1100", LineType::Debit, dec!(0.01)));
            lines.push(line(income, "4100", LineType::Credit, dec!(0.01)));
        }

        let tb = trial_balance(&lines);

        assert_eq!(tb.total_debits, aud(dec!(10.00)));
        assert_eq!(tb.total_credits, aud(dec!(10.00)));
        assert!(tb.is_balanced);
    }

    #[test]
    fn test_empty_input() {
        let tb = trial_balance(&[]);
        assert!(tb.rows.is_empty());
        assert!(tb.is_balanced);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Mirrored debit/credit postings always balance, and each
        /// account's balance equals debits minus credits to the cent.
        #[test]
        fn mirrored_postings_balance(
            amounts in prop::collection::vec(1i64..1_000_000i64, 1..50)
        ) {
            let cash = AccountId::new();
            let income = AccountId::new();
            let lines: Vec<PostedLine> = amounts
                .iter()
                .flat_map(|cents| {
                    let amount = Money::from_minor(*cents, Currency::AUD);
                    [
                        PostedLine {
                            account_id: cash,
                            account_code: "1100".to_string(),
                            account_name: "Cash".to_string(),
                            line_type: LineType::Debit,
                            amount,
                        },
                        PostedLine {
                            account_id: income,
                            account_code: "4100".to_string(),
                            account_name: "Income".to_string(),
                            line_type: LineType::Credit,
                            amount,
                        },
                    ]
                })
                .collect();

            let tb = trial_balance(&lines);

            prop_assert!(tb.is_balanced);
            prop_assert_eq!(tb.rows[0].balance, tb.total_debits);
            prop_assert_eq!(
                tb.rows[0].total_debits - tb.rows[0].total_credits,
                tb.rows[0].balance
            );
        }
    }
}
