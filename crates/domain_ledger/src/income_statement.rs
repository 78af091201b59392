//! Income statement aggregation
//!
//! Groups categorised movements by (category, fund): receipts become
//! income rows, payments become expense rows. Each fund gets its own
//! statement, plus a combined total across funds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, FundType, Money};

use crate::transaction::{CategoryMovement, TransactionType};

/// One category's total within an income statement section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_code: String,
    pub category_name: String,
    pub total: Money,
}

/// One fund's income statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundStatement {
    pub fund_type: FundType,
    /// Income categories sorted by code ascending
    pub income: Vec<CategoryTotal>,
    /// Expense categories sorted by code ascending
    pub expenses: Vec<CategoryTotal>,
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub net: Money,
}

/// Income statements per fund plus the combined total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Per-fund statements in reporting order (admin first)
    pub funds: Vec<FundStatement>,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net: Money,
}

/// Reduces categorised movements into an income statement
pub fn income_statement(movements: &[CategoryMovement]) -> IncomeStatement {
    let currency = movements
        .first()
        .map(|m| m.amount.currency())
        .unwrap_or_default();
    income_statement_in(currency, movements)
}

/// As `income_statement`, with an explicit currency for empty inputs
pub fn income_statement_in(
    currency: Currency,
    movements: &[CategoryMovement],
) -> IncomeStatement {
    let zero = Money::zero(currency);
    let mut total_income = zero;
    let mut total_expenses = zero;

    let funds: Vec<FundStatement> = FundType::ALL
        .into_iter()
        .map(|fund| {
            // Keyed by code so each section comes out sorted.
            let mut income: BTreeMap<String, CategoryTotal> = BTreeMap::new();
            let mut expenses: BTreeMap<String, CategoryTotal> = BTreeMap::new();

            for movement in movements.iter().filter(|m| m.fund_type == fund) {
                let section = match movement.transaction_type {
                    TransactionType::Receipt => &mut income,
                    TransactionType::Payment => &mut expenses,
                };
                let entry = section
                    .entry(movement.category_code.clone())
                    .or_insert_with(|| CategoryTotal {
                        category_code: movement.category_code.clone(),
                        category_name: movement.category_name.clone(),
                        total: zero,
                    });
                entry.total = entry.total + movement.amount;
            }

            let fund_income = income
                .values()
                .fold(zero, |acc, row| acc + row.total);
            let fund_expenses = expenses
                .values()
                .fold(zero, |acc, row| acc + row.total);

            total_income = total_income + fund_income;
            total_expenses = total_expenses + fund_expenses;

            FundStatement {
                fund_type: fund,
                income: income.into_values().collect(),
                expenses: expenses.into_values().collect(),
                total_income: fund_income,
                total_expenses: fund_expenses,
                net: fund_income - fund_expenses,
            }
        })
        .collect();

    IncomeStatement {
        funds,
        total_income,
        total_expenses,
        net: total_income - total_expenses,
    }
}
