//! Transactions and posting lines
//!
//! A transaction records one movement of money through a scheme's trust
//! account. Its double-entry posting lines are immutable once created;
//! corrections are new reversing transactions, never edits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, FundType, Money, SchemeId, TransactionId, TransactionLineId};

use crate::error::LedgerError;

/// Direction of money movement at the transaction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Receipt,
    Payment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Receipt => "receipt",
            TransactionType::Payment => "payment",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(TransactionType::Receipt),
            "payment" => Ok(TransactionType::Payment),
            other => Err(LedgerError::Validation(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// Side of a double-entry posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Debit,
    Credit,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Debit => "debit",
            LineType::Credit => "credit",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LineType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(LineType::Debit),
            "credit" => Ok(LineType::Credit),
            other => Err(LedgerError::Validation(format!(
                "Unknown line type: {}",
                other
            ))),
        }
    }
}

/// One movement of money through the trust account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,
    /// Owning scheme
    pub scheme_id: SchemeId,
    /// Date of the movement
    pub transaction_date: NaiveDate,
    /// Receipt or payment
    pub transaction_type: TransactionType,
    /// Fund the movement belongs to
    pub fund_type: FundType,
    /// Report category code (chart-of-accounts code)
    pub category_code: String,
    /// Description for statements
    pub description: String,
    /// Soft-delete flag; deleted transactions are excluded from reports
    pub is_deleted: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction
    pub fn new(
        scheme_id: SchemeId,
        transaction_date: NaiveDate,
        transaction_type: TransactionType,
        fund_type: FundType,
        category_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new_v7(),
            scheme_id,
            transaction_date,
            transaction_type,
            fund_type,
            category_code: category_code.into(),
            description: description.into(),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }
}

/// An immutable double-entry posting belonging to a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier
    pub id: TransactionLineId,
    /// Owning transaction
    pub transaction_id: TransactionId,
    /// Posted account
    pub account_id: AccountId,
    /// Debit or credit
    pub line_type: LineType,
    /// Posted amount, always non-negative
    pub amount: Money,
}

impl TransactionLine {
    /// Creates a new posting line
    pub fn new(
        transaction_id: TransactionId,
        account_id: AccountId,
        line_type: LineType,
        amount: Money,
    ) -> Self {
        Self {
            id: TransactionLineId::new_v7(),
            transaction_id,
            account_id,
            line_type,
            amount,
        }
    }
}

/// A posting line joined with its account, the trial balance input shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedLine {
    pub account_id: AccountId,
    pub account_code: String,
    pub account_name: String,
    pub line_type: LineType,
    pub amount: Money,
}

/// A fund-level movement, the fund balance summary input shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundMovement {
    pub fund_type: FundType,
    pub transaction_type: TransactionType,
    pub amount: Money,
}

/// A categorised movement, the income statement input shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMovement {
    pub category_code: String,
    pub category_name: String,
    pub fund_type: FundType,
    pub transaction_type: TransactionType,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_round_trips() {
        for t in [TransactionType::Receipt, TransactionType::Payment] {
            let parsed: TransactionType = t.as_str().parse().unwrap();
            assert_eq!(parsed, t);
        }
        for l in [LineType::Debit, LineType::Credit] {
            let parsed: LineType = l.as_str().parse().unwrap();
            assert_eq!(parsed, l);
        }
    }
}
