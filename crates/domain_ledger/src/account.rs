//! Chart of accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, FundType, SchemeId};

use crate::error::LedgerError;

/// Accounting classification of a ledger account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "income" => Ok(AccountType::Income),
            "expense" => Ok(AccountType::Expense),
            other => Err(LedgerError::Validation(format!(
                "Unknown account type: {}",
                other
            ))),
        }
    }
}

/// One entry in a scheme's chart of accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier
    pub id: AccountId,
    /// Owning scheme
    pub scheme_id: SchemeId,
    /// Account code, the sort key for all reports
    pub code: String,
    /// Account name
    pub name: String,
    /// Accounting classification
    pub account_type: AccountType,
    /// Fund scoping; None for scheme-wide accounts
    pub fund_type: Option<FundType>,
    /// Whether the account accepts new postings
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl LedgerAccount {
    /// Creates a new active account
    pub fn new(
        scheme_id: SchemeId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        fund_type: Option<FundType>,
    ) -> Self {
        Self {
            id: AccountId::new_v7(),
            scheme_id,
            code: code.into(),
            name: name.into(),
            account_type,
            fund_type,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Builds the standard strata chart of accounts for a new scheme
///
/// Codes follow the usual convention: 1xxx assets, 2xxx liabilities,
/// 3xxx equity, 4xxx income, 6xxx expenses.
pub fn standard_chart(scheme_id: SchemeId) -> Vec<LedgerAccount> {
    use AccountType::*;
    use FundType::*;

    let accounts: [(&str, &str, AccountType, Option<FundType>); 16] = [
        ("1100", "Cash at Bank - Admin Fund", Asset, Some(Admin)),
        ("1110", "Cash at Bank - Capital Works Fund", Asset, Some(CapitalWorks)),
        ("1200", "Levy Receivables", Asset, None),
        ("2100", "Accounts Payable", Liability, None),
        ("2200", "Levies Received in Advance", Liability, None),
        ("3100", "Admin Fund Balance", Equity, Some(Admin)),
        ("3200", "Capital Works Fund Balance", Equity, Some(CapitalWorks)),
        ("4100", "Levy Income - Admin Fund", Income, Some(Admin)),
        ("4200", "Levy Income - Capital Works Fund", Income, Some(CapitalWorks)),
        ("4300", "Interest Income", Income, None),
        ("4400", "Special Levy Income", Income, None),
        ("6100", "Insurance Premiums", Expense, Some(Admin)),
        ("6200", "Repairs and Maintenance", Expense, Some(Admin)),
        ("6300", "Utilities", Expense, Some(Admin)),
        ("6400", "Administration and Management Fees", Expense, Some(Admin)),
        ("6500", "Capital Works Projects", Expense, Some(CapitalWorks)),
    ];

    accounts
        .into_iter()
        .map(|(code, name, account_type, fund)| {
            LedgerAccount::new(scheme_id, code, name, account_type, fund)
        })
        .collect()
}
