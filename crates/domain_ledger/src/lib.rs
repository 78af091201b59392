//! Trust Accounting Ledger Domain
//!
//! This crate implements the ledger side of the strata core: the chart of
//! accounts, immutable double-entry transactions, and the report reducers
//! that roll transaction-line data into trial balance, fund balance and
//! income statement rows.
//!
//! # Design
//!
//! The reducers (`trial_balance`, `fund_balance_summary`,
//! `income_statement`) are pure functions over input collections; every
//! accumulation step runs through `Money` and is therefore rounded to the
//! currency's precision as it happens. The `ReportingService` owns row
//! fetching (scheme, date range, soft-delete scoping) and optional
//! document rendering.

pub mod account;
pub mod transaction;
pub mod trial_balance;
pub mod fund_summary;
pub mod income_statement;
pub mod ports;
pub mod services;
pub mod error;

pub use account::{AccountType, LedgerAccount, standard_chart};
pub use transaction::{
    Transaction, TransactionLine, TransactionType, LineType,
    PostedLine, FundMovement, CategoryMovement,
};
pub use trial_balance::{trial_balance, TrialBalance, TrialBalanceRow};
pub use fund_summary::{fund_balance_summary, FundBalance, FundOpeningBalances};
pub use income_statement::{income_statement, IncomeStatement, FundStatement, CategoryTotal};
pub use ports::LedgerStore;
pub use services::{ReportingService, RecordTransactionRequest, PostingInput, RenderedReport};
pub use error::LedgerError;
