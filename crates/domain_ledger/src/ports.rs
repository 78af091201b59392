//! Ledger Domain Ports
//!
//! The `LedgerStore` trait covers the reads the report reducers need
//! (already scoped by scheme, date range and soft-delete flags) plus
//! writes for the chart of accounts and transactions.

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{DateRange, DomainPort, PortError, SchemeId, TransactionId};

use crate::account::LedgerAccount;
use crate::fund_summary::FundOpeningBalances;
use crate::transaction::{CategoryMovement, FundMovement, PostedLine, Transaction, TransactionLine};

/// Persistence port for the ledger domain
#[async_trait]
pub trait LedgerStore: DomainPort {
    // Chart of accounts

    /// Persists a batch of accounts
    async fn insert_accounts(&self, accounts: &[LedgerAccount]) -> Result<(), PortError>;

    /// Lists a scheme's active accounts ordered by code
    async fn list_accounts(&self, scheme_id: SchemeId) -> Result<Vec<LedgerAccount>, PortError>;

    // Transactions

    /// Persists a transaction together with its posting lines
    async fn insert_transaction(
        &self,
        transaction: &Transaction,
        lines: &[TransactionLine],
    ) -> Result<(), PortError>;

    /// Soft-deletes a transaction; its lines stop contributing to reports
    async fn soft_delete_transaction(
        &self,
        scheme_id: SchemeId,
        id: TransactionId,
    ) -> Result<(), PortError>;

    // Report inputs, excluding soft-deleted transactions

    /// Posting lines joined with their accounts for a date range
    async fn list_posted_lines(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<PostedLine>, PortError>;

    /// Fund-level movements for a date range
    async fn list_fund_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<FundMovement>, PortError>;

    /// Categorised movements for a date range
    async fn list_category_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<CategoryMovement>, PortError>;

    /// Per-fund balances accumulated from all movements before the date
    async fn opening_fund_balances(
        &self,
        scheme_id: SchemeId,
        before: NaiveDate,
    ) -> Result<FundOpeningBalances, PortError>;
}
