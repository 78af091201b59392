//! Reporting orchestration
//!
//! `ReportingService` fetches store-scoped rows (scheme, date range,
//! soft-delete exclusion) and hands them to the pure reducers. Report
//! rendering and upload are optional collaborators; a report that renders
//! but fails to upload is returned with a warning, not an error.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use core_kernel::{
    BlobStore, DateRange, DocumentRenderer, FundType, Money, Outcome, RequestContext,
};

use crate::account::{standard_chart, LedgerAccount};
use crate::error::LedgerError;
use crate::fund_summary::{fund_balance_summary, FundBalance};
use crate::income_statement::{income_statement, IncomeStatement};
use crate::ports::LedgerStore;
use crate::transaction::{LineType, Transaction, TransactionLine, TransactionType};
use crate::trial_balance::{trial_balance, TrialBalance};

/// One posting line in a transaction request
#[derive(Debug, Clone)]
pub struct PostingInput {
    pub account_id: core_kernel::AccountId,
    pub line_type: LineType,
    pub amount: Money,
}

/// Request for recording a transaction with its posting lines
#[derive(Debug, Clone)]
pub struct RecordTransactionRequest {
    pub transaction_date: chrono::NaiveDate,
    pub transaction_type: TransactionType,
    pub fund_type: FundType,
    pub category_code: String,
    pub description: String,
    pub lines: Vec<PostingInput>,
}

/// A rendered report document
#[derive(Debug, Clone)]
pub struct RenderedReport {
    /// Blob-store path; None when the upload failed after rendering
    pub path: Option<String>,
    /// The rendered bytes
    pub bytes: Vec<u8>,
}

/// Orchestrates ledger reports over the store and rendering ports
pub struct ReportingService {
    store: Arc<dyn LedgerStore>,
    renderer: Option<Arc<dyn DocumentRenderer>>,
    blobs: Option<Arc<dyn BlobStore>>,
}

impl ReportingService {
    /// Creates a reporting service without document rendering
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            renderer: None,
            blobs: None,
        }
    }

    /// Attaches a document renderer and blob store for report rendering
    pub fn with_rendering(
        mut self,
        renderer: Arc<dyn DocumentRenderer>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        self.renderer = Some(renderer);
        self.blobs = Some(blobs);
        self
    }

    /// Seeds the standard strata chart of accounts for a scheme
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Conflict` when the scheme already has
    /// accounts.
    pub async fn setup_chart(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<LedgerAccount>, LedgerError> {
        let existing = self.store.list_accounts(ctx.scheme_id).await?;
        if !existing.is_empty() {
            return Err(LedgerError::Conflict(
                "Scheme already has a chart of accounts".to_string(),
            ));
        }

        let chart = standard_chart(ctx.scheme_id);
        self.store.insert_accounts(&chart).await?;
        info!(scheme_id = %ctx.scheme_id, accounts = chart.len(), "Seeded chart of accounts");
        Ok(chart)
    }

    /// Lists a scheme's chart of accounts
    pub async fn list_accounts(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<LedgerAccount>, LedgerError> {
        Ok(self.store.list_accounts(ctx.scheme_id).await?)
    }

    /// Records a transaction with balanced double-entry posting lines
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Unbalanced` when debits and credits differ,
    /// and `LedgerError::Validation` for an empty line set.
    pub async fn record_transaction(
        &self,
        ctx: &RequestContext,
        request: RecordTransactionRequest,
    ) -> Result<Transaction, LedgerError> {
        if request.lines.is_empty() {
            return Err(LedgerError::Validation(
                "A transaction needs at least one posting line".to_string(),
            ));
        }

        let currency = request.lines[0].amount.currency();
        let mut debits = Money::zero(currency);
        let mut credits = Money::zero(currency);
        for line in &request.lines {
            if line.amount.is_negative() {
                return Err(LedgerError::Validation(
                    "Posting amounts cannot be negative".to_string(),
                ));
            }
            match line.line_type {
                LineType::Debit => debits = debits + line.amount,
                LineType::Credit => credits = credits + line.amount,
            }
        }
        if debits != credits {
            return Err(LedgerError::Unbalanced {
                debits: debits.amount(),
                credits: credits.amount(),
            });
        }

        let transaction = Transaction::new(
            ctx.scheme_id,
            request.transaction_date,
            request.transaction_type,
            request.fund_type,
            request.category_code,
            request.description,
        );
        let lines: Vec<TransactionLine> = request
            .lines
            .iter()
            .map(|l| TransactionLine::new(transaction.id, l.account_id, l.line_type, l.amount))
            .collect();

        self.store.insert_transaction(&transaction, &lines).await?;
        info!(
            transaction_id = %transaction.id,
            scheme_id = %ctx.scheme_id,
            lines = lines.len(),
            "Recorded transaction"
        );
        Ok(transaction)
    }

    /// Soft-deletes a transaction, removing it from all reports
    pub async fn remove_transaction(
        &self,
        ctx: &RequestContext,
        id: core_kernel::TransactionId,
    ) -> Result<(), LedgerError> {
        self.store
            .soft_delete_transaction(ctx.scheme_id, id)
            .await?;
        Ok(())
    }

    /// Builds a trial balance for the date range
    pub async fn trial_balance_report(
        &self,
        ctx: &RequestContext,
        range: DateRange,
    ) -> Result<TrialBalance, LedgerError> {
        let lines = self.store.list_posted_lines(ctx.scheme_id, range).await?;
        Ok(trial_balance(&lines))
    }

    /// Builds the per-fund balance summary for the date range
    pub async fn fund_balance_report(
        &self,
        ctx: &RequestContext,
        range: DateRange,
    ) -> Result<Vec<FundBalance>, LedgerError> {
        let opening = self
            .store
            .opening_fund_balances(ctx.scheme_id, range.start)
            .await?;
        let movements = self
            .store
            .list_fund_movements(ctx.scheme_id, range)
            .await?;
        Ok(fund_balance_summary(opening, &movements))
    }

    /// Builds the income statement for the date range
    pub async fn income_statement_report(
        &self,
        ctx: &RequestContext,
        range: DateRange,
    ) -> Result<IncomeStatement, LedgerError> {
        let movements = self
            .store
            .list_category_movements(ctx.scheme_id, range)
            .await?;
        Ok(income_statement(&movements))
    }

    /// Renders a report to document bytes and uploads it
    ///
    /// Rendering failure is a hard error. An upload failure after a
    /// successful render returns the bytes with a warning, so the caller
    /// never loses a generated document.
    pub async fn render_report<T: Serialize>(
        &self,
        ctx: &RequestContext,
        template_name: &str,
        report: &T,
    ) -> Result<Outcome<RenderedReport>, LedgerError> {
        let renderer = self.renderer.as_ref().ok_or_else(|| {
            LedgerError::Validation("No document renderer is configured".to_string())
        })?;
        let blobs = self.blobs.as_ref().ok_or_else(|| {
            LedgerError::Validation("No blob store is configured".to_string())
        })?;

        let data = serde_json::to_value(report)
            .map_err(|e| LedgerError::Validation(format!("Unserializable report data: {e}")))?;
        let bytes = renderer
            .render(template_name, json!({ "scheme_id": ctx.scheme_id, "report": data }))
            .await?;

        let path = format!(
            "reports/{}/{}-{}.pdf",
            ctx.scheme_id,
            template_name,
            chrono::Utc::now().format("%Y%m%d%H%M%S")
        );

        match blobs.upload(&path, bytes.clone(), "application/pdf").await {
            Ok(()) => Ok(Outcome::ok(RenderedReport {
                path: Some(path),
                bytes,
            })),
            Err(err) => {
                warn!(
                    scheme_id = %ctx.scheme_id,
                    template = template_name,
                    error = %err,
                    "Report rendered but upload failed"
                );
                Ok(Outcome::with_warning(
                    RenderedReport { path: None, bytes },
                    format!("Report was generated but could not be uploaded: {err}"),
                ))
            }
        }
    }
}
