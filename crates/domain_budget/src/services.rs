//! Budget orchestration
//!
//! `BudgetService` owns the duplicate check per (scheme, financial year,
//! fund), the approval workflow transitions, and the recomputation of the
//! cached budget total on every line edit.

use std::sync::Arc;

use tracing::info;

use core_kernel::{BudgetId, BudgetLineId, FundType, Money, RequestContext};

use crate::budget::{Budget, BudgetLineItem, BudgetStatus};
use crate::error::BudgetError;
use crate::ports::BudgetStore;
use crate::variance::{budget_vs_actual, BudgetVsActualRow, CategoryActual};

/// Request for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetRequest {
    pub financial_year: i32,
    pub fund_type: FundType,
}

/// Request for adding or editing one budget line
#[derive(Debug, Clone)]
pub struct UpsertLineRequest {
    /// Existing line to edit; None creates a new line
    pub line_id: Option<BudgetLineId>,
    pub category_code: String,
    pub category_name: String,
    pub budgeted_amount: Money,
    pub prior_year_actual: Option<Money>,
}

/// A budget together with its line items
#[derive(Debug, Clone)]
pub struct BudgetWithLines {
    pub budget: Budget,
    pub lines: Vec<BudgetLineItem>,
}

/// Orchestrates budget lifecycle and variance reporting
pub struct BudgetService {
    store: Arc<dyn BudgetStore>,
}

impl BudgetService {
    /// Creates a new budget service backed by the given store
    pub fn new(store: Arc<dyn BudgetStore>) -> Self {
        Self { store }
    }

    /// Creates a draft budget
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Conflict` when the scheme already has a
    /// budget for the same financial year and fund.
    pub async fn create_budget(
        &self,
        ctx: &RequestContext,
        request: CreateBudgetRequest,
    ) -> Result<Budget, BudgetError> {
        if let Some(existing) = self
            .store
            .find_budget(ctx.scheme_id, request.financial_year, request.fund_type)
            .await?
        {
            return Err(BudgetError::Conflict(format!(
                "Budget {} already exists for FY{} {}",
                existing.id, request.financial_year, request.fund_type
            )));
        }

        let budget = Budget::new(ctx.scheme_id, request.financial_year, request.fund_type);
        self.store.insert_budget(&budget).await?;
        info!(
            budget_id = %budget.id,
            scheme_id = %ctx.scheme_id,
            financial_year = request.financial_year,
            fund = %request.fund_type,
            "Created budget"
        );
        Ok(budget)
    }

    /// Fetches a budget with its line items
    pub async fn get_budget(
        &self,
        ctx: &RequestContext,
        id: BudgetId,
    ) -> Result<BudgetWithLines, BudgetError> {
        let budget = self.store.get_budget(ctx.scheme_id, id).await?;
        let lines = self.store.list_lines(id).await?;
        Ok(BudgetWithLines { budget, lines })
    }

    /// Lists a scheme's budgets
    pub async fn list_budgets(&self, ctx: &RequestContext) -> Result<Vec<Budget>, BudgetError> {
        Ok(self.store.list_budgets(ctx.scheme_id).await?)
    }

    /// Adds or edits one budget line, recomputing the cached total
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Conflict` when the budget is not editable in
    /// its current status.
    pub async fn upsert_line(
        &self,
        ctx: &RequestContext,
        budget_id: BudgetId,
        request: UpsertLineRequest,
    ) -> Result<BudgetWithLines, BudgetError> {
        let mut budget = self.store.get_budget(ctx.scheme_id, budget_id).await?;
        if !budget.is_editable() {
            return Err(BudgetError::Conflict(format!(
                "Budget lines cannot be edited while the budget is {}",
                budget.status
            )));
        }
        if request.budgeted_amount.is_negative() {
            return Err(BudgetError::Validation(
                "Budgeted amounts cannot be negative".to_string(),
            ));
        }

        match request.line_id {
            Some(line_id) => {
                let lines = self.store.list_lines(budget_id).await?;
                let mut line = lines
                    .into_iter()
                    .find(|l| l.id == line_id)
                    .ok_or_else(|| BudgetError::NotFound {
                        entity_type: "BudgetLineItem".to_string(),
                        id: line_id.to_string(),
                    })?;
                line.category_code = request.category_code;
                line.category_name = request.category_name;
                line.budgeted_amount = request.budgeted_amount;
                line.prior_year_actual = request.prior_year_actual;
                self.store.update_line(&line).await?;
            }
            None => {
                let line = BudgetLineItem::new(
                    budget_id,
                    request.category_code,
                    request.category_name,
                    request.budgeted_amount,
                    request.prior_year_actual,
                );
                self.store.insert_line(&line).await?;
            }
        }

        // The total is a derived cache, refreshed on every line edit.
        let lines = self.store.list_lines(budget_id).await?;
        budget.recompute_total(&lines);
        self.store.update_budget(&budget).await?;

        Ok(BudgetWithLines { budget, lines })
    }

    /// Removes one budget line, recomputing the cached total
    pub async fn remove_line(
        &self,
        ctx: &RequestContext,
        budget_id: BudgetId,
        line_id: BudgetLineId,
    ) -> Result<BudgetWithLines, BudgetError> {
        let mut budget = self.store.get_budget(ctx.scheme_id, budget_id).await?;
        if !budget.is_editable() {
            return Err(BudgetError::Conflict(format!(
                "Budget lines cannot be edited while the budget is {}",
                budget.status
            )));
        }

        self.store.delete_line(line_id).await?;
        let lines = self.store.list_lines(budget_id).await?;
        budget.recompute_total(&lines);
        self.store.update_budget(&budget).await?;

        Ok(BudgetWithLines { budget, lines })
    }

    /// Submits a draft budget for review
    pub async fn submit_for_review(
        &self,
        ctx: &RequestContext,
        id: BudgetId,
    ) -> Result<Budget, BudgetError> {
        let mut budget = self.store.get_budget(ctx.scheme_id, id).await?;
        budget.submit_for_review()?;
        self.store.update_budget(&budget).await?;
        Ok(budget)
    }

    /// Approves a draft or review budget
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        id: BudgetId,
    ) -> Result<Budget, BudgetError> {
        let mut budget = self.store.get_budget(ctx.scheme_id, id).await?;
        budget.approve()?;
        self.store.update_budget(&budget).await?;
        info!(budget_id = %id, "Approved budget");
        Ok(budget)
    }

    /// Reopens an approved budget for amendment
    pub async fn amend(&self, ctx: &RequestContext, id: BudgetId) -> Result<Budget, BudgetError> {
        let mut budget = self.store.get_budget(ctx.scheme_id, id).await?;
        budget.amend()?;
        self.store.update_budget(&budget).await?;
        Ok(budget)
    }

    /// Deletes a budget
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Conflict` unless the budget is still a
    /// draft.
    pub async fn delete_budget(
        &self,
        ctx: &RequestContext,
        id: BudgetId,
    ) -> Result<(), BudgetError> {
        let budget = self.store.get_budget(ctx.scheme_id, id).await?;
        if budget.status != BudgetStatus::Draft {
            return Err(BudgetError::Conflict(format!(
                "Only a draft budget can be deleted, status is {}",
                budget.status
            )));
        }
        self.store.delete_budget(id).await?;
        info!(budget_id = %id, "Deleted draft budget");
        Ok(())
    }

    /// Builds the budget-vs-actual report for a budget
    ///
    /// The actuals are fetched by the caller (typically from the ledger's
    /// categorised movements for the budget's financial year) and passed
    /// in, keeping this domain independent of the ledger's store.
    pub async fn budget_vs_actual_report(
        &self,
        ctx: &RequestContext,
        budget_id: BudgetId,
        actuals: &[CategoryActual],
    ) -> Result<Vec<BudgetVsActualRow>, BudgetError> {
        let lines = {
            // Ownership check before reading lines.
            self.store.get_budget(ctx.scheme_id, budget_id).await?;
            self.store.list_lines(budget_id).await?
        };
        Ok(budget_vs_actual(&lines, actuals))
    }
}
