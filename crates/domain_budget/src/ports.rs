//! Budget Domain Ports

use async_trait::async_trait;

use core_kernel::{BudgetId, BudgetLineId, DomainPort, FundType, PortError, SchemeId};

use crate::budget::{Budget, BudgetLineItem};

/// Persistence port for the budget domain
#[async_trait]
pub trait BudgetStore: DomainPort {
    /// Persists a new budget
    async fn insert_budget(&self, budget: &Budget) -> Result<(), PortError>;

    /// Fetches a budget by id, scoped to a scheme
    async fn get_budget(&self, scheme_id: SchemeId, id: BudgetId) -> Result<Budget, PortError>;

    /// Finds a scheme's budget for a financial year and fund, if any
    async fn find_budget(
        &self,
        scheme_id: SchemeId,
        financial_year: i32,
        fund_type: FundType,
    ) -> Result<Option<Budget>, PortError>;

    /// Lists a scheme's budgets, newest financial year first
    async fn list_budgets(&self, scheme_id: SchemeId) -> Result<Vec<Budget>, PortError>;

    /// Writes back an updated budget
    async fn update_budget(&self, budget: &Budget) -> Result<(), PortError>;

    /// Hard-deletes a budget and its line items
    async fn delete_budget(&self, id: BudgetId) -> Result<(), PortError>;

    /// Persists a new line item
    async fn insert_line(&self, line: &BudgetLineItem) -> Result<(), PortError>;

    /// Writes back an updated line item
    async fn update_line(&self, line: &BudgetLineItem) -> Result<(), PortError>;

    /// Deletes a line item
    async fn delete_line(&self, id: BudgetLineId) -> Result<(), PortError>;

    /// Lists a budget's line items ordered by category code
    async fn list_lines(&self, budget_id: BudgetId) -> Result<Vec<BudgetLineItem>, PortError>;
}
