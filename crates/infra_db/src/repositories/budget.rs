//! Budget store adapter
//!
//! Implements `BudgetStore` over PostgreSQL. Budgets are unique per
//! (scheme, financial year, fund); the database enforces that with a
//! unique index, surfaced as a conflict through the error mapping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{BudgetId, BudgetLineId, DomainPort, FundType, PortError, SchemeId};
use domain_budget::{Budget, BudgetLineItem, BudgetStore};

use crate::error::sqlx_to_port;
use crate::repositories::{money_from_row, parse_column};

/// PostgreSQL-backed budget store
#[derive(Debug, Clone)]
pub struct PgBudgetStore {
    pool: PgPool,
}

impl PgBudgetStore {
    /// Creates a new budget store over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgBudgetStore {}

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: Uuid,
    scheme_id: Uuid,
    financial_year: i32,
    fund_type: String,
    status: String,
    total_amount: Decimal,
    currency: String,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BudgetRow {
    fn into_domain(self) -> Result<Budget, PortError> {
        Ok(Budget {
            id: BudgetId::from_uuid(self.id),
            scheme_id: SchemeId::from_uuid(self.scheme_id),
            financial_year: self.financial_year,
            fund_type: parse_column(&self.fund_type, "fund_type")?,
            status: parse_column(&self.status, "status")?,
            total_amount: money_from_row(self.total_amount, &self.currency)?,
            approved_at: self.approved_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BudgetLineRow {
    id: Uuid,
    budget_id: Uuid,
    category_code: String,
    category_name: String,
    budgeted_amount: Decimal,
    prior_year_actual: Option<Decimal>,
    currency: String,
}

impl BudgetLineRow {
    fn into_domain(self) -> Result<BudgetLineItem, PortError> {
        Ok(BudgetLineItem {
            id: BudgetLineId::from_uuid(self.id),
            budget_id: BudgetId::from_uuid(self.budget_id),
            category_code: self.category_code,
            category_name: self.category_name,
            budgeted_amount: money_from_row(self.budgeted_amount, &self.currency)?,
            prior_year_actual: self
                .prior_year_actual
                .map(|a| money_from_row(a, &self.currency))
                .transpose()?,
        })
    }
}

#[async_trait]
impl BudgetStore for PgBudgetStore {
    async fn insert_budget(&self, budget: &Budget) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO budgets (
                id, scheme_id, financial_year, fund_type, status,
                total_amount, currency, approved_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(budget.id.as_uuid())
        .bind(budget.scheme_id.as_uuid())
        .bind(budget.financial_year)
        .bind(budget.fund_type.as_str())
        .bind(budget.status.as_str())
        .bind(budget.total_amount.amount())
        .bind(budget.total_amount.currency().code())
        .bind(budget.approved_at)
        .bind(budget.created_at)
        .bind(budget.updated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn get_budget(&self, scheme_id: SchemeId, id: BudgetId) -> Result<Budget, PortError> {
        let row: Option<BudgetRow> =
            sqlx::query_as("SELECT * FROM budgets WHERE id = $1 AND scheme_id = $2")
                .bind(id.as_uuid())
                .bind(scheme_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(sqlx_to_port)?;

        row.ok_or_else(|| PortError::not_found("Budget", id))?
            .into_domain()
    }

    async fn find_budget(
        &self,
        scheme_id: SchemeId,
        financial_year: i32,
        fund_type: FundType,
    ) -> Result<Option<Budget>, PortError> {
        let row: Option<BudgetRow> = sqlx::query_as(
            r#"
            SELECT * FROM budgets
            WHERE scheme_id = $1 AND financial_year = $2 AND fund_type = $3
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(financial_year)
        .bind(fund_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        row.map(BudgetRow::into_domain).transpose()
    }

    async fn list_budgets(&self, scheme_id: SchemeId) -> Result<Vec<Budget>, PortError> {
        let rows: Vec<BudgetRow> = sqlx::query_as(
            r#"
            SELECT * FROM budgets
            WHERE scheme_id = $1
            ORDER BY financial_year DESC, fund_type
            "#,
        )
        .bind(scheme_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(BudgetRow::into_domain).collect()
    }

    async fn update_budget(&self, budget: &Budget) -> Result<(), PortError> {
        sqlx::query(
            r#"
            UPDATE budgets SET
                status = $2, total_amount = $3, approved_at = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(budget.id.as_uuid())
        .bind(budget.status.as_str())
        .bind(budget.total_amount.amount())
        .bind(budget.approved_at)
        .bind(budget.updated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn delete_budget(&self, id: BudgetId) -> Result<(), PortError> {
        // Line items cascade via the budget foreign key.
        sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn insert_line(&self, line: &BudgetLineItem) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO budget_line_items (
                id, budget_id, category_code, category_name,
                budgeted_amount, prior_year_actual, currency
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(line.id.as_uuid())
        .bind(line.budget_id.as_uuid())
        .bind(&line.category_code)
        .bind(&line.category_name)
        .bind(line.budgeted_amount.amount())
        .bind(line.prior_year_actual.map(|m| m.amount()))
        .bind(line.budgeted_amount.currency().code())
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn update_line(&self, line: &BudgetLineItem) -> Result<(), PortError> {
        sqlx::query(
            r#"
            UPDATE budget_line_items SET
                category_code = $2, category_name = $3,
                budgeted_amount = $4, prior_year_actual = $5
            WHERE id = $1
            "#,
        )
        .bind(line.id.as_uuid())
        .bind(&line.category_code)
        .bind(&line.category_name)
        .bind(line.budgeted_amount.amount())
        .bind(line.prior_year_actual.map(|m| m.amount()))
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn delete_line(&self, id: BudgetLineId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM budget_line_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn list_lines(&self, budget_id: BudgetId) -> Result<Vec<BudgetLineItem>, PortError> {
        let rows: Vec<BudgetLineRow> = sqlx::query_as(
            "SELECT * FROM budget_line_items WHERE budget_id = $1 ORDER BY category_code",
        )
        .bind(budget_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(BudgetLineRow::into_domain).collect()
    }
}
