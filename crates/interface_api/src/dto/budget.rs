//! Budget DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::FundType;
use domain_budget::{Budget, BudgetLineItem, BudgetWithLines};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBudgetDto {
    #[validate(range(min = 2000, max = 2100))]
    pub financial_year: i32,
    pub fund_type: FundType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertLineDto {
    /// Existing line to edit; absent creates a new line
    pub line_id: Option<Uuid>,
    #[validate(length(min = 1, max = 20))]
    pub category_code: String,
    #[validate(length(min = 1, max = 200))]
    pub category_name: String,
    pub budgeted_amount: Decimal,
    pub prior_year_actual: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub id: Uuid,
    pub financial_year: i32,
    pub fund_type: FundType,
    pub status: String,
    pub total_amount: Decimal,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Budget> for BudgetResponse {
    fn from(b: Budget) -> Self {
        Self {
            id: *b.id.as_uuid(),
            financial_year: b.financial_year,
            fund_type: b.fund_type,
            status: b.status.as_str().to_string(),
            total_amount: b.total_amount.amount(),
            approved_at: b.approved_at,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetLineResponse {
    pub id: Uuid,
    pub category_code: String,
    pub category_name: String,
    pub budgeted_amount: Decimal,
    pub prior_year_actual: Option<Decimal>,
}

impl From<BudgetLineItem> for BudgetLineResponse {
    fn from(l: BudgetLineItem) -> Self {
        Self {
            id: *l.id.as_uuid(),
            category_code: l.category_code,
            category_name: l.category_name,
            budgeted_amount: l.budgeted_amount.amount(),
            prior_year_actual: l.prior_year_actual.map(|m| m.amount()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BudgetWithLinesResponse {
    #[serde(flatten)]
    pub budget: BudgetResponse,
    pub lines: Vec<BudgetLineResponse>,
}

impl From<BudgetWithLines> for BudgetWithLinesResponse {
    fn from(b: BudgetWithLines) -> Self {
        Self {
            budget: b.budget.into(),
            lines: b.lines.into_iter().map(Into::into).collect(),
        }
    }
}
