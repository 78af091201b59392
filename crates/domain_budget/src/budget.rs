//! Budgets and budget line items
//!
//! A budget is a planning record per (scheme, financial year, fund type),
//! with one line per chart-of-accounts category. The budget total is a
//! derived cache recomputed on every line edit, never maintained by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{BudgetId, BudgetLineId, Currency, FundType, Money, SchemeId};

use crate::error::BudgetError;

/// Budget approval workflow state
///
/// `draft → review → approved`; an approved budget moves to `amended`
/// when it is reopened for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Draft,
    Review,
    Approved,
    Amended,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Draft => "draft",
            BudgetStatus::Review => "review",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Amended => "amended",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BudgetStatus::Draft),
            "review" => Ok(BudgetStatus::Review),
            "approved" => Ok(BudgetStatus::Approved),
            "amended" => Ok(BudgetStatus::Amended),
            other => Err(BudgetError::Validation(format!(
                "Unknown budget status: {}",
                other
            ))),
        }
    }
}

/// One category's planned amount within a budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLineItem {
    /// Unique identifier
    pub id: BudgetLineId,
    /// Owning budget
    pub budget_id: BudgetId,
    /// Chart-of-accounts category code
    pub category_code: String,
    /// Category name at the time of budgeting
    pub category_name: String,
    /// Planned amount for the year
    pub budgeted_amount: Money,
    /// Snapshot of the prior year's actual, when available
    pub prior_year_actual: Option<Money>,
}

impl BudgetLineItem {
    /// Creates a new line item
    pub fn new(
        budget_id: BudgetId,
        category_code: impl Into<String>,
        category_name: impl Into<String>,
        budgeted_amount: Money,
        prior_year_actual: Option<Money>,
    ) -> Self {
        Self {
            id: BudgetLineId::new_v7(),
            budget_id,
            category_code: category_code.into(),
            category_name: category_name.into(),
            budgeted_amount,
            prior_year_actual,
        }
    }
}

/// A fund budget for one financial year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,
    /// Owning scheme
    pub scheme_id: SchemeId,
    /// Financial year the budget plans for, named by its ending calendar
    /// year (July–June convention, e.g. 2027 for FY2027)
    pub financial_year: i32,
    /// Fund being budgeted
    pub fund_type: FundType,
    /// Workflow state
    pub status: BudgetStatus,
    /// Derived cache: sum of line budgeted amounts
    pub total_amount: Money,
    /// Set when the budget is approved
    pub approved_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Creates a new draft budget
    pub fn new(scheme_id: SchemeId, financial_year: i32, fund_type: FundType) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new_v7(),
            scheme_id,
            financial_year,
            fund_type,
            status: BudgetStatus::Draft,
            total_amount: Money::zero(Currency::default()),
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether line items may currently be edited
    pub fn is_editable(&self) -> bool {
        matches!(
            self.status,
            BudgetStatus::Draft | BudgetStatus::Review | BudgetStatus::Amended
        )
    }

    /// Recomputes the cached total from the line items
    pub fn recompute_total(&mut self, lines: &[BudgetLineItem]) {
        let currency = lines
            .first()
            .map(|l| l.budgeted_amount.currency())
            .unwrap_or_default();
        self.total_amount = lines
            .iter()
            .fold(Money::zero(currency), |acc, l| acc + l.budgeted_amount);
        self.updated_at = Utc::now();
    }

    /// Moves a draft budget into review
    pub fn submit_for_review(&mut self) -> Result<(), BudgetError> {
        match self.status {
            BudgetStatus::Draft => {
                self.status = BudgetStatus::Review;
                self.updated_at = Utc::now();
                Ok(())
            }
            other => Err(BudgetError::Conflict(format!(
                "Only a draft budget can be submitted for review, status is {}",
                other
            ))),
        }
    }

    /// Approves the budget, recording the approval time
    pub fn approve(&mut self) -> Result<(), BudgetError> {
        match self.status {
            BudgetStatus::Draft | BudgetStatus::Review => {
                self.status = BudgetStatus::Approved;
                self.approved_at = Some(Utc::now());
                self.updated_at = Utc::now();
                Ok(())
            }
            other => Err(BudgetError::Conflict(format!(
                "Only a draft or review budget can be approved, status is {}",
                other
            ))),
        }
    }

    /// Reopens an approved budget for amendment
    pub fn amend(&mut self) -> Result<(), BudgetError> {
        match self.status {
            BudgetStatus::Approved => {
                self.status = BudgetStatus::Amended;
                self.updated_at = Utc::now();
                Ok(())
            }
            other => Err(BudgetError::Conflict(format!(
                "Only an approved budget can be amended, status is {}",
                other
            ))),
        }
    }
}
