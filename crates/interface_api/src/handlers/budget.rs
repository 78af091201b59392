//! Budget handlers

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{
    BudgetId, BudgetLineId, Currency, DateRange, Money, RequestContext, SchemeId,
};
use domain_budget::{BudgetVsActualRow, CategoryActual, CreateBudgetRequest, UpsertLineRequest};

use crate::dto::budget::{
    BudgetResponse, BudgetWithLinesResponse, CreateBudgetDto, UpsertLineDto,
};
use crate::error::ApiError;
use crate::AppState;

fn ctx(scheme_id: Uuid) -> RequestContext {
    RequestContext::for_scheme(SchemeId::from_uuid(scheme_id))
}

/// Creates a draft budget for a financial year and fund
pub async fn create_budget(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Json(dto): Json<CreateBudgetDto>,
) -> Result<Json<BudgetResponse>, ApiError> {
    dto.validate()?;
    let request = CreateBudgetRequest {
        financial_year: dto.financial_year,
        fund_type: dto.fund_type,
    };
    let budget = state.budgets.create_budget(&ctx(scheme_id), request).await?;
    Ok(Json(budget.into()))
}

/// Lists a scheme's budgets
pub async fn list_budgets(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
) -> Result<Json<Vec<BudgetResponse>>, ApiError> {
    let budgets = state.budgets.list_budgets(&ctx(scheme_id)).await?;
    Ok(Json(budgets.into_iter().map(Into::into).collect()))
}

/// Fetches a budget with its line items
pub async fn get_budget(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BudgetWithLinesResponse>, ApiError> {
    let budget = state
        .budgets
        .get_budget(&ctx(scheme_id), BudgetId::from_uuid(id))
        .await?;
    Ok(Json(budget.into()))
}

/// Adds or edits one budget line
pub async fn upsert_line(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<UpsertLineDto>,
) -> Result<Json<BudgetWithLinesResponse>, ApiError> {
    dto.validate()?;
    let currency = Currency::default();
    let request = UpsertLineRequest {
        line_id: dto.line_id.map(BudgetLineId::from_uuid),
        category_code: dto.category_code,
        category_name: dto.category_name,
        budgeted_amount: Money::new(dto.budgeted_amount, currency),
        prior_year_actual: dto.prior_year_actual.map(|a| Money::new(a, currency)),
    };
    let budget = state
        .budgets
        .upsert_line(&ctx(scheme_id), BudgetId::from_uuid(id), request)
        .await?;
    Ok(Json(budget.into()))
}

/// Removes one budget line
pub async fn remove_line(
    State(state): State<AppState>,
    Path((scheme_id, id, line_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<BudgetWithLinesResponse>, ApiError> {
    let budget = state
        .budgets
        .remove_line(
            &ctx(scheme_id),
            BudgetId::from_uuid(id),
            BudgetLineId::from_uuid(line_id),
        )
        .await?;
    Ok(Json(budget.into()))
}

/// Submits a draft budget for review
pub async fn submit_for_review(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let budget = state
        .budgets
        .submit_for_review(&ctx(scheme_id), BudgetId::from_uuid(id))
        .await?;
    Ok(Json(budget.into()))
}

/// Approves a budget
pub async fn approve(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let budget = state
        .budgets
        .approve(&ctx(scheme_id), BudgetId::from_uuid(id))
        .await?;
    Ok(Json(budget.into()))
}

/// Reopens an approved budget for amendment
pub async fn amend(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let budget = state
        .budgets
        .amend(&ctx(scheme_id), BudgetId::from_uuid(id))
        .await?;
    Ok(Json(budget.into()))
}

/// Deletes a draft budget
pub async fn delete_budget(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .budgets
        .delete_budget(&ctx(scheme_id), BudgetId::from_uuid(id))
        .await?;
    Ok(Json(serde_json::json!({ "result": "deleted" })))
}

/// Builds the budget-vs-actual variance report
///
/// Actuals come from the ledger's expense categories for the budget's
/// fund over its financial year (July through June).
pub async fn variance_report(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<BudgetVsActualRow>>, ApiError> {
    let ctx = ctx(scheme_id);
    let budget_id = BudgetId::from_uuid(id);
    let budget = state.budgets.get_budget(&ctx, budget_id).await?.budget;

    let range = fiscal_year_range(budget.financial_year)
        .ok_or_else(|| ApiError::BadRequest("Financial year out of range".to_string()))?;
    let statement = state.reporting.income_statement_report(&ctx, range).await?;
    let actuals: Vec<CategoryActual> = statement
        .funds
        .into_iter()
        .filter(|f| f.fund_type == budget.fund_type)
        .flat_map(|f| f.expenses)
        .map(|row| CategoryActual {
            category_code: row.category_code,
            actual: row.total,
        })
        .collect();

    let report = state
        .budgets
        .budget_vs_actual_report(&ctx, budget_id, &actuals)
        .await?;
    Ok(Json(report))
}

/// The July–June date range for a financial year named by its ending
/// calendar year
fn fiscal_year_range(financial_year: i32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(financial_year - 1, 7, 1)?;
    let end = NaiveDate::from_ymd_opt(financial_year, 6, 30)?;
    DateRange::new(start, end).ok()
}
