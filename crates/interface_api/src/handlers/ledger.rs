//! Ledger and report handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{
    AccountId, Currency, DateRange, Money, RequestContext, SchemeId, TransactionId,
};
use domain_ledger::{
    FundBalance, IncomeStatement, PostingInput, RecordTransactionRequest, TrialBalance,
};

use crate::dto::ledger::{
    AccountResponse, RecordTransactionDto, ReportRangeQuery, TransactionResponse,
};
use crate::error::ApiError;
use crate::AppState;

fn ctx(scheme_id: Uuid) -> RequestContext {
    RequestContext::for_scheme(SchemeId::from_uuid(scheme_id))
}

fn range(query: ReportRangeQuery) -> Result<DateRange, ApiError> {
    DateRange::new(query.from, query.to).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Seeds the standard chart of accounts for a scheme
pub async fn setup_chart(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let chart = state.reporting.setup_chart(&ctx(scheme_id)).await?;
    Ok(Json(chart.into_iter().map(Into::into).collect()))
}

/// Lists a scheme's chart of accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.reporting.list_accounts(&ctx(scheme_id)).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Records a balanced double-entry transaction
pub async fn record_transaction(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Json(dto): Json<RecordTransactionDto>,
) -> Result<Json<TransactionResponse>, ApiError> {
    dto.validate()?;
    let currency = Currency::default();
    let request = RecordTransactionRequest {
        transaction_date: dto.transaction_date,
        transaction_type: dto.transaction_type,
        fund_type: dto.fund_type,
        category_code: dto.category_code,
        description: dto.description,
        lines: dto
            .lines
            .into_iter()
            .map(|l| PostingInput {
                account_id: AccountId::from_uuid(l.account_id),
                line_type: l.line_type,
                amount: Money::new(l.amount, currency),
            })
            .collect(),
    };
    let transaction = state
        .reporting
        .record_transaction(&ctx(scheme_id), request)
        .await?;
    Ok(Json(transaction.into()))
}

/// Soft-deletes a transaction, removing it from all reports
pub async fn remove_transaction(
    State(state): State<AppState>,
    Path((scheme_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .reporting
        .remove_transaction(&ctx(scheme_id), TransactionId::from_uuid(id))
        .await?;
    Ok(Json(serde_json::json!({ "result": "deleted" })))
}

/// Builds a trial balance for the date range
pub async fn trial_balance(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<TrialBalance>, ApiError> {
    let report = state
        .reporting
        .trial_balance_report(&ctx(scheme_id), range(query)?)
        .await?;
    Ok(Json(report))
}

/// Builds the per-fund balance summary for the date range
pub async fn fund_balances(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<Vec<FundBalance>>, ApiError> {
    let report = state
        .reporting
        .fund_balance_report(&ctx(scheme_id), range(query)?)
        .await?;
    Ok(Json(report))
}

/// Builds the income statement for the date range
pub async fn income_statement(
    State(state): State<AppState>,
    Path(scheme_id): Path<Uuid>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<IncomeStatement>, ApiError> {
    let report = state
        .reporting
        .income_statement_report(&ctx(scheme_id), range(query)?)
        .await?;
    Ok(Json(report))
}
