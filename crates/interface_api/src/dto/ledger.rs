//! Ledger and reporting DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::FundType;
use domain_ledger::{LedgerAccount, LineType, Transaction, TransactionType};

#[derive(Debug, Deserialize, Validate)]
pub struct RecordTransactionDto {
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub fund_type: FundType,
    #[validate(length(min = 1, max = 20))]
    pub category_code: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    pub lines: Vec<PostingLineDto>,
}

#[derive(Debug, Deserialize)]
pub struct PostingLineDto {
    pub account_id: Uuid,
    pub line_type: LineType,
    pub amount: Decimal,
}

/// Inclusive reporting date range, as query parameters
#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub fund_type: Option<FundType>,
    pub is_active: bool,
}

impl From<LedgerAccount> for AccountResponse {
    fn from(a: LedgerAccount) -> Self {
        Self {
            id: *a.id.as_uuid(),
            code: a.code,
            name: a.name,
            account_type: a.account_type.as_str().to_string(),
            fund_type: a.fund_type,
            is_active: a.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub transaction_date: NaiveDate,
    pub transaction_type: TransactionType,
    pub fund_type: FundType,
    pub category_code: String,
    pub description: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: *t.id.as_uuid(),
            transaction_date: t.transaction_date,
            transaction_type: t.transaction_type,
            fund_type: t.fund_type,
            category_code: t.category_code,
            description: t.description,
        }
    }
}
