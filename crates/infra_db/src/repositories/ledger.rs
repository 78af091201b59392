//! Ledger store adapter
//!
//! Implements `LedgerStore` over PostgreSQL. A transaction and its posting
//! lines are written atomically; report reads exclude soft-deleted
//! transactions in SQL so the reducers never see them.
//!
//! Movement amounts are the debit-side sum of each transaction's lines,
//! which for a balanced transaction equals the credit-side sum.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{
    AccountId, Currency, DateRange, DomainPort, Money, PortError, SchemeId, TransactionId,
};
use domain_ledger::{
    CategoryMovement, FundMovement, FundOpeningBalances, LedgerAccount, LedgerStore, PostedLine,
    Transaction, TransactionLine,
};

use crate::error::sqlx_to_port;
use crate::repositories::{money_from_row, parse_column};

/// PostgreSQL-backed ledger store
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Creates a new ledger store over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgLedgerStore {}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    scheme_id: Uuid,
    code: String,
    name: String,
    account_type: String,
    fund_type: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_domain(self) -> Result<LedgerAccount, PortError> {
        Ok(LedgerAccount {
            id: AccountId::from_uuid(self.id),
            scheme_id: SchemeId::from_uuid(self.scheme_id),
            code: self.code,
            name: self.name,
            account_type: parse_column(&self.account_type, "account_type")?,
            fund_type: self
                .fund_type
                .as_deref()
                .map(|f| parse_column(f, "fund_type"))
                .transpose()?,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostedLineRow {
    account_id: Uuid,
    account_code: String,
    account_name: String,
    line_type: String,
    amount: Decimal,
    currency: String,
}

impl PostedLineRow {
    fn into_domain(self) -> Result<PostedLine, PortError> {
        Ok(PostedLine {
            account_id: AccountId::from_uuid(self.account_id),
            account_code: self.account_code,
            account_name: self.account_name,
            line_type: parse_column(&self.line_type, "line_type")?,
            amount: money_from_row(self.amount, &self.currency)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FundMovementRow {
    fund_type: String,
    transaction_type: String,
    amount: Decimal,
    currency: String,
}

impl FundMovementRow {
    fn into_domain(self) -> Result<FundMovement, PortError> {
        Ok(FundMovement {
            fund_type: parse_column(&self.fund_type, "fund_type")?,
            transaction_type: parse_column(&self.transaction_type, "transaction_type")?,
            amount: money_from_row(self.amount, &self.currency)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CategoryMovementRow {
    category_code: String,
    category_name: String,
    fund_type: String,
    transaction_type: String,
    amount: Decimal,
    currency: String,
}

impl CategoryMovementRow {
    fn into_domain(self) -> Result<CategoryMovement, PortError> {
        Ok(CategoryMovement {
            category_code: self.category_code,
            category_name: self.category_name,
            fund_type: parse_column(&self.fund_type, "fund_type")?,
            transaction_type: parse_column(&self.transaction_type, "transaction_type")?,
            amount: money_from_row(self.amount, &self.currency)?,
        })
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn insert_accounts(&self, accounts: &[LedgerAccount]) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_to_port)?;
        for account in accounts {
            sqlx::query(
                r#"
                INSERT INTO ledger_accounts (
                    id, scheme_id, code, name, account_type, fund_type,
                    is_active, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(account.id.as_uuid())
            .bind(account.scheme_id.as_uuid())
            .bind(&account.code)
            .bind(&account.name)
            .bind(account.account_type.as_str())
            .bind(account.fund_type.map(|f| f.as_str()))
            .bind(account.is_active)
            .bind(account.created_at)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_to_port)?;
        }
        tx.commit().await.map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn list_accounts(&self, scheme_id: SchemeId) -> Result<Vec<LedgerAccount>, PortError> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            "SELECT * FROM ledger_accounts WHERE scheme_id = $1 AND is_active ORDER BY code",
        )
        .bind(scheme_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(AccountRow::into_domain).collect()
    }

    async fn insert_transaction(
        &self,
        transaction: &Transaction,
        lines: &[TransactionLine],
    ) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_to_port)?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, scheme_id, transaction_date, transaction_type, fund_type,
                category_code, description, is_deleted, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.scheme_id.as_uuid())
        .bind(transaction.transaction_date)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.fund_type.as_str())
        .bind(&transaction.category_code)
        .bind(&transaction.description)
        .bind(transaction.is_deleted)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await
        .map_err(sqlx_to_port)?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (
                    id, transaction_id, account_id, line_type, amount, currency
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(line.id.as_uuid())
            .bind(line.transaction_id.as_uuid())
            .bind(line.account_id.as_uuid())
            .bind(line.line_type.as_str())
            .bind(line.amount.amount())
            .bind(line.amount.currency().code())
            .execute(&mut *tx)
            .await
            .map_err(sqlx_to_port)?;
        }

        tx.commit().await.map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn soft_delete_transaction(
        &self,
        scheme_id: SchemeId,
        id: TransactionId,
    ) -> Result<(), PortError> {
        let result = sqlx::query(
            "UPDATE transactions SET is_deleted = TRUE WHERE id = $1 AND scheme_id = $2",
        )
        .bind(id.as_uuid())
        .bind(scheme_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        if result.rows_affected() == 0 {
            return Err(PortError::not_found("Transaction", id));
        }
        Ok(())
    }

    async fn list_posted_lines(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<PostedLine>, PortError> {
        let rows: Vec<PostedLineRow> = sqlx::query_as(
            r#"
            SELECT
                l.account_id,
                a.code AS account_code,
                a.name AS account_name,
                l.line_type,
                l.amount,
                l.currency
            FROM transaction_lines l
            JOIN transactions t ON t.id = l.transaction_id
            JOIN ledger_accounts a ON a.id = l.account_id
            WHERE t.scheme_id = $1
              AND NOT t.is_deleted
              AND t.transaction_date BETWEEN $2 AND $3
            ORDER BY a.code
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(PostedLineRow::into_domain).collect()
    }

    async fn list_fund_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<FundMovement>, PortError> {
        let rows: Vec<FundMovementRow> = sqlx::query_as(
            r#"
            SELECT
                t.fund_type,
                t.transaction_type,
                COALESCE(SUM(l.amount), 0) AS amount,
                MIN(l.currency) AS currency
            FROM transactions t
            JOIN transaction_lines l
              ON l.transaction_id = t.id AND l.line_type = 'debit'
            WHERE t.scheme_id = $1
              AND NOT t.is_deleted
              AND t.transaction_date BETWEEN $2 AND $3
            GROUP BY t.fund_type, t.transaction_type
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(FundMovementRow::into_domain).collect()
    }

    async fn list_category_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<CategoryMovement>, PortError> {
        let rows: Vec<CategoryMovementRow> = sqlx::query_as(
            r#"
            SELECT
                t.category_code,
                COALESCE(MIN(a.name), t.category_code) AS category_name,
                t.fund_type,
                t.transaction_type,
                COALESCE(SUM(l.amount), 0) AS amount,
                MIN(l.currency) AS currency
            FROM transactions t
            JOIN transaction_lines l
              ON l.transaction_id = t.id AND l.line_type = 'debit'
            LEFT JOIN ledger_accounts a
              ON a.scheme_id = t.scheme_id AND a.code = t.category_code
            WHERE t.scheme_id = $1
              AND NOT t.is_deleted
              AND t.transaction_date BETWEEN $2 AND $3
            GROUP BY t.category_code, t.fund_type, t.transaction_type
            ORDER BY t.category_code
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter()
            .map(CategoryMovementRow::into_domain)
            .collect()
    }

    async fn opening_fund_balances(
        &self,
        scheme_id: SchemeId,
        before: NaiveDate,
    ) -> Result<FundOpeningBalances, PortError> {
        let rows: Vec<(String, Decimal)> = sqlx::query_as(
            r#"
            SELECT
                t.fund_type,
                COALESCE(SUM(
                    CASE WHEN t.transaction_type = 'receipt'
                         THEN l.amount
                         ELSE -l.amount
                    END
                ), 0) AS net
            FROM transactions t
            JOIN transaction_lines l
              ON l.transaction_id = t.id AND l.line_type = 'debit'
            WHERE t.scheme_id = $1
              AND NOT t.is_deleted
              AND t.transaction_date < $2
            GROUP BY t.fund_type
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(before)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        let mut opening = FundOpeningBalances::zero(Currency::default());
        for (fund, net) in rows {
            let amount = Money::new(net, Currency::default());
            match fund.as_str() {
                "admin" => opening.admin = amount,
                "capital_works" => opening.capital_works = amount,
                other => {
                    return Err(PortError::internal(format!(
                        "Bad fund_type column: {other}"
                    )))
                }
            }
        }
        Ok(opening)
    }
}
