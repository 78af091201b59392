//! ReportingService tests against an in-memory store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{
    AccountId, BlobStore, Currency, DateRange, DocumentRenderer, DomainPort, FundType, Money,
    PortError, RequestContext, SchemeId, TransactionId,
};
use domain_ledger::{
    CategoryMovement, FundMovement, FundOpeningBalances, LedgerAccount, LedgerStore, LineType,
    PostedLine, PostingInput, RecordTransactionRequest, ReportingService, Transaction,
    TransactionLine, TransactionType,
};

#[derive(Default)]
struct State {
    accounts: Vec<LedgerAccount>,
    transactions: Vec<(Transaction, Vec<TransactionLine>)>,
}

#[derive(Default)]
struct InMemoryLedgerStore {
    state: Mutex<State>,
}

impl InMemoryLedgerStore {
    fn transaction_amount(lines: &[TransactionLine]) -> Money {
        // Balanced double entry: the debit side total is the movement size.
        lines
            .iter()
            .filter(|l| l.line_type == LineType::Debit)
            .fold(Money::zero(Currency::AUD), |acc, l| acc + l.amount)
    }
}

impl DomainPort for InMemoryLedgerStore {}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_accounts(&self, accounts: &[LedgerAccount]) -> Result<(), PortError> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .extend(accounts.iter().cloned());
        Ok(())
    }

    async fn list_accounts(&self, scheme_id: SchemeId) -> Result<Vec<LedgerAccount>, PortError> {
        let state = self.state.lock().unwrap();
        let mut accounts: Vec<LedgerAccount> = state
            .accounts
            .iter()
            .filter(|a| a.scheme_id == scheme_id && a.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn insert_transaction(
        &self,
        transaction: &Transaction,
        lines: &[TransactionLine],
    ) -> Result<(), PortError> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .push((transaction.clone(), lines.to_vec()));
        Ok(())
    }

    async fn soft_delete_transaction(
        &self,
        scheme_id: SchemeId,
        id: TransactionId,
    ) -> Result<(), PortError> {
        let mut state = self.state.lock().unwrap();
        for (transaction, _) in &mut state.transactions {
            if transaction.id == id && transaction.scheme_id == scheme_id {
                transaction.is_deleted = true;
                return Ok(());
            }
        }
        Err(PortError::not_found("Transaction", id))
    }

    async fn list_posted_lines(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<PostedLine>, PortError> {
        let state = self.state.lock().unwrap();
        let accounts: HashMap<AccountId, LedgerAccount> = state
            .accounts
            .iter()
            .map(|a| (a.id, a.clone()))
            .collect();
        let mut posted = Vec::new();
        for (transaction, lines) in &state.transactions {
            if transaction.scheme_id != scheme_id
                || transaction.is_deleted
                || !range.contains(transaction.transaction_date)
            {
                continue;
            }
            for line in lines {
                let account = accounts
                    .get(&line.account_id)
                    .ok_or_else(|| PortError::not_found("LedgerAccount", line.account_id))?;
                posted.push(PostedLine {
                    account_id: line.account_id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    line_type: line.line_type,
                    amount: line.amount,
                });
            }
        }
        Ok(posted)
    }

    async fn list_fund_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<FundMovement>, PortError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|(t, _)| {
                t.scheme_id == scheme_id && !t.is_deleted && range.contains(t.transaction_date)
            })
            .map(|(t, lines)| FundMovement {
                fund_type: t.fund_type,
                transaction_type: t.transaction_type,
                amount: Self::transaction_amount(lines),
            })
            .collect())
    }

    async fn list_category_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<CategoryMovement>, PortError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|(t, _)| {
                t.scheme_id == scheme_id && !t.is_deleted && range.contains(t.transaction_date)
            })
            .map(|(t, lines)| CategoryMovement {
                category_code: t.category_code.clone(),
                category_name: t.description.clone(),
                fund_type: t.fund_type,
                transaction_type: t.transaction_type,
                amount: Self::transaction_amount(lines),
            })
            .collect())
    }

    async fn opening_fund_balances(
        &self,
        scheme_id: SchemeId,
        before: NaiveDate,
    ) -> Result<FundOpeningBalances, PortError> {
        let state = self.state.lock().unwrap();
        let mut opening = FundOpeningBalances::zero(Currency::AUD);
        for (transaction, lines) in &state.transactions {
            if transaction.scheme_id != scheme_id
                || transaction.is_deleted
                || transaction.transaction_date >= before
            {
                continue;
            }
            let amount = Self::transaction_amount(lines);
            let signed = match transaction.transaction_type {
                TransactionType::Receipt => amount,
                TransactionType::Payment => -amount,
            };
            match transaction.fund_type {
                FundType::Admin => opening.admin = opening.admin + signed,
                FundType::CapitalWorks => {
                    opening.capital_works = opening.capital_works + signed
                }
            }
        }
        Ok(opening)
    }
}

struct StubRenderer;

#[async_trait]
impl DocumentRenderer for StubRenderer {
    async fn render(&self, template_name: &str, _data: serde_json::Value) -> Result<Vec<u8>, PortError> {
        Ok(format!("%PDF {template_name}").into_bytes())
    }
}

#[derive(Default)]
struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: bool,
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), PortError> {
        if self.fail_uploads {
            return Err(PortError::connection("simulated upload failure"));
        }
        self.blobs.lock().unwrap().insert(path.to_string(), bytes);
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, PortError> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| PortError::not_found("Blob", path))
    }

    async fn create_signed_url(&self, path: &str, _ttl_seconds: u64) -> Result<String, PortError> {
        Ok(format!("https://blobs.test/{path}?signed"))
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn aud(amount: rust_decimal::Decimal) -> Money {
    Money::new(amount, Currency::AUD)
}

fn fy2027() -> DateRange {
    DateRange::new(ymd(2026, 7, 1), ymd(2027, 6, 30)).unwrap()
}

fn setup() -> (Arc<InMemoryLedgerStore>, ReportingService, RequestContext) {
    let store = Arc::new(InMemoryLedgerStore::default());
    let service = ReportingService::new(store.clone());
    let ctx = RequestContext::for_scheme(SchemeId::new());
    (store, service, ctx)
}

/// Records one balanced receipt of `amount` into the admin levy income
/// account. The chart must already be seeded.
async fn record_levy_receipt(
    service: &ReportingService,
    ctx: &RequestContext,
    date: NaiveDate,
    amount: Money,
) -> Transaction {
    let accounts = service.list_accounts(ctx).await.unwrap();
    let cash = accounts.iter().find(|a| a.code == "1100").unwrap().id;
    let income = accounts.iter().find(|a| a.code == "4100").unwrap().id;

    service
        .record_transaction(
            ctx,
            RecordTransactionRequest {
                transaction_date: date,
                transaction_type: TransactionType::Receipt,
                fund_type: FundType::Admin,
                category_code: "4100".to_string(),
                description: "Levy receipt".to_string(),
                lines: vec![
                    PostingInput {
                        account_id: cash,
                        line_type: LineType::Debit,
                        amount,
                    },
                    PostingInput {
                        account_id: income,
                        line_type: LineType::Credit,
                        amount,
                    },
                ],
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_setup_chart_once() {
    let (_store, service, ctx) = setup();

    let chart = service.setup_chart(&ctx).await.unwrap();
    assert!(!chart.is_empty());

    let again = service.setup_chart(&ctx).await;
    assert!(matches!(again, Err(domain_ledger::LedgerError::Conflict(_))));
}

#[tokio::test]
async fn test_record_transaction_rejects_unbalanced_lines() {
    let (_store, service, ctx) = setup();
    service.setup_chart(&ctx).await.unwrap();
    let accounts = service.list_accounts(&ctx).await.unwrap();

    let result = service
        .record_transaction(
            &ctx,
            RecordTransactionRequest {
                transaction_date: ymd(2026, 8, 1),
                transaction_type: TransactionType::Receipt,
                fund_type: FundType::Admin,
                category_code: "4100".to_string(),
                description: "Bad entry".to_string(),
                lines: vec![
                    PostingInput {
                        account_id: accounts[0].id,
                        line_type: LineType::Debit,
                        amount: aud(dec!(100)),
                    },
                    PostingInput {
                        account_id: accounts[1].id,
                        line_type: LineType::Credit,
                        amount: aud(dec!(99)),
                    },
                ],
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(domain_ledger::LedgerError::Unbalanced { .. })
    ));
}

#[tokio::test]
async fn test_trial_balance_report_balances() {
    let (store, service, ctx) = setup();
    service.setup_chart(&ctx).await.unwrap();

    record_levy_receipt(&service, &ctx, ymd(2026, 8, 1), aud(dec!(450))).await;
    record_levy_receipt(&service, &ctx, ymd(2026, 11, 1), aud(dec!(450))).await;

    let tb = service.trial_balance_report(&ctx, fy2027()).await.unwrap();

    assert!(tb.is_balanced);
    assert_eq!(tb.total_debits, aud(dec!(900)));
    assert_eq!(tb.rows[0].account_code, "1100");
    assert_eq!(tb.rows[0].balance, aud(dec!(900)));
}

#[tokio::test]
async fn test_soft_deleted_transactions_excluded_from_reports() {
    let (store, service, ctx) = setup();
    service.setup_chart(&ctx).await.unwrap();

    let kept = record_levy_receipt(&service, &ctx, ymd(2026, 8, 1), aud(dec!(450))).await;
    let removed =
        record_levy_receipt(&service, &ctx, ymd(2026, 9, 1), aud(dec!(300))).await;
    service.remove_transaction(&ctx, removed.id).await.unwrap();

    let tb = service.trial_balance_report(&ctx, fy2027()).await.unwrap();
    assert_eq!(tb.total_debits, aud(dec!(450)));

    let statement = service
        .income_statement_report(&ctx, fy2027())
        .await
        .unwrap();
    assert_eq!(statement.total_income, aud(dec!(450)));
    let _ = kept;
}

#[tokio::test]
async fn test_fund_balance_report_rolls_forward_opening() {
    let (store, service, ctx) = setup();
    service.setup_chart(&ctx).await.unwrap();

    // Prior-year receipt forms the opening balance.
    record_levy_receipt(&service, &ctx, ymd(2026, 5, 1), aud(dec!(1000))).await;
    record_levy_receipt(&service, &ctx, ymd(2026, 8, 1), aud(dec!(450))).await;

    let summary = service.fund_balance_report(&ctx, fy2027()).await.unwrap();
    let admin = &summary[0];

    assert_eq!(admin.fund_type, FundType::Admin);
    assert_eq!(admin.opening_balance, aud(dec!(1000)));
    assert_eq!(admin.total_receipts, aud(dec!(450)));
    assert_eq!(admin.closing_balance, aud(dec!(1450)));
}

#[tokio::test]
async fn test_render_report_uploads_document() {
    let (store, _plain, ctx) = setup();
    let blobs = Arc::new(InMemoryBlobStore::default());
    let service = ReportingService::new(store)
        .with_rendering(Arc::new(StubRenderer), blobs.clone());

    let tb = domain_ledger::trial_balance(&[]);
    let outcome = service
        .render_report(&ctx, "trial-balance", &tb)
        .await
        .unwrap();

    assert!(outcome.is_clean());
    let path = outcome.value.path.unwrap();
    assert!(path.starts_with(&format!("reports/{}/trial-balance-", ctx.scheme_id)));
    assert!(blobs.blobs.lock().unwrap().contains_key(&path));
}

#[tokio::test]
async fn test_render_report_upload_failure_returns_bytes_with_warning() {
    let (store, _plain, ctx) = setup();
    let blobs = Arc::new(InMemoryBlobStore {
        fail_uploads: true,
        ..Default::default()
    });
    let service =
        ReportingService::new(store).with_rendering(Arc::new(StubRenderer), blobs);

    let tb = domain_ledger::trial_balance(&[]);
    let outcome = service
        .render_report(&ctx, "trial-balance", &tb)
        .await
        .unwrap();

    // Generated document is kept even though the upload failed.
    assert!(!outcome.is_clean());
    assert!(outcome.value.path.is_none());
    assert!(!outcome.value.bytes.is_empty());
    assert!(outcome.warning.unwrap().contains("uploaded"));
}
