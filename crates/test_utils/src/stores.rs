//! In-memory store implementations
//!
//! Full implementations of the domain persistence ports over plain
//! `Mutex`-guarded maps, for service and API tests that should not touch
//! PostgreSQL. Locks are never held across an await point.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    BudgetId, BudgetLineId, Currency, DateRange, DomainPort, FundType, LevyItemId, LevyPeriodId,
    LevyScheduleId, LotId, Money, PaymentId, PortError, SchemeId, TransactionId,
};
use domain_budget::{Budget, BudgetLineItem, BudgetStore};
use domain_ledger::{
    CategoryMovement, FundMovement, FundOpeningBalances, LedgerAccount, LedgerStore, LineType,
    PostedLine, Transaction, TransactionLine, TransactionType,
};
use domain_levy::{LevyItem, LevyPeriod, LevySchedule, LevyStore, Payment, PaymentAllocation};

// ---------------------------------------------------------------------
// Levy store

#[derive(Default)]
struct LevyState {
    schedules: HashMap<LevyScheduleId, LevySchedule>,
    periods: HashMap<LevyPeriodId, LevyPeriod>,
    items: HashMap<LevyItemId, LevyItem>,
    payments: HashMap<PaymentId, Payment>,
    allocations: Vec<PaymentAllocation>,
}

/// In-memory `LevyStore`
#[derive(Default)]
pub struct InMemoryLevyStore {
    state: Mutex<LevyState>,
}

impl InMemoryLevyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds levy items directly, bypassing the service layer
    pub fn seed_items(&self, items: &[LevyItem]) {
        let mut state = self.state.lock().expect("lock poisoned");
        for item in items {
            state.items.insert(item.id, item.clone());
        }
    }

    /// Number of stored payments
    pub fn payment_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").payments.len()
    }

    /// Number of stored allocations
    pub fn allocation_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").allocations.len()
    }
}

impl DomainPort for InMemoryLevyStore {}

#[async_trait]
impl LevyStore for InMemoryLevyStore {
    async fn insert_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn get_schedule(
        &self,
        scheme_id: SchemeId,
        id: LevyScheduleId,
    ) -> Result<LevySchedule, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .schedules
            .get(&id)
            .filter(|s| s.scheme_id == scheme_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LevySchedule", id))
    }

    async fn list_schedules(&self, scheme_id: SchemeId) -> Result<Vec<LevySchedule>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut schedules: Vec<LevySchedule> = state
            .schedules
            .values()
            .filter(|s| s.scheme_id == scheme_id)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| b.budget_year_start.cmp(&a.budget_year_start));
        Ok(schedules)
    }

    async fn find_overlapping_schedule(
        &self,
        scheme_id: SchemeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<LevySchedule>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state
            .schedules
            .values()
            .find(|s| {
                s.scheme_id == scheme_id
                    && s.is_active
                    && s.budget_year_start <= end
                    && s.budget_year_end >= start
            })
            .cloned())
    }

    async fn update_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn delete_schedule(&self, id: LevyScheduleId) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.schedules.remove(&id);
        state.periods.retain(|_, p| p.schedule_id != id);
        Ok(())
    }

    async fn insert_periods(&self, periods: &[LevyPeriod]) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        for period in periods {
            state.periods.insert(period.id, period.clone());
        }
        Ok(())
    }

    async fn delete_periods(&self, schedule_id: LevyScheduleId) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.periods.retain(|_, p| p.schedule_id != schedule_id);
        Ok(())
    }

    async fn list_periods(
        &self,
        schedule_id: LevyScheduleId,
    ) -> Result<Vec<LevyPeriod>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut periods: Vec<LevyPeriod> = state
            .periods
            .values()
            .filter(|p| p.schedule_id == schedule_id)
            .cloned()
            .collect();
        periods.sort_by_key(|p| p.period_number);
        Ok(periods)
    }

    async fn insert_items(&self, items: &[LevyItem]) -> Result<(), PortError> {
        self.seed_items(items);
        Ok(())
    }

    async fn get_item(&self, id: LevyItemId) -> Result<LevyItem, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LevyItem", id))
    }

    async fn update_item(&self, item: &LevyItem) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn list_outstanding_items(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<LevyItem>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut items: Vec<LevyItem> = state
            .items
            .values()
            .filter(|i| {
                i.scheme_id == scheme_id && i.lot_id == lot_id && i.balance().is_positive()
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(items)
    }

    async fn list_items_for_period(
        &self,
        period_id: LevyPeriodId,
    ) -> Result<Vec<LevyItem>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut items: Vec<LevyItem> = state
            .items
            .values()
            .filter(|i| i.period_id == period_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn schedule_has_items(&self, schedule_id: LevyScheduleId) -> Result<bool, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let period_ids: Vec<LevyPeriodId> = state
            .periods
            .values()
            .filter(|p| p.schedule_id == schedule_id)
            .map(|p| p.id)
            .collect();
        Ok(state
            .items
            .values()
            .any(|i| period_ids.contains(&i.period_id)))
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn get_payment(
        &self,
        scheme_id: SchemeId,
        id: PaymentId,
    ) -> Result<Payment, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .payments
            .get(&id)
            .filter(|p| p.scheme_id == scheme_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Payment", id))
    }

    async fn list_payments(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<Payment>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.scheme_id == scheme_id && p.lot_id == lot_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| {
            b.payment_date
                .cmp(&a.payment_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(payments)
    }

    async fn insert_allocation(&self, allocation: &PaymentAllocation) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.allocations.push(allocation.clone());
        Ok(())
    }

    async fn list_allocations(
        &self,
        payment_id: PaymentId,
    ) -> Result<Vec<PaymentAllocation>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut allocations: Vec<PaymentAllocation> = state
            .allocations
            .iter()
            .filter(|a| a.payment_id == payment_id)
            .cloned()
            .collect();
        allocations.sort_by_key(|a| a.allocated_at);
        Ok(allocations)
    }
}

// ---------------------------------------------------------------------
// Ledger store

#[derive(Default)]
struct LedgerState {
    accounts: Vec<LedgerAccount>,
    transactions: HashMap<TransactionId, Transaction>,
    lines: Vec<TransactionLine>,
}

/// In-memory `LedgerStore`
#[derive(Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryLedgerStore {}

impl LedgerState {
    /// The debit-side sum of one transaction's lines
    fn transaction_amount(&self, id: TransactionId) -> Money {
        self.lines
            .iter()
            .filter(|l| l.transaction_id == id && l.line_type == LineType::Debit)
            .fold(Money::zero(Currency::default()), |acc, l| acc + l.amount)
    }

    fn live_transactions_in<'a>(
        &'a self,
        scheme_id: SchemeId,
        range: &'a DateRange,
    ) -> impl Iterator<Item = &'a Transaction> {
        self.transactions.values().filter(move |t| {
            t.scheme_id == scheme_id && !t.is_deleted && range.contains(t.transaction_date)
        })
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_accounts(&self, accounts: &[LedgerAccount]) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.accounts.extend_from_slice(accounts);
        Ok(())
    }

    async fn list_accounts(&self, scheme_id: SchemeId) -> Result<Vec<LedgerAccount>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
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
        let mut state = self.state.lock().expect("lock poisoned");
        state
            .transactions
            .insert(transaction.id, transaction.clone());
        state.lines.extend_from_slice(lines);
        Ok(())
    }

    async fn soft_delete_transaction(
        &self,
        scheme_id: SchemeId,
        id: TransactionId,
    ) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        match state
            .transactions
            .get_mut(&id)
            .filter(|t| t.scheme_id == scheme_id)
        {
            Some(transaction) => {
                transaction.is_deleted = true;
                Ok(())
            }
            None => Err(PortError::not_found("Transaction", id)),
        }
    }

    async fn list_posted_lines(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<PostedLine>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut posted: Vec<PostedLine> = Vec::new();
        for transaction in state.live_transactions_in(scheme_id, &range) {
            for line in state
                .lines
                .iter()
                .filter(|l| l.transaction_id == transaction.id)
            {
                let account = state
                    .accounts
                    .iter()
                    .find(|a| a.id == line.account_id)
                    .ok_or_else(|| PortError::not_found("LedgerAccount", line.account_id))?;
                posted.push(PostedLine {
                    account_id: account.id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    line_type: line.line_type,
                    amount: line.amount,
                });
            }
        }
        posted.sort_by(|a, b| a.account_code.cmp(&b.account_code));
        Ok(posted)
    }

    async fn list_fund_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<FundMovement>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state
            .live_transactions_in(scheme_id, &range)
            .map(|t| FundMovement {
                fund_type: t.fund_type,
                transaction_type: t.transaction_type,
                amount: state.transaction_amount(t.id),
            })
            .collect())
    }

    async fn list_category_movements(
        &self,
        scheme_id: SchemeId,
        range: DateRange,
    ) -> Result<Vec<CategoryMovement>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state
            .live_transactions_in(scheme_id, &range)
            .map(|t| {
                let category_name = state
                    .accounts
                    .iter()
                    .find(|a| a.scheme_id == scheme_id && a.code == t.category_code)
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| t.category_code.clone());
                CategoryMovement {
                    category_code: t.category_code.clone(),
                    category_name,
                    fund_type: t.fund_type,
                    transaction_type: t.transaction_type,
                    amount: state.transaction_amount(t.id),
                }
            })
            .collect())
    }

    async fn opening_fund_balances(
        &self,
        scheme_id: SchemeId,
        before: NaiveDate,
    ) -> Result<FundOpeningBalances, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut opening = FundOpeningBalances::zero(Currency::default());
        for transaction in state.transactions.values().filter(|t| {
            t.scheme_id == scheme_id && !t.is_deleted && t.transaction_date < before
        }) {
            let amount = state.transaction_amount(transaction.id);
            let signed = match transaction.transaction_type {
                TransactionType::Receipt => amount,
                TransactionType::Payment => Money::zero(amount.currency()) - amount,
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

// ---------------------------------------------------------------------
// Budget store

#[derive(Default)]
struct BudgetState {
    budgets: HashMap<BudgetId, Budget>,
    lines: HashMap<BudgetLineId, BudgetLineItem>,
}

/// In-memory `BudgetStore`
#[derive(Default)]
pub struct InMemoryBudgetStore {
    state: Mutex<BudgetState>,
}

impl InMemoryBudgetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryBudgetStore {}

#[async_trait]
impl BudgetStore for InMemoryBudgetStore {
    async fn insert_budget(&self, budget: &Budget) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    async fn get_budget(&self, scheme_id: SchemeId, id: BudgetId) -> Result<Budget, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        state
            .budgets
            .get(&id)
            .filter(|b| b.scheme_id == scheme_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Budget", id))
    }

    async fn find_budget(
        &self,
        scheme_id: SchemeId,
        financial_year: i32,
        fund_type: FundType,
    ) -> Result<Option<Budget>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state
            .budgets
            .values()
            .find(|b| {
                b.scheme_id == scheme_id
                    && b.financial_year == financial_year
                    && b.fund_type == fund_type
            })
            .cloned())
    }

    async fn list_budgets(&self, scheme_id: SchemeId) -> Result<Vec<Budget>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut budgets: Vec<Budget> = state
            .budgets
            .values()
            .filter(|b| b.scheme_id == scheme_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| b.financial_year.cmp(&a.financial_year));
        Ok(budgets)
    }

    async fn update_budget(&self, budget: &Budget) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    async fn delete_budget(&self, id: BudgetId) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.budgets.remove(&id);
        state.lines.retain(|_, l| l.budget_id != id);
        Ok(())
    }

    async fn insert_line(&self, line: &BudgetLineItem) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.lines.insert(line.id, line.clone());
        Ok(())
    }

    async fn update_line(&self, line: &BudgetLineItem) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.lines.insert(line.id, line.clone());
        Ok(())
    }

    async fn delete_line(&self, id: BudgetLineId) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.lines.remove(&id);
        Ok(())
    }

    async fn list_lines(&self, budget_id: BudgetId) -> Result<Vec<BudgetLineItem>, PortError> {
        let state = self.state.lock().expect("lock poisoned");
        let mut lines: Vec<BudgetLineItem> = state
            .lines
            .values()
            .filter(|l| l.budget_id == budget_id)
            .cloned()
            .collect();
        lines.sort_by(|a, b| a.category_code.cmp(&b.category_code));
        Ok(lines)
    }
}
