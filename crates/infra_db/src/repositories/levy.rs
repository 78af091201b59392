//! Levy store adapter
//!
//! Implements `LevyStore` over PostgreSQL. Period inserts for a schedule
//! run in one transaction so a schedule never ends up with a partial
//! period set.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{
    AllocationId, DomainPort, LevyItemId, LevyPeriodId, LevyScheduleId, LotId, PaymentId,
    PortError, SchemeId,
};
use domain_levy::{
    LevyItem, LevyPeriod, LevySchedule, LevyStore, Payment, PaymentAllocation,
};

use crate::error::sqlx_to_port;
use crate::repositories::{money_from_row, parse_column};

/// PostgreSQL-backed levy store
#[derive(Debug, Clone)]
pub struct PgLevyStore {
    pool: PgPool,
}

impl PgLevyStore {
    /// Creates a new levy store over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DomainPort for PgLevyStore {}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    scheme_id: Uuid,
    budget_year_start: NaiveDate,
    budget_year_end: NaiveDate,
    admin_fund_total: Decimal,
    capital_works_fund_total: Decimal,
    currency: String,
    frequency: String,
    periods_per_year: i32,
    due_day: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScheduleRow {
    fn into_domain(self) -> Result<LevySchedule, PortError> {
        Ok(LevySchedule {
            id: LevyScheduleId::from_uuid(self.id),
            scheme_id: SchemeId::from_uuid(self.scheme_id),
            budget_year_start: self.budget_year_start,
            budget_year_end: self.budget_year_end,
            admin_fund_total: money_from_row(self.admin_fund_total, &self.currency)?,
            capital_works_fund_total: money_from_row(
                self.capital_works_fund_total,
                &self.currency,
            )?,
            frequency: parse_column(&self.frequency, "frequency")?,
            periods_per_year: self.periods_per_year as u32,
            due_day: self.due_day as u32,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PeriodRow {
    id: Uuid,
    schedule_id: Uuid,
    period_number: i32,
    label: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    due_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl PeriodRow {
    fn into_domain(self) -> Result<LevyPeriod, PortError> {
        Ok(LevyPeriod {
            id: LevyPeriodId::from_uuid(self.id),
            schedule_id: LevyScheduleId::from_uuid(self.schedule_id),
            period_number: self.period_number as u32,
            label: self.label,
            start_date: self.start_date,
            end_date: self.end_date,
            due_date: self.due_date,
            status: parse_column(&self.status, "status")?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    scheme_id: Uuid,
    lot_id: Uuid,
    period_id: Uuid,
    admin_levy: Decimal,
    capital_levy: Decimal,
    special_levy: Option<Decimal>,
    amount_paid: Decimal,
    currency: String,
    status: String,
    due_date: NaiveDate,
    notice_generated_at: Option<DateTime<Utc>>,
    notice_sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_domain(self) -> Result<LevyItem, PortError> {
        Ok(LevyItem {
            id: LevyItemId::from_uuid(self.id),
            scheme_id: SchemeId::from_uuid(self.scheme_id),
            lot_id: LotId::from_uuid(self.lot_id),
            period_id: LevyPeriodId::from_uuid(self.period_id),
            admin_levy: money_from_row(self.admin_levy, &self.currency)?,
            capital_levy: money_from_row(self.capital_levy, &self.currency)?,
            special_levy: self
                .special_levy
                .map(|s| money_from_row(s, &self.currency))
                .transpose()?,
            amount_paid: money_from_row(self.amount_paid, &self.currency)?,
            status: parse_column(&self.status, "status")?,
            due_date: self.due_date,
            notice_generated_at: self.notice_generated_at,
            notice_sent_at: self.notice_sent_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    scheme_id: Uuid,
    lot_id: Uuid,
    amount: Decimal,
    currency: String,
    payment_date: NaiveDate,
    method: String,
    reference: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_domain(self) -> Result<Payment, PortError> {
        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            scheme_id: SchemeId::from_uuid(self.scheme_id),
            lot_id: LotId::from_uuid(self.lot_id),
            amount: money_from_row(self.amount, &self.currency)?,
            payment_date: self.payment_date,
            method: parse_column(&self.method, "method")?,
            reference: self.reference,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AllocationRow {
    id: Uuid,
    payment_id: Uuid,
    levy_item_id: Uuid,
    amount: Decimal,
    currency: String,
    allocated_at: DateTime<Utc>,
}

impl AllocationRow {
    fn into_domain(self) -> Result<PaymentAllocation, PortError> {
        Ok(PaymentAllocation {
            id: AllocationId::from_uuid(self.id),
            payment_id: PaymentId::from_uuid(self.payment_id),
            levy_item_id: LevyItemId::from_uuid(self.levy_item_id),
            amount: money_from_row(self.amount, &self.currency)?,
            allocated_at: self.allocated_at,
        })
    }
}

#[async_trait]
impl LevyStore for PgLevyStore {
    async fn insert_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO levy_schedules (
                id, scheme_id, budget_year_start, budget_year_end,
                admin_fund_total, capital_works_fund_total, currency,
                frequency, periods_per_year, due_day, is_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(schedule.id.as_uuid())
        .bind(schedule.scheme_id.as_uuid())
        .bind(schedule.budget_year_start)
        .bind(schedule.budget_year_end)
        .bind(schedule.admin_fund_total.amount())
        .bind(schedule.capital_works_fund_total.amount())
        .bind(schedule.admin_fund_total.currency().code())
        .bind(schedule.frequency.as_str())
        .bind(schedule.periods_per_year as i32)
        .bind(schedule.due_day as i32)
        .bind(schedule.is_active)
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn get_schedule(
        &self,
        scheme_id: SchemeId,
        id: LevyScheduleId,
    ) -> Result<LevySchedule, PortError> {
        let row: Option<ScheduleRow> = sqlx::query_as(
            "SELECT * FROM levy_schedules WHERE id = $1 AND scheme_id = $2",
        )
        .bind(id.as_uuid())
        .bind(scheme_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        row.ok_or_else(|| PortError::not_found("LevySchedule", id))?
            .into_domain()
    }

    async fn list_schedules(&self, scheme_id: SchemeId) -> Result<Vec<LevySchedule>, PortError> {
        let rows: Vec<ScheduleRow> = sqlx::query_as(
            "SELECT * FROM levy_schedules WHERE scheme_id = $1 ORDER BY budget_year_start DESC",
        )
        .bind(scheme_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(ScheduleRow::into_domain).collect()
    }

    async fn find_overlapping_schedule(
        &self,
        scheme_id: SchemeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<LevySchedule>, PortError> {
        let row: Option<ScheduleRow> = sqlx::query_as(
            r#"
            SELECT * FROM levy_schedules
            WHERE scheme_id = $1 AND is_active
              AND budget_year_start <= $3 AND budget_year_end >= $2
            LIMIT 1
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        row.map(ScheduleRow::into_domain).transpose()
    }

    async fn update_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError> {
        sqlx::query(
            r#"
            UPDATE levy_schedules SET
                admin_fund_total = $2, capital_works_fund_total = $3,
                due_day = $4, is_active = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(schedule.id.as_uuid())
        .bind(schedule.admin_fund_total.amount())
        .bind(schedule.capital_works_fund_total.amount())
        .bind(schedule.due_day as i32)
        .bind(schedule.is_active)
        .bind(schedule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn delete_schedule(&self, id: LevyScheduleId) -> Result<(), PortError> {
        // Periods cascade via the schedule foreign key.
        sqlx::query("DELETE FROM levy_schedules WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn insert_periods(&self, periods: &[LevyPeriod]) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_to_port)?;
        for period in periods {
            sqlx::query(
                r#"
                INSERT INTO levy_periods (
                    id, schedule_id, period_number, label,
                    start_date, end_date, due_date, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(period.id.as_uuid())
            .bind(period.schedule_id.as_uuid())
            .bind(period.period_number as i32)
            .bind(&period.label)
            .bind(period.start_date)
            .bind(period.end_date)
            .bind(period.due_date)
            .bind(period.status.as_str())
            .bind(period.created_at)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_to_port)?;
        }
        tx.commit().await.map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn delete_periods(&self, schedule_id: LevyScheduleId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM levy_periods WHERE schedule_id = $1")
            .bind(schedule_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn list_periods(
        &self,
        schedule_id: LevyScheduleId,
    ) -> Result<Vec<LevyPeriod>, PortError> {
        let rows: Vec<PeriodRow> = sqlx::query_as(
            "SELECT * FROM levy_periods WHERE schedule_id = $1 ORDER BY period_number",
        )
        .bind(schedule_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(PeriodRow::into_domain).collect()
    }

    async fn insert_items(&self, items: &[LevyItem]) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(sqlx_to_port)?;
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO levy_items (
                    id, scheme_id, lot_id, period_id,
                    admin_levy, capital_levy, special_levy, amount_paid, currency,
                    status, due_date, notice_generated_at, notice_sent_at,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(item.scheme_id.as_uuid())
            .bind(item.lot_id.as_uuid())
            .bind(item.period_id.as_uuid())
            .bind(item.admin_levy.amount())
            .bind(item.capital_levy.amount())
            .bind(item.special_levy.map(|m| m.amount()))
            .bind(item.amount_paid.amount())
            .bind(item.admin_levy.currency().code())
            .bind(item.status.as_str())
            .bind(item.due_date)
            .bind(item.notice_generated_at)
            .bind(item.notice_sent_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_to_port)?;
        }
        tx.commit().await.map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn get_item(&self, id: LevyItemId) -> Result<LevyItem, PortError> {
        let row: Option<ItemRow> = sqlx::query_as("SELECT * FROM levy_items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_to_port)?;

        row.ok_or_else(|| PortError::not_found("LevyItem", id))?
            .into_domain()
    }

    async fn update_item(&self, item: &LevyItem) -> Result<(), PortError> {
        sqlx::query(
            r#"
            UPDATE levy_items SET
                amount_paid = $2, status = $3,
                notice_generated_at = $4, notice_sent_at = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.amount_paid.amount())
        .bind(item.status.as_str())
        .bind(item.notice_generated_at)
        .bind(item.notice_sent_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn list_outstanding_items(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<LevyItem>, PortError> {
        // FIFO ordering for the allocation engine: oldest due date first,
        // creation order as the tie-break.
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT * FROM levy_items
            WHERE scheme_id = $1 AND lot_id = $2
              AND (admin_levy + capital_levy + COALESCE(special_levy, 0)) > amount_paid
            ORDER BY due_date ASC, created_at ASC
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(lot_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(ItemRow::into_domain).collect()
    }

    async fn list_items_for_period(
        &self,
        period_id: LevyPeriodId,
    ) -> Result<Vec<LevyItem>, PortError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT * FROM levy_items WHERE period_id = $1 ORDER BY created_at",
        )
        .bind(period_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(ItemRow::into_domain).collect()
    }

    async fn schedule_has_items(&self, schedule_id: LevyScheduleId) -> Result<bool, PortError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM levy_items i
            JOIN levy_periods p ON p.id = i.period_id
            WHERE p.schedule_id = $1
            "#,
        )
        .bind(schedule_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(count > 0)
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, scheme_id, lot_id, amount, currency,
                payment_date, method, reference, notes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.scheme_id.as_uuid())
        .bind(payment.lot_id.as_uuid())
        .bind(payment.amount.amount())
        .bind(payment.amount.currency().code())
        .bind(payment.payment_date)
        .bind(payment.method.as_str())
        .bind(&payment.reference)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn get_payment(
        &self,
        scheme_id: SchemeId,
        id: PaymentId,
    ) -> Result<Payment, PortError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            "SELECT * FROM payments WHERE id = $1 AND scheme_id = $2",
        )
        .bind(id.as_uuid())
        .bind(scheme_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        row.ok_or_else(|| PortError::not_found("Payment", id))?
            .into_domain()
    }

    async fn list_payments(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<Payment>, PortError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT * FROM payments
            WHERE scheme_id = $1 AND lot_id = $2
            ORDER BY payment_date DESC, created_at DESC
            "#,
        )
        .bind(scheme_id.as_uuid())
        .bind(lot_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(PaymentRow::into_domain).collect()
    }

    async fn insert_allocation(&self, allocation: &PaymentAllocation) -> Result<(), PortError> {
        sqlx::query(
            r#"
            INSERT INTO payment_allocations (
                id, payment_id, levy_item_id, amount, currency, allocated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(allocation.id.as_uuid())
        .bind(allocation.payment_id.as_uuid())
        .bind(allocation.levy_item_id.as_uuid())
        .bind(allocation.amount.amount())
        .bind(allocation.amount.currency().code())
        .bind(allocation.allocated_at)
        .execute(&self.pool)
        .await
        .map_err(sqlx_to_port)?;
        Ok(())
    }

    async fn list_allocations(
        &self,
        payment_id: PaymentId,
    ) -> Result<Vec<PaymentAllocation>, PortError> {
        let rows: Vec<AllocationRow> = sqlx::query_as(
            "SELECT * FROM payment_allocations WHERE payment_id = $1 ORDER BY allocated_at",
        )
        .bind(payment_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_to_port)?;

        rows.into_iter().map(AllocationRow::into_domain).collect()
    }
}
