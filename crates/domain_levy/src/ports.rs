//! Levy Domain Ports
//!
//! The `LevyStore` trait defines every persistence operation the levy
//! billing domain needs. Adapters implement it against PostgreSQL in
//! `infra_db`; tests supply in-memory implementations.

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    DomainPort, LevyItemId, LevyPeriodId, LevyScheduleId, LotId, Money, PaymentId, PortError,
    SchemeId,
};

use crate::item::LevyItem;
use crate::payment::{Payment, PaymentAllocation, PaymentMethod};
use crate::period::LevyPeriod;
use crate::schedule::{LevyFrequency, LevySchedule};

/// Request for creating a levy schedule
#[derive(Debug, Clone)]
pub struct CreateScheduleRequest {
    /// First day of the budget year
    pub budget_year_start: NaiveDate,
    /// Last day of the budget year
    pub budget_year_end: NaiveDate,
    /// Total to raise for the administrative fund
    pub admin_fund_total: Money,
    /// Total to raise for the capital works fund
    pub capital_works_fund_total: Money,
    /// Billing frequency
    pub frequency: LevyFrequency,
    /// Billing periods per year; defaults to the frequency's conventional
    /// count when absent
    pub periods_per_year: Option<u32>,
    /// Day of month levies fall due
    pub due_day: u32,
}

/// Request for updating a levy schedule
///
/// Only fund totals and the due day may change, and only while no levy
/// item exists for any of the schedule's periods.
#[derive(Debug, Clone, Default)]
pub struct UpdateScheduleRequest {
    pub admin_fund_total: Option<Money>,
    pub capital_works_fund_total: Option<Money>,
    pub due_day: Option<u32>,
}

/// Request for recording a payment against a lot
#[derive(Debug, Clone)]
pub struct RecordPaymentRequest {
    /// The lot the payment was received for
    pub lot_id: LotId,
    /// Payment amount
    pub amount: Money,
    /// Date the money was received
    pub payment_date: NaiveDate,
    /// How the money arrived
    pub method: PaymentMethod,
    /// External reference (bank reference, receipt number)
    pub reference: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Persistence port for the levy billing domain
#[async_trait]
pub trait LevyStore: DomainPort {
    // Schedules

    /// Persists a new schedule
    async fn insert_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError>;

    /// Fetches a schedule by id, scoped to a scheme
    async fn get_schedule(
        &self,
        scheme_id: SchemeId,
        id: LevyScheduleId,
    ) -> Result<LevySchedule, PortError>;

    /// Lists a scheme's schedules, newest budget year first
    async fn list_schedules(&self, scheme_id: SchemeId) -> Result<Vec<LevySchedule>, PortError>;

    /// Finds an active schedule whose budget year overlaps the given range
    async fn find_overlapping_schedule(
        &self,
        scheme_id: SchemeId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<LevySchedule>, PortError>;

    /// Writes back an updated schedule
    async fn update_schedule(&self, schedule: &LevySchedule) -> Result<(), PortError>;

    /// Hard-deletes a schedule and its periods
    async fn delete_schedule(&self, id: LevyScheduleId) -> Result<(), PortError>;

    // Periods

    /// Persists a batch of periods
    async fn insert_periods(&self, periods: &[LevyPeriod]) -> Result<(), PortError>;

    /// Deletes all periods belonging to a schedule
    async fn delete_periods(&self, schedule_id: LevyScheduleId) -> Result<(), PortError>;

    /// Lists a schedule's periods in period-number order
    async fn list_periods(
        &self,
        schedule_id: LevyScheduleId,
    ) -> Result<Vec<LevyPeriod>, PortError>;

    // Items

    /// Persists a batch of levy items
    async fn insert_items(&self, items: &[LevyItem]) -> Result<(), PortError>;

    /// Fetches a levy item by id
    async fn get_item(&self, id: LevyItemId) -> Result<LevyItem, PortError>;

    /// Writes back an updated levy item
    async fn update_item(&self, item: &LevyItem) -> Result<(), PortError>;

    /// Lists a lot's unpaid items ordered by due date ascending, then by
    /// creation ascending for equal due dates
    async fn list_outstanding_items(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<LevyItem>, PortError>;

    /// Lists all items belonging to one period
    async fn list_items_for_period(
        &self,
        period_id: LevyPeriodId,
    ) -> Result<Vec<LevyItem>, PortError>;

    /// Returns true if any levy item exists for any of the schedule's
    /// periods
    async fn schedule_has_items(&self, schedule_id: LevyScheduleId) -> Result<bool, PortError>;

    // Payments

    /// Persists a payment
    async fn insert_payment(&self, payment: &Payment) -> Result<(), PortError>;

    /// Fetches a payment by id, scoped to a scheme
    async fn get_payment(&self, scheme_id: SchemeId, id: PaymentId) -> Result<Payment, PortError>;

    /// Lists a lot's payments, most recent payment date first
    async fn list_payments(
        &self,
        scheme_id: SchemeId,
        lot_id: LotId,
    ) -> Result<Vec<Payment>, PortError>;

    /// Persists one payment allocation
    async fn insert_allocation(&self, allocation: &PaymentAllocation) -> Result<(), PortError>;

    /// Lists the allocations recorded for a payment
    async fn list_allocations(
        &self,
        payment_id: PaymentId,
    ) -> Result<Vec<PaymentAllocation>, PortError>;
}
