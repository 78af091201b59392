//! Levy billing DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_levy::{
    LevyFrequency, LevyPeriod, LevySchedule, Payment, PaymentAllocation, PaymentMethod,
    PaymentReceipt, ScheduleWithPeriods,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateScheduleDto {
    pub budget_year_start: NaiveDate,
    pub budget_year_end: NaiveDate,
    pub admin_fund_total: Decimal,
    pub capital_works_fund_total: Decimal,
    pub frequency: LevyFrequency,
    pub periods_per_year: Option<u32>,
    #[validate(range(min = 1, max = 31))]
    pub due_day: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScheduleDto {
    pub admin_fund_total: Option<Decimal>,
    pub capital_works_fund_total: Option<Decimal>,
    #[validate(range(min = 1, max = 31))]
    pub due_day: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentDto {
    pub lot_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OverdueSweepDto {
    pub lot_id: Uuid,
    pub as_of: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub lot_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub budget_year_start: NaiveDate,
    pub budget_year_end: NaiveDate,
    pub admin_fund_total: Decimal,
    pub capital_works_fund_total: Decimal,
    pub frequency: LevyFrequency,
    pub periods_per_year: u32,
    pub due_day: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<LevySchedule> for ScheduleResponse {
    fn from(s: LevySchedule) -> Self {
        Self {
            id: *s.id.as_uuid(),
            budget_year_start: s.budget_year_start,
            budget_year_end: s.budget_year_end,
            admin_fund_total: s.admin_fund_total.amount(),
            capital_works_fund_total: s.capital_works_fund_total.amount(),
            frequency: s.frequency,
            periods_per_year: s.periods_per_year,
            due_day: s.due_day,
            is_active: s.is_active,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub id: Uuid,
    pub period_number: u32,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
}

impl From<LevyPeriod> for PeriodResponse {
    fn from(p: LevyPeriod) -> Self {
        Self {
            id: *p.id.as_uuid(),
            period_number: p.period_number,
            label: p.label,
            start_date: p.start_date,
            end_date: p.end_date,
            due_date: p.due_date,
            status: p.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleWithPeriodsResponse {
    #[serde(flatten)]
    pub schedule: ScheduleResponse,
    pub periods: Vec<PeriodResponse>,
}

impl From<ScheduleWithPeriods> for ScheduleWithPeriodsResponse {
    fn from(s: ScheduleWithPeriods) -> Self {
        Self {
            schedule: s.schedule.into(),
            periods: s.periods.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: *p.id.as_uuid(),
            lot_id: *p.lot_id.as_uuid(),
            amount: p.amount.amount(),
            payment_date: p.payment_date,
            method: p.method,
            reference: p.reference,
            notes: p.notes,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub id: Uuid,
    pub levy_item_id: Uuid,
    pub amount: Decimal,
    pub allocated_at: DateTime<Utc>,
}

impl From<PaymentAllocation> for AllocationResponse {
    fn from(a: PaymentAllocation) -> Self {
        Self {
            id: *a.id.as_uuid(),
            levy_item_id: *a.levy_item_id.as_uuid(),
            amount: a.amount.amount(),
            allocated_at: a.allocated_at,
        }
    }
}

/// The payment result including the allocation breakdown and any advisory
/// warning from the partial-failure contract
#[derive(Debug, Serialize)]
pub struct PaymentReceiptResponse {
    pub payment: PaymentResponse,
    pub allocations: Vec<AllocationResponse>,
    pub unallocated: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PaymentReceiptResponse {
    pub fn from_receipt(receipt: PaymentReceipt, warning: Option<String>) -> Self {
        Self {
            payment: receipt.payment.into(),
            allocations: receipt.allocations.into_iter().map(Into::into).collect(),
            unallocated: receipt.unallocated.amount(),
            warning,
        }
    }
}

/// A stored payment with its allocations
#[derive(Debug, Serialize)]
pub struct PaymentDetailResponse {
    pub payment: PaymentResponse,
    pub allocations: Vec<AllocationResponse>,
}

#[derive(Debug, Serialize)]
pub struct OverdueSweepResponse {
    pub updated: usize,
}
