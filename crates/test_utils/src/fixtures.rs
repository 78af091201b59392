//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for the common entities across the strata
//! system. Fixtures are consistent and predictable so assertions can
//! use literal expected values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{Currency, LevyPeriodId, LotId, Money, SchemeId};
use domain_levy::{
    CreateScheduleRequest, LevyFrequency, LevyItem, PaymentMethod, RecordPaymentRequest,
};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates an AUD amount from a decimal
    pub fn aud(amount: Decimal) -> Money {
        Money::new(amount, Currency::AUD)
    }

    /// A standard small AUD amount
    pub fn aud_100() -> Money {
        Money::new(dec!(100.00), Currency::AUD)
    }

    /// A typical annual administrative fund total
    pub fn admin_fund_total() -> Money {
        Money::new(dec!(40000.00), Currency::AUD)
    }

    /// A typical annual capital works fund total
    pub fn capital_works_fund_total() -> Money {
        Money::new(dec!(20000.00), Currency::AUD)
    }

    /// A zero AUD amount
    pub fn aud_zero() -> Money {
        Money::zero(Currency::AUD)
    }
}

/// Fixture for calendar test data
pub struct DateFixtures;

impl DateFixtures {
    /// First day of the FY2027 budget year (1 July 2026)
    pub fn budget_year_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    /// Last day of the FY2027 budget year (30 June 2027)
    pub fn budget_year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 6, 30).unwrap()
    }

    /// A payment date inside the first quarter
    pub fn mid_first_quarter() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
    }

    /// A date after every due date in the budget year
    pub fn after_budget_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 7, 15).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic scheme ID for testing
    pub fn scheme_id() -> SchemeId {
        SchemeId::from_uuid(Uuid::parse_str("018f4e20-0000-7000-8000-000000000001").unwrap())
    }

    /// Creates a second scheme ID for isolation tests
    pub fn other_scheme_id() -> SchemeId {
        SchemeId::from_uuid(Uuid::parse_str("018f4e20-0000-7000-8000-000000000002").unwrap())
    }

    /// Creates a deterministic lot ID for testing
    pub fn lot_id() -> LotId {
        LotId::from_uuid(Uuid::parse_str("018f4e20-0000-7000-8000-000000000011").unwrap())
    }

    /// Creates a second lot ID
    pub fn other_lot_id() -> LotId {
        LotId::from_uuid(Uuid::parse_str("018f4e20-0000-7000-8000-000000000012").unwrap())
    }
}

/// Fixture for levy billing requests and entities
pub struct LevyFixtures;

impl LevyFixtures {
    /// A quarterly schedule over the FY2027 budget year with the standard
    /// fund totals and levies due on the 1st of each quarter
    pub fn quarterly_schedule_request() -> CreateScheduleRequest {
        CreateScheduleRequest {
            budget_year_start: DateFixtures::budget_year_start(),
            budget_year_end: DateFixtures::budget_year_end(),
            admin_fund_total: MoneyFixtures::admin_fund_total(),
            capital_works_fund_total: MoneyFixtures::capital_works_fund_total(),
            frequency: LevyFrequency::Quarterly,
            periods_per_year: None,
            due_day: 1,
        }
    }

    /// An unpaid levy item for a freshly generated period
    pub fn outstanding_item(
        scheme_id: SchemeId,
        lot_id: LotId,
        admin: Decimal,
        capital: Decimal,
        due_date: NaiveDate,
    ) -> LevyItem {
        LevyItem::new(
            scheme_id,
            lot_id,
            LevyPeriodId::new_v7(),
            MoneyFixtures::aud(admin),
            MoneyFixtures::aud(capital),
            None,
            due_date,
        )
    }

    /// A bank transfer payment request for a lot
    pub fn bank_transfer_payment(lot_id: LotId, amount: Decimal, payment_date: NaiveDate) -> RecordPaymentRequest {
        RecordPaymentRequest {
            lot_id,
            amount: MoneyFixtures::aud(amount),
            payment_date,
            method: PaymentMethod::BankTransfer,
            reference: Some("RCPT-0001".to_string()),
            notes: None,
        }
    }
}
