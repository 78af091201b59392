//! Core Kernel - Foundational types and utilities for the strata system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic and a strict 2-dp rounding discipline
//! - Calendar date arithmetic for billing-period generation
//! - Common identifiers and value objects
//! - The `Outcome` type that carries a result alongside an advisory warning

pub mod money;
pub mod fund;
pub mod calendar;
pub mod identifiers;
pub mod context;
pub mod outcome;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use fund::FundType;
pub use calendar::{DateRange, CalendarError, add_months, last_day_of_month, clamp_day_of_month};
pub use identifiers::{
    SchemeId, LotId, LevyScheduleId, LevyPeriodId, LevyItemId,
    PaymentId, AllocationId, BudgetId, BudgetLineId,
    AccountId, TransactionId, TransactionLineId,
};
pub use context::RequestContext;
pub use outcome::Outcome;
pub use error::CoreError;
pub use ports::{PortError, DomainPort, BlobStore, EmailSender, EmailMessage, DocumentRenderer};
