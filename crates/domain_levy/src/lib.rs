//! Levy Billing Domain
//!
//! This crate implements the levy billing engine for the strata core:
//! annual levy schedules, generation of billing periods from a frequency and
//! financial-year anchor, per-lot levy items, payment recording, and FIFO
//! allocation of payments across outstanding items.
//!
//! # Design
//!
//! The engine functions (`generate_periods`, `allocate`) are pure: they take
//! values and return values, with no store access. The `BillingService`
//! orchestrates them against the `LevyStore` port, owning validation,
//! duplicate checks, and the partial-failure contract for payment recording.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_levy::{BillingService, CreateScheduleRequest};
//!
//! let service = BillingService::new(store);
//! let created = service.create_schedule(&ctx, request).await?;
//! assert_eq!(created.periods.len(), 4);
//! ```

pub mod schedule;
pub mod period;
pub mod item;
pub mod payment;
pub mod allocation;
pub mod ports;
pub mod services;
pub mod error;

pub use schedule::{LevySchedule, LevyFrequency};
pub use period::{LevyPeriod, PeriodStatus, generate_periods};
pub use item::{LevyItem, LevyItemStatus};
pub use payment::{Payment, PaymentMethod, PaymentAllocation};
pub use allocation::{allocate, OutstandingItem, AllocationEntry, AllocationOutcome};
pub use ports::{LevyStore, CreateScheduleRequest, UpdateScheduleRequest, RecordPaymentRequest};
pub use services::{BillingService, PaymentReceipt, ScheduleWithPeriods, ScheduleRemoval};
pub use error::LevyError;
