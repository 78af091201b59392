//! Levy billing orchestration
//!
//! `BillingService` is the thin coordination layer over the pure engine
//! functions: it validates request shape, fetches rows through the
//! `LevyStore` port, calls `generate_periods` / `allocate`, and persists
//! the results. No billing rules live here beyond call ordering and
//! duplicate-prevention checks.

use std::sync::Arc;

use tracing::{info, warn};

use core_kernel::{LevyScheduleId, Money, Outcome, RequestContext};

use crate::allocation::{allocate, OutstandingItem};
use crate::error::LevyError;
use crate::payment::{Payment, PaymentAllocation};
use crate::period::{generate_periods, LevyPeriod};
use crate::ports::{CreateScheduleRequest, LevyStore, RecordPaymentRequest, UpdateScheduleRequest};
use crate::schedule::LevySchedule;

/// A schedule together with its generated billing periods
#[derive(Debug, Clone)]
pub struct ScheduleWithPeriods {
    pub schedule: LevySchedule,
    pub periods: Vec<LevyPeriod>,
}

/// How a schedule removal was carried out
///
/// Schedules with levy items are never hard-deleted; they are deactivated
/// so the billing history stays intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleRemoval {
    Deactivated,
    Deleted,
}

/// The result of recording a payment
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The recorded payment
    pub payment: Payment,
    /// Allocations that were successfully persisted
    pub allocations: Vec<PaymentAllocation>,
    /// Remainder that matched no open item
    pub unallocated: Money,
}

/// Orchestrates levy schedules, billing periods and payment allocation
pub struct BillingService {
    store: Arc<dyn LevyStore>,
}

impl BillingService {
    /// Creates a new billing service backed by the given store
    pub fn new(store: Arc<dyn LevyStore>) -> Self {
        Self { store }
    }

    /// Creates a levy schedule and its billing periods
    ///
    /// Validates the schedule, refuses creation when an active schedule
    /// already overlaps the requested budget year, then generates and
    /// persists the periods in one unit.
    ///
    /// # Errors
    ///
    /// Returns `LevyError::Validation` for invalid input and
    /// `LevyError::Conflict` when an overlapping active schedule exists.
    pub async fn create_schedule(
        &self,
        ctx: &RequestContext,
        request: CreateScheduleRequest,
    ) -> Result<ScheduleWithPeriods, LevyError> {
        let periods_per_year = request
            .periods_per_year
            .unwrap_or_else(|| request.frequency.default_periods_per_year());

        let schedule = LevySchedule::new(
            ctx.scheme_id,
            request.budget_year_start,
            request.budget_year_end,
            request.admin_fund_total,
            request.capital_works_fund_total,
            request.frequency,
            periods_per_year,
            request.due_day,
        );
        schedule.validate()?;

        if let Some(existing) = self
            .store
            .find_overlapping_schedule(
                ctx.scheme_id,
                request.budget_year_start,
                request.budget_year_end,
            )
            .await?
        {
            return Err(LevyError::Conflict(format!(
                "An active schedule ({}) already covers this budget year",
                existing.id
            )));
        }

        let periods = generate_periods(
            schedule.id,
            schedule.budget_year_start,
            schedule.frequency,
            schedule.periods_per_year,
            schedule.due_day,
        );

        self.store.insert_schedule(&schedule).await?;
        self.store.insert_periods(&periods).await?;

        info!(
            schedule_id = %schedule.id,
            scheme_id = %ctx.scheme_id,
            periods = periods.len(),
            "Created levy schedule"
        );

        Ok(ScheduleWithPeriods { schedule, periods })
    }

    /// Fetches a schedule and its periods
    pub async fn get_schedule(
        &self,
        ctx: &RequestContext,
        id: LevyScheduleId,
    ) -> Result<ScheduleWithPeriods, LevyError> {
        let schedule = self.store.get_schedule(ctx.scheme_id, id).await?;
        let periods = self.store.list_periods(id).await?;
        Ok(ScheduleWithPeriods { schedule, periods })
    }

    /// Lists a scheme's schedules
    pub async fn list_schedules(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<LevySchedule>, LevyError> {
        Ok(self.store.list_schedules(ctx.scheme_id).await?)
    }

    /// Updates a schedule's fund totals or due day
    ///
    /// Refused once any levy item exists for any of the schedule's
    /// periods. A due-day change regenerates the periods so their due
    /// dates stay consistent with the schedule.
    ///
    /// # Errors
    ///
    /// Returns `LevyError::Conflict` when the schedule already has items.
    pub async fn update_schedule(
        &self,
        ctx: &RequestContext,
        id: LevyScheduleId,
        request: UpdateScheduleRequest,
    ) -> Result<ScheduleWithPeriods, LevyError> {
        let mut schedule = self.store.get_schedule(ctx.scheme_id, id).await?;

        if self.store.schedule_has_items(id).await? {
            return Err(LevyError::Conflict(
                "Schedule already has levy items and can no longer be edited".to_string(),
            ));
        }

        if let Some(admin) = request.admin_fund_total {
            schedule.admin_fund_total = admin;
        }
        if let Some(capital) = request.capital_works_fund_total {
            schedule.capital_works_fund_total = capital;
        }
        let due_day_changed = match request.due_day {
            Some(day) if day != schedule.due_day => {
                schedule.due_day = day;
                true
            }
            _ => false,
        };
        schedule.validate()?;

        self.store.update_schedule(&schedule).await?;

        let periods = if due_day_changed {
            let regenerated = generate_periods(
                schedule.id,
                schedule.budget_year_start,
                schedule.frequency,
                schedule.periods_per_year,
                schedule.due_day,
            );
            self.store.delete_periods(id).await?;
            self.store.insert_periods(&regenerated).await?;
            regenerated
        } else {
            self.store.list_periods(id).await?
        };

        Ok(ScheduleWithPeriods { schedule, periods })
    }

    /// Removes a schedule
    ///
    /// Soft-deactivates when levy items exist, hard-deletes the schedule
    /// and its periods otherwise.
    pub async fn remove_schedule(
        &self,
        ctx: &RequestContext,
        id: LevyScheduleId,
    ) -> Result<ScheduleRemoval, LevyError> {
        let mut schedule = self.store.get_schedule(ctx.scheme_id, id).await?;

        if self.store.schedule_has_items(id).await? {
            schedule.deactivate();
            self.store.update_schedule(&schedule).await?;
            info!(schedule_id = %id, "Deactivated levy schedule with existing items");
            Ok(ScheduleRemoval::Deactivated)
        } else {
            self.store.delete_schedule(id).await?;
            info!(schedule_id = %id, "Deleted levy schedule");
            Ok(ScheduleRemoval::Deleted)
        }
    }

    /// Records a payment and allocates it FIFO across outstanding items
    ///
    /// The payment is persisted first and is never rolled back. Each
    /// allocation is then written once, followed by an explicit
    /// recomputation of the target item's paid amount and status. A
    /// failure partway through that sequence returns the payment with a
    /// warning describing what was not persisted, rather than an error.
    /// An unallocated remainder is likewise a normal result with an
    /// advisory note.
    ///
    /// # Errors
    ///
    /// Returns `LevyError::Validation` for a non-positive amount, and a
    /// hard error only when the payment itself cannot be persisted.
    pub async fn record_payment(
        &self,
        ctx: &RequestContext,
        request: RecordPaymentRequest,
    ) -> Result<Outcome<PaymentReceipt>, LevyError> {
        if !request.amount.is_positive() {
            return Err(LevyError::Validation(format!(
                "Payment amount must be positive, got {}",
                request.amount
            )));
        }

        let outstanding_items = self
            .store
            .list_outstanding_items(ctx.scheme_id, request.lot_id)
            .await?;
        let outstanding: Vec<OutstandingItem> = outstanding_items
            .iter()
            .map(|item| OutstandingItem {
                item_id: item.id,
                balance: item.balance(),
            })
            .collect();

        let mut payment = Payment::new(
            ctx.scheme_id,
            request.lot_id,
            request.amount,
            request.payment_date,
            request.method,
        );
        if let Some(reference) = request.reference {
            payment = payment.with_reference(reference);
        }
        if let Some(notes) = request.notes {
            payment = payment.with_notes(notes);
        }

        // Hard failure point: nothing has been written yet.
        self.store.insert_payment(&payment).await?;

        let outcome = allocate(request.amount, &outstanding);

        let mut persisted = Vec::with_capacity(outcome.allocations.len());
        for entry in &outcome.allocations {
            let allocation = PaymentAllocation::new(payment.id, entry.item_id, entry.amount);

            if let Err(err) = self.store.insert_allocation(&allocation).await {
                warn!(
                    payment_id = %payment.id,
                    item_id = %entry.item_id,
                    error = %err,
                    "Allocation insert failed after payment was recorded"
                );
                return Ok(Outcome::with_warning(
                    PaymentReceipt {
                        payment,
                        allocations: persisted,
                        unallocated: outcome.unallocated,
                    },
                    format!(
                        "Payment {} was recorded but allocation to item {} failed: {}",
                        allocation.payment_id, entry.item_id, err
                    ),
                ));
            }

            // Explicit item recomputation, immediately after each
            // allocation write.
            let item_update = async {
                let mut item = self.store.get_item(entry.item_id).await?;
                item.apply_allocation(entry.amount);
                self.store.update_item(&item).await
            };
            if let Err(err) = item_update.await {
                warn!(
                    payment_id = %payment.id,
                    item_id = %entry.item_id,
                    error = %err,
                    "Item recomputation failed after allocation was recorded"
                );
                persisted.push(allocation);
                let warning = format!(
                    "Payment {} and its allocations were recorded but item {} could not be updated: {}",
                    payment.id, entry.item_id, err
                );
                return Ok(Outcome::with_warning(
                    PaymentReceipt {
                        payment,
                        allocations: persisted,
                        unallocated: outcome.unallocated,
                    },
                    warning,
                ));
            }

            persisted.push(allocation);
        }

        info!(
            payment_id = %payment.id,
            lot_id = %request.lot_id,
            allocations = persisted.len(),
            unallocated = %outcome.unallocated,
            "Recorded payment"
        );

        let receipt = PaymentReceipt {
            payment,
            allocations: persisted,
            unallocated: outcome.unallocated,
        };

        if receipt.unallocated.is_positive() {
            let note = format!(
                "{} of the payment matched no outstanding levy item and remains unallocated",
                receipt.unallocated
            );
            Ok(Outcome::with_warning(receipt, note))
        } else {
            Ok(Outcome::ok(receipt))
        }
    }

    /// Fetches a payment with its allocations
    pub async fn get_payment(
        &self,
        ctx: &RequestContext,
        id: core_kernel::PaymentId,
    ) -> Result<(Payment, Vec<PaymentAllocation>), LevyError> {
        let payment = self.store.get_payment(ctx.scheme_id, id).await?;
        let allocations = self.store.list_allocations(id).await?;
        Ok((payment, allocations))
    }

    /// Lists a lot's payments
    pub async fn list_payments(
        &self,
        ctx: &RequestContext,
        lot_id: core_kernel::LotId,
    ) -> Result<Vec<Payment>, LevyError> {
        Ok(self.store.list_payments(ctx.scheme_id, lot_id).await?)
    }

    /// Sweeps a lot's unpaid items past their due date into `overdue`
    pub async fn refresh_overdue_items(
        &self,
        ctx: &RequestContext,
        lot_id: core_kernel::LotId,
        today: chrono::NaiveDate,
    ) -> Result<usize, LevyError> {
        let items = self
            .store
            .list_outstanding_items(ctx.scheme_id, lot_id)
            .await?;

        let mut updated = 0;
        for mut item in items {
            let before = item.status;
            item.refresh_overdue(today);
            if item.status != before {
                self.store.update_item(&item).await?;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
