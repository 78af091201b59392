//! Payments and their allocations
//!
//! A payment records money received for a lot. It is immutable once
//! created; corrections happen via new payments and allocations, never by
//! editing existing rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AllocationId, LevyItemId, LotId, Money, PaymentId, SchemeId};

use crate::error::LevyError;

/// Method by which a payment was received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Cheque,
    Cash,
    DirectDebit,
    Bpay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Cash => "cash",
            PaymentMethod::DirectDebit => "direct_debit",
            PaymentMethod::Bpay => "bpay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = LevyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "cheque" => Ok(PaymentMethod::Cheque),
            "cash" => Ok(PaymentMethod::Cash),
            "direct_debit" => Ok(PaymentMethod::DirectDebit),
            "bpay" => Ok(PaymentMethod::Bpay),
            other => Err(LevyError::Validation(format!(
                "Unknown payment method: {}",
                other
            ))),
        }
    }
}

/// Money received for a lot on a date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Owning scheme
    pub scheme_id: SchemeId,
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
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment record
    pub fn new(
        scheme_id: SchemeId,
        lot_id: LotId,
        amount: Money,
        payment_date: NaiveDate,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            scheme_id,
            lot_id,
            amount,
            payment_date,
            method,
            reference: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A link assigning part or all of a payment to one levy item
///
/// Created exclusively by the FIFO allocation pass and never edited
/// afterwards.
///
/// # Invariants
///
/// - The allocations of one payment never sum to more than the payment
/// - The allocations against one levy item never sum to more than the
///   item's total levy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Unique identifier
    pub id: AllocationId,
    /// The payment being allocated
    pub payment_id: PaymentId,
    /// The levy item receiving the allocation
    pub levy_item_id: LevyItemId,
    /// Amount allocated to this item
    pub amount: Money,
    /// When the allocation was made
    pub allocated_at: DateTime<Utc>,
}

impl PaymentAllocation {
    /// Creates a new allocation
    pub fn new(payment_id: PaymentId, levy_item_id: LevyItemId, amount: Money) -> Self {
        Self {
            id: AllocationId::new_v7(),
            payment_id,
            levy_item_id,
            amount,
            allocated_at: Utc::now(),
        }
    }
}
