//! Store adapters backed by PostgreSQL
//!
//! One repository per domain store port. Rows are mapped through plain
//! `FromRow` structs and converted into domain types; enum columns are
//! stored as their wire strings and parsed back on read.

pub mod levy;
pub mod ledger;
pub mod budget;

pub use levy::PgLevyStore;
pub use ledger::PgLedgerStore;
pub use budget::PgBudgetStore;

use core_kernel::{Currency, Money, PortError};
use rust_decimal::Decimal;

/// Rehydrates a money value from its amount and currency-code columns
pub(crate) fn money_from_row(amount: Decimal, currency: &str) -> Result<Money, PortError> {
    let currency: Currency = currency
        .parse()
        .map_err(|e| PortError::internal(format!("Bad currency column: {e}")))?;
    Ok(Money::new(amount, currency))
}

/// Parses an enum column through its domain `FromStr`
pub(crate) fn parse_column<T>(value: &str, column: &str) -> Result<T, PortError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| PortError::internal(format!("Bad {column} column: {e}")))
}
