//! Test Utilities
//!
//! Shared test infrastructure for the strata core test suite:
//!
//! - **Stores**: complete in-memory implementations of the domain
//!   persistence ports, for service and API tests that should not touch
//!   PostgreSQL
//! - **Fixtures**: pre-built, predictable test data
//! - **Assertions**: domain-aware assertion helpers and macros
//!
//! This crate is a dev-dependency only; nothing here ships.

pub mod assertions;
pub mod fixtures;
pub mod stores;

pub use assertions::{
    assert_decimal_in_range, assert_money_approx_eq, assert_money_eq, assert_money_positive,
    assert_money_sum_equals, assert_money_zero,
};
pub use fixtures::{DateFixtures, IdFixtures, LevyFixtures, MoneyFixtures};
pub use stores::{InMemoryBudgetStore, InMemoryLedgerStore, InMemoryLevyStore};
