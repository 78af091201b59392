//! PostgreSQL persistence for the strata core
//!
//! Provides connection pooling, embedded migrations, and the store
//! adapters that implement the domain persistence ports:
//!
//! - [`PgLevyStore`] for levy schedules, items, payments and allocations
//! - [`PgLedgerStore`] for the chart of accounts and transactions
//! - [`PgBudgetStore`] for budgets and their line items
//!
//! Domain crates never see SQLx types; everything crosses the port
//! boundary as domain structs and `PortError`.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use repositories::{PgBudgetStore, PgLedgerStore, PgLevyStore};
