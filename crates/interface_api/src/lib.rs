//! HTTP API Layer
//!
//! This crate provides the REST API for the strata core system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers per domain, scoped by scheme in the
//!   URL (`/api/v1/schemes/:scheme_id/...`)
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses mapped from domain
//!   errors
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::from_pool(pool));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_budget::BudgetService;
use domain_ledger::ReportingService;
use domain_levy::BillingService;
use infra_db::{PgBudgetStore, PgLedgerStore, PgLevyStore};

use crate::handlers::{budget, health, ledger, levy, payments};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub billing: Arc<BillingService>,
    pub reporting: Arc<ReportingService>,
    pub budgets: Arc<BudgetService>,
}

impl AppState {
    /// Creates application state from pre-built services
    ///
    /// Used by tests to wire services over in-memory stores.
    pub fn new(
        billing: Arc<BillingService>,
        reporting: Arc<ReportingService>,
        budgets: Arc<BudgetService>,
    ) -> Self {
        Self {
            billing,
            reporting,
            budgets,
        }
    }

    /// Creates application state over PostgreSQL store adapters
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            billing: Arc::new(BillingService::new(Arc::new(PgLevyStore::new(pool.clone())))),
            reporting: Arc::new(ReportingService::new(Arc::new(PgLedgerStore::new(
                pool.clone(),
            )))),
            budgets: Arc::new(BudgetService::new(Arc::new(PgBudgetStore::new(pool)))),
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no scheme scope)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Levy schedule routes
    let schedule_routes = Router::new()
        .route("/", post(levy::create_schedule))
        .route("/", get(levy::list_schedules))
        .route("/:id", get(levy::get_schedule))
        .route("/:id", put(levy::update_schedule))
        .route("/:id", delete(levy::remove_schedule));

    // Payment routes
    let payment_routes = Router::new()
        .route("/", post(payments::record_payment))
        .route("/", get(payments::list_payments))
        .route("/overdue-sweep", post(payments::sweep_overdue))
        .route("/:id", get(payments::get_payment));

    // Ledger routes
    let ledger_routes = Router::new()
        .route("/accounts", post(ledger::setup_chart))
        .route("/accounts", get(ledger::list_accounts))
        .route("/transactions", post(ledger::record_transaction))
        .route("/transactions/:id", delete(ledger::remove_transaction));

    // Report routes
    let report_routes = Router::new()
        .route("/trial-balance", get(ledger::trial_balance))
        .route("/fund-balances", get(ledger::fund_balances))
        .route("/income-statement", get(ledger::income_statement));

    // Budget routes
    let budget_routes = Router::new()
        .route("/", post(budget::create_budget))
        .route("/", get(budget::list_budgets))
        .route("/:id", get(budget::get_budget))
        .route("/:id", delete(budget::delete_budget))
        .route("/:id/lines", post(budget::upsert_line))
        .route("/:id/lines/:line_id", delete(budget::remove_line))
        .route("/:id/submit", post(budget::submit_for_review))
        .route("/:id/approve", post(budget::approve))
        .route("/:id/amend", post(budget::amend))
        .route("/:id/variance", get(budget::variance_report));

    // All operational routes are scoped to one scheme.
    let scheme_routes = Router::new()
        .nest("/levy-schedules", schedule_routes)
        .nest("/payments", payment_routes)
        .nest("/ledger", ledger_routes)
        .nest("/reports", report_routes)
        .nest("/budgets", budget_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1/schemes/:scheme_id", scheme_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
