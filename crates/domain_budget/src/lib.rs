//! Budget Domain
//!
//! Fund budgets per financial year with an approval workflow
//! (`draft → review → approved`, reopened as `amended`), per-category
//! line items backing a derived total, and the budget-vs-actual variance
//! report.

pub mod budget;
pub mod variance;
pub mod ports;
pub mod services;
pub mod error;

pub use budget::{Budget, BudgetLineItem, BudgetStatus};
pub use variance::{budget_vs_actual, BudgetVsActualRow, CategoryActual, VarianceStatus};
pub use ports::BudgetStore;
pub use services::{
    BudgetService, BudgetWithLines, CreateBudgetRequest, UpsertLineRequest,
};
pub use error::BudgetError;
