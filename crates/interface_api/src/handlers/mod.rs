//! Request handlers

pub mod budget;
pub mod health;
pub mod ledger;
pub mod levy;
pub mod payments;
