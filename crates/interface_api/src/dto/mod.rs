//! Request/response data transfer objects
//!
//! Requests carry plain decimals; the handlers turn them into `Money`
//! in the scheme's currency. Responses flatten `Money` back to decimal
//! amounts. Report DTOs are the domain report types themselves, which
//! already serialize cleanly.

pub mod budget;
pub mod ledger;
pub mod levy;
