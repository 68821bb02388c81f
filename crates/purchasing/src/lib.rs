//! Purchasing domain module.
//!
//! Purchases are derived audit records of stock intake. They are never created
//! directly by callers; product creation and restocking write them alongside
//! the stock change.

pub mod purchase;

pub use purchase::{Purchase, PurchaseId};
