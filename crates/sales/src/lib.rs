//! Sales domain module.
//!
//! This crate contains business rules for recording sales, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod sale;

pub use sale::{Buyer, NewSale, Sale, SaleId};
