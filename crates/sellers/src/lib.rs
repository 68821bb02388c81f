//! Sellers domain module.
//!
//! Sellers are the suppliers products are bought from. They carry almost no
//! state of their own; other records reference them by id.

pub mod seller;

pub use seller::{NewSeller, Seller, SellerId};
