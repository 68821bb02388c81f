//! Tracing/logging setup shared by every binary embedding the services.

pub mod tracing;

pub use self::tracing::{init, init_with_filter};
