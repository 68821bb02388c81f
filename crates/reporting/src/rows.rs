//! Report row types, shared by the database-side and in-memory paths.
//!
//! Field names mirror the `$project` stages in [`crate::pipeline`]; rows coming
//! back from an aggregation cursor deserialize straight into these structs.

use serde::{Deserialize, Serialize};

use stockroom_core::Money;
use stockroom_products::ProductId;

/// One period bucket of a revenue (or spend) rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Period label, e.g. `2024-03-09`, `2024-W10`, `2024-03`, `2024`.
    pub period: String,
    pub revenue: Money,
    pub count: i64,
}

/// Whole-collection totals (dashboard cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TotalsRow {
    pub total: i64,
    pub count: i64,
}

/// One row of the best-sellers widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProductRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub units: i64,
    pub revenue: Money,
}

/// The dashboard header cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub revenue_total: Money,
    pub sales_count: i64,
    pub products_count: i64,
    pub sellers_count: i64,
    pub units_in_stock: i64,
}
