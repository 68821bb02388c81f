//! In-memory rollup equivalents of the aggregation pipelines.
//!
//! The in-memory store has no database to run pipelines on, so it folds the
//! same buckets here. Period labels come from [`Granularity::bucket_key`],
//! which uses the exact format strings the `$dateToString` stages use, and
//! buckets are emitted in ascending period order to match `$sort: { _id: 1 }`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use stockroom_core::Money;
use stockroom_purchasing::Purchase;
use stockroom_sales::Sale;

use crate::granularity::{DateRange, Granularity};
use crate::rows::{RevenueBucket, TopProductRow, TotalsRow};

/// Fold `(timestamp, cents)` entries into sorted period buckets.
pub fn bucket<I>(granularity: Granularity, range: DateRange, entries: I) -> Vec<RevenueBucket>
where
    I: IntoIterator<Item = (DateTime<Utc>, i64)>,
{
    let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for (at, cents) in entries {
        if !range.contains(at) {
            continue;
        }
        let entry = buckets.entry(granularity.bucket_key(at)).or_insert((0, 0));
        entry.0 += cents;
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(period, (revenue, count))| RevenueBucket {
            period,
            revenue: Money::from_cents(revenue),
            count,
        })
        .collect()
}

/// Revenue rollup over sales (mirror of [`crate::pipeline::revenue_rollup`]).
pub fn revenue_rollup(
    sales: &[Sale],
    granularity: Granularity,
    range: DateRange,
) -> Vec<RevenueBucket> {
    bucket(
        granularity,
        range,
        sales.iter().map(|s| (s.sold_at, s.total_price.cents())),
    )
}

/// Spend rollup over purchases (mirror of [`crate::pipeline::spend_rollup`]).
pub fn spend_rollup(
    purchases: &[Purchase],
    granularity: Granularity,
    range: DateRange,
) -> Vec<RevenueBucket> {
    bucket(
        granularity,
        range,
        purchases
            .iter()
            .map(|p| (p.purchased_at, p.total_cost.cents())),
    )
}

/// Sum + count (mirror of [`crate::pipeline::totals`]).
pub fn totals<I>(amounts: I) -> TotalsRow
where
    I: IntoIterator<Item = i64>,
{
    let mut row = TotalsRow::default();
    for cents in amounts {
        row.total += cents;
        row.count += 1;
    }
    row
}

/// Best sellers (mirror of [`crate::pipeline::top_products`]): group by
/// product, sort by revenue desc, units desc, product id asc, truncate.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<TopProductRow> {
    let mut by_product: BTreeMap<String, TopProductRow> = BTreeMap::new();
    for sale in sales {
        by_product
            .entry(sale.product_id.to_string())
            .and_modify(|row| {
                row.units += sale.quantity;
                row.revenue = Money::from_cents(row.revenue.cents() + sale.total_price.cents());
            })
            .or_insert_with(|| TopProductRow {
                product_id: sale.product_id,
                product_name: sale.product_name.clone(),
                units: sale.quantity,
                revenue: sale.total_price,
            });
    }
    let mut rows: Vec<TopProductRow> = by_product.into_values().collect();
    rows.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(b.units.cmp(&a.units))
            .then(a.product_id.to_string().cmp(&b.product_id.to_string()))
    });
    rows.truncate(limit);
    rows
}
