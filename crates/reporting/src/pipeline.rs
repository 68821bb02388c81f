//! Aggregation pipeline builders.
//!
//! Every report is a declarative match → group → sort → project sequence,
//! built here as plain BSON documents and handed to the driver unchanged. The
//! in-memory equivalents live in [`crate::rollup`]; if a stage changes shape
//! here, the rollup (and its tests) must follow.

use bson::{Bson, Document, doc};

use stockroom_core::UserId;

use crate::granularity::{DateRange, Granularity};

/// `$match` stage scoping a pipeline to one user, with an optional half-open
/// window on `date_field`.
fn match_stage(user_id: UserId, date_field: Option<(&str, DateRange)>) -> Document {
    let mut filter = doc! { "user_id": user_id.to_string() };
    if let Some((field, range)) = date_field {
        let mut window = Document::new();
        if let Some(start) = range.start {
            window.insert("$gte", bson::DateTime::from_chrono(start));
        }
        if let Some(end) = range.end {
            window.insert("$lt", bson::DateTime::from_chrono(end));
        }
        if !window.is_empty() {
            filter.insert(field, window);
        }
    }
    doc! { "$match": filter }
}

/// Period rollup over any collection carrying a date and an amount field.
///
/// Groups documents into `granularity` buckets keyed by a `$dateToString`
/// label, sums the amount, counts documents, sorts by period, and projects
/// into the [`crate::rows::RevenueBucket`] shape.
pub fn rollup(
    user_id: UserId,
    granularity: Granularity,
    range: DateRange,
    date_field: &str,
    amount_field: &str,
) -> Vec<Document> {
    vec![
        match_stage(user_id, Some((date_field, range))),
        doc! {
            "$group": {
                "_id": {
                    "$dateToString": {
                        "format": granularity.format(),
                        "date": format!("${date_field}"),
                    }
                },
                "revenue": { "$sum": format!("${amount_field}") },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id": 1 } },
        doc! {
            "$project": {
                "_id": 0,
                "period": "$_id",
                "revenue": 1,
                "count": 1,
            }
        },
    ]
}

/// Revenue rollup over the sales collection.
pub fn revenue_rollup(user_id: UserId, granularity: Granularity, range: DateRange) -> Vec<Document> {
    rollup(user_id, granularity, range, "sold_at", "total_price")
}

/// Spend rollup over the purchases collection.
pub fn spend_rollup(user_id: UserId, granularity: Granularity, range: DateRange) -> Vec<Document> {
    rollup(user_id, granularity, range, "purchased_at", "total_cost")
}

/// Sum + count of `amount_field` across a user's documents
/// (projected into [`crate::rows::TotalsRow`]).
pub fn totals(user_id: UserId, amount_field: &str) -> Vec<Document> {
    vec![
        match_stage(user_id, None),
        doc! {
            "$group": {
                "_id": Bson::Null,
                "total": { "$sum": format!("${amount_field}") },
                "count": { "$sum": 1 },
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "total": 1,
                "count": 1,
            }
        },
    ]
}

/// Best-selling products by revenue over the sales collection
/// (projected into [`crate::rows::TopProductRow`]).
///
/// Ties are broken by units then by product id so the ordering is total.
pub fn top_products(user_id: UserId, limit: i64) -> Vec<Document> {
    vec![
        match_stage(user_id, None),
        doc! {
            "$group": {
                "_id": "$product_id",
                "product_name": { "$first": "$product_name" },
                "units": { "$sum": "$quantity" },
                "revenue": { "$sum": "$total_price" },
            }
        },
        doc! { "$sort": { "revenue": -1, "units": -1, "_id": 1 } },
        doc! { "$limit": limit },
        doc! {
            "$project": {
                "_id": 0,
                "product_id": "$_id",
                "product_name": 1,
                "units": 1,
                "revenue": 1,
            }
        },
    ]
}
