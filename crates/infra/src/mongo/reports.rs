//! Reporting queries: the aggregation pipelines from `stockroom-reporting`
//! run database-side, rows deserialize straight into the shared row types.

use async_trait::async_trait;
use bson::Document;
use futures::stream::TryStreamExt;
use serde::de::DeserializeOwned;

use stockroom_core::{Money, UserId};
use stockroom_reporting::{
    DashboardSummary, DateRange, Granularity, RevenueBucket, TopProductRow, TotalsRow, pipeline,
};

use crate::store::{ReportingStore, StoreError, StoreResult};

use super::{MongoStore, PRODUCTS, PURCHASES, SALES, by_user};

impl MongoStore {
    /// Run a pipeline on `collection` and deserialize every row.
    async fn run_report<T>(&self, collection: &str, stages: Vec<Document>) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut cursor = self.raw(collection).aggregate(stages).await?;
        let mut rows = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            rows.push(
                bson::from_document(doc).map_err(|e| StoreError::Serialization(e.to_string()))?,
            );
        }
        Ok(rows)
    }

    /// Totals pipelines return one row, or none for an empty collection.
    async fn run_totals(
        &self,
        collection: &str,
        user_id: UserId,
        amount_field: &str,
    ) -> StoreResult<TotalsRow> {
        let rows: Vec<TotalsRow> = self
            .run_report(collection, pipeline::totals(user_id, amount_field))
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl ReportingStore for MongoStore {
    async fn revenue_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        self.run_report(SALES, pipeline::revenue_rollup(user_id, granularity, range))
            .await
    }

    async fn spend_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        self.run_report(
            PURCHASES,
            pipeline::spend_rollup(user_id, granularity, range),
        )
        .await
    }

    async fn top_products(&self, user_id: UserId, limit: i64) -> StoreResult<Vec<TopProductRow>> {
        self.run_report(SALES, pipeline::top_products(user_id, limit))
            .await
    }

    async fn spend_totals(&self, user_id: UserId) -> StoreResult<TotalsRow> {
        self.run_totals(PURCHASES, user_id, "total_cost").await
    }

    async fn dashboard_summary(&self, user_id: UserId) -> StoreResult<DashboardSummary> {
        let revenue = self.run_totals(SALES, user_id, "total_price").await?;
        let stock = self.run_totals(PRODUCTS, user_id, "stock").await?;
        let sellers_count = self.sellers().count_documents(by_user(user_id)).await?;
        Ok(DashboardSummary {
            revenue_total: Money::from_cents(revenue.total),
            sales_count: revenue.count,
            products_count: stock.count,
            sellers_count: sellers_count as i64,
            units_in_stock: stock.total,
        })
    }
}
