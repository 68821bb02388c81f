//! Reporting service: dashboard rollups and widgets.

use stockroom_core::{DomainError, UserId};
use stockroom_reporting::{
    DashboardSummary, DateRange, Granularity, RevenueBucket, TopProductRow, TotalsRow,
};

use crate::store::{ReportingStore, StoreResult};

#[derive(Debug, Clone)]
pub struct ReportService<S> {
    store: S,
}

impl<S> ReportService<S>
where
    S: ReportingStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Revenue bucketed by period (daily/weekly/monthly/yearly), ascending.
    pub async fn revenue_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        self.store.revenue_rollup(user_id, granularity, range).await
    }

    /// Purchase spend bucketed by period, ascending.
    pub async fn spend_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        self.store.spend_rollup(user_id, granularity, range).await
    }

    /// Best sellers by revenue.
    pub async fn top_products(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> StoreResult<Vec<TopProductRow>> {
        if limit <= 0 {
            return Err(DomainError::validation(format!(
                "limit must be positive, got {limit}"
            ))
            .into());
        }
        self.store.top_products(user_id, limit).await
    }

    /// Lifetime purchase spend + purchase count.
    pub async fn spend_totals(&self, user_id: UserId) -> StoreResult<TotalsRow> {
        self.store.spend_totals(user_id).await
    }

    pub async fn dashboard_summary(&self, user_id: UserId) -> StoreResult<DashboardSummary> {
        self.store.dashboard_summary(user_id).await
    }
}
