//! Store seams: every backend (MongoDB, in-memory) implements these traits.
//!
//! The traits deliberately expose the **composite** writes — "insert a sale
//! and decrement stock", "insert a product and its intake purchase" — rather
//! than the individual document operations. Keeping the two-step writes behind
//! one method is what lets each backend make them atomic its own way
//! (transaction, guarded update, or a single lock).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use stockroom_core::{DomainError, Quantity, UserId};
use stockroom_products::{Product, ProductFilter, ProductId};
use stockroom_purchasing::{Purchase, PurchaseId};
use stockroom_reporting::{
    DashboardSummary, DateRange, Granularity, RevenueBucket, TopProductRow, TotalsRow,
};
use stockroom_sales::{NewSale, Sale, SaleId};
use stockroom_sellers::{Seller, SellerId};

/// Result type used across the storage layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
///
/// Domain failures pass through unchanged so callers can match on them
/// (`InsufficientStock`, `NotFound`, ...); everything the backend itself
/// produces collapses into `Backend`/`Serialization`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("document (de)serialization failed: {0}")]
    Serialization(String),

    /// The deployment cannot run multi-document transactions. Internal signal
    /// consumed by the two-step writes to trigger the sequential fallback.
    #[error("transactions not supported by this deployment")]
    TxnUnsupported,
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// The domain error carried by this error, if any.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Catalog storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert `product` together with its opening-stock intake record.
    ///
    /// `intake` is `None` when the product starts with zero stock.
    async fn create_product(&self, product: Product, intake: Option<Purchase>) -> StoreResult<()>;

    async fn get_product(&self, user_id: UserId, id: ProductId) -> StoreResult<Option<Product>>;

    /// All products owned by `user_id` matching `filter`, newest first.
    async fn list_products(
        &self,
        user_id: UserId,
        filter: &ProductFilter,
    ) -> StoreResult<Vec<Product>>;

    /// Persist an updated product. Fails with `NotFound` when the record is
    /// gone (or owned by someone else).
    async fn replace_product(&self, product: &Product) -> StoreResult<()>;

    /// Increment stock by `quantity` and record the intake purchase.
    async fn restock_product(
        &self,
        user_id: UserId,
        id: ProductId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> StoreResult<(Product, Purchase)>;

    async fn delete_product(&self, user_id: UserId, id: ProductId) -> StoreResult<()>;

    async fn count_products(&self, user_id: UserId) -> StoreResult<u64>;
}

/// Sales storage.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Record a sale: compute the total from the product's current price,
    /// decrement stock (never below zero), insert the sale document.
    async fn record_sale(
        &self,
        user_id: UserId,
        new: NewSale,
        now: DateTime<Utc>,
    ) -> StoreResult<Sale>;

    async fn get_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<Option<Sale>>;

    /// All sales owned by `user_id`, newest first.
    async fn list_sales(&self, user_id: UserId) -> StoreResult<Vec<Sale>>;

    /// Remove a sale record (audit correction; stock is not compensated).
    async fn delete_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<()>;

    async fn count_sales(&self, user_id: UserId) -> StoreResult<u64>;
}

/// Purchase audit storage. Purchases are only written through
/// [`ProductStore::create_product`] / [`ProductStore::restock_product`].
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    async fn get_purchase(&self, user_id: UserId, id: PurchaseId) -> StoreResult<Option<Purchase>>;

    /// All purchases owned by `user_id`, newest first.
    async fn list_purchases(&self, user_id: UserId) -> StoreResult<Vec<Purchase>>;

    async fn count_purchases(&self, user_id: UserId) -> StoreResult<u64>;
}

/// Seller storage.
#[async_trait]
pub trait SellerStore: Send + Sync {
    async fn create_seller(&self, seller: Seller) -> StoreResult<()>;

    async fn get_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<Option<Seller>>;

    /// All sellers owned by `user_id`, sorted by name.
    async fn list_sellers(&self, user_id: UserId) -> StoreResult<Vec<Seller>>;

    async fn delete_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<()>;

    async fn count_sellers(&self, user_id: UserId) -> StoreResult<u64>;
}

/// Reporting queries (aggregation pipelines database-side, folds in memory).
#[async_trait]
pub trait ReportingStore: Send + Sync {
    async fn revenue_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>>;

    async fn spend_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>>;

    async fn top_products(&self, user_id: UserId, limit: i64) -> StoreResult<Vec<TopProductRow>>;

    /// Lifetime purchase spend + purchase count (dashboard card).
    async fn spend_totals(&self, user_id: UserId) -> StoreResult<TotalsRow>;

    async fn dashboard_summary(&self, user_id: UserId) -> StoreResult<DashboardSummary>;
}

/// A complete backend.
pub trait Store:
    ProductStore + SaleStore + PurchaseStore + SellerStore + ReportingStore
{
}

impl<S> Store for S where
    S: ProductStore + SaleStore + PurchaseStore + SellerStore + ReportingStore
{
}
