//! In-memory backend.
//!
//! Intended for tests/dev. Not optimized for performance. Two-step writes are
//! made atomic by holding the relevant write locks for the whole operation;
//! lock acquisition is always products → sales → purchases → sellers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use stockroom_core::{DomainError, Quantity, UserId};
use stockroom_products::{Product, ProductFilter, ProductId};
use stockroom_purchasing::{Purchase, PurchaseId};
use stockroom_reporting::{
    DashboardSummary, DateRange, Granularity, RevenueBucket, TopProductRow, TotalsRow, rollup,
};
use stockroom_sales::{NewSale, Sale, SaleId};
use stockroom_sellers::{Seller, SellerId};

use crate::store::{
    ProductStore, PurchaseStore, ReportingStore, SaleStore, SellerStore, StoreError, StoreResult,
};

#[derive(Debug, Default)]
struct Inner {
    products: RwLock<HashMap<(UserId, ProductId), Product>>,
    sales: RwLock<HashMap<(UserId, SaleId), Sale>>,
    purchases: RwLock<HashMap<(UserId, PurchaseId), Purchase>>,
    sellers: RwLock<HashMap<(UserId, SellerId), Seller>>,
}

/// In-memory store backing tests and local development.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("lock poisoned")
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, product: Product, intake: Option<Purchase>) -> StoreResult<()> {
        let mut products = self.inner.products.write().map_err(|_| poisoned())?;
        let mut purchases = self.inner.purchases.write().map_err(|_| poisoned())?;
        products.insert((product.user_id, product.id), product);
        if let Some(purchase) = intake {
            purchases.insert((purchase.user_id, purchase.id), purchase);
        }
        Ok(())
    }

    async fn get_product(&self, user_id: UserId, id: ProductId) -> StoreResult<Option<Product>> {
        let products = self.inner.products.read().map_err(|_| poisoned())?;
        Ok(products.get(&(user_id, id)).cloned())
    }

    async fn list_products(
        &self,
        user_id: UserId,
        filter: &ProductFilter,
    ) -> StoreResult<Vec<Product>> {
        let products = self.inner.products.read().map_err(|_| poisoned())?;
        let mut out: Vec<Product> = products
            .values()
            .filter(|p| p.user_id == user_id && filter.matches(p))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.0.cmp(&a.id.0))
        });
        Ok(out)
    }

    async fn replace_product(&self, product: &Product) -> StoreResult<()> {
        let mut products = self.inner.products.write().map_err(|_| poisoned())?;
        let key = (product.user_id, product.id);
        if !products.contains_key(&key) {
            return Err(DomainError::not_found().into());
        }
        products.insert(key, product.clone());
        Ok(())
    }

    async fn restock_product(
        &self,
        user_id: UserId,
        id: ProductId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> StoreResult<(Product, Purchase)> {
        let mut products = self.inner.products.write().map_err(|_| poisoned())?;
        let mut purchases = self.inner.purchases.write().map_err(|_| poisoned())?;
        let product = products
            .get_mut(&(user_id, id))
            .ok_or(DomainError::NotFound)?;
        product.add_stock(quantity)?;
        product.updated_at = now;
        let purchase = Purchase::intake(product, quantity, now)?;
        purchases.insert((purchase.user_id, purchase.id), purchase.clone());
        Ok((product.clone(), purchase))
    }

    async fn delete_product(&self, user_id: UserId, id: ProductId) -> StoreResult<()> {
        let mut products = self.inner.products.write().map_err(|_| poisoned())?;
        products
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    async fn count_products(&self, user_id: UserId) -> StoreResult<u64> {
        let products = self.inner.products.read().map_err(|_| poisoned())?;
        Ok(products.values().filter(|p| p.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn record_sale(
        &self,
        user_id: UserId,
        new: NewSale,
        now: DateTime<Utc>,
    ) -> StoreResult<Sale> {
        let mut products = self.inner.products.write().map_err(|_| poisoned())?;
        let mut sales = self.inner.sales.write().map_err(|_| poisoned())?;
        let product = products
            .get_mut(&(user_id, new.product_id))
            .ok_or(DomainError::NotFound)?;
        let quantity = Quantity::new(new.quantity)?;
        let sale = Sale::record(user_id, product, new, now)?;
        // Validation passed; the stock check is the last thing that can fail.
        product.take_stock(quantity)?;
        sales.insert((user_id, sale.id), sale.clone());
        Ok(sale)
    }

    async fn get_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<Option<Sale>> {
        let sales = self.inner.sales.read().map_err(|_| poisoned())?;
        Ok(sales.get(&(user_id, id)).cloned())
    }

    async fn list_sales(&self, user_id: UserId) -> StoreResult<Vec<Sale>> {
        let sales = self.inner.sales.read().map_err(|_| poisoned())?;
        let mut out: Vec<Sale> = sales
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.sold_at.cmp(&a.sold_at).then(b.id.0.cmp(&a.id.0)));
        Ok(out)
    }

    async fn delete_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<()> {
        let mut sales = self.inner.sales.write().map_err(|_| poisoned())?;
        sales
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    async fn count_sales(&self, user_id: UserId) -> StoreResult<u64> {
        let sales = self.inner.sales.read().map_err(|_| poisoned())?;
        Ok(sales.values().filter(|s| s.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn get_purchase(&self, user_id: UserId, id: PurchaseId) -> StoreResult<Option<Purchase>> {
        let purchases = self.inner.purchases.read().map_err(|_| poisoned())?;
        Ok(purchases.get(&(user_id, id)).cloned())
    }

    async fn list_purchases(&self, user_id: UserId) -> StoreResult<Vec<Purchase>> {
        let purchases = self.inner.purchases.read().map_err(|_| poisoned())?;
        let mut out: Vec<Purchase> = purchases
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.purchased_at
                .cmp(&a.purchased_at)
                .then(b.id.0.cmp(&a.id.0))
        });
        Ok(out)
    }

    async fn count_purchases(&self, user_id: UserId) -> StoreResult<u64> {
        let purchases = self.inner.purchases.read().map_err(|_| poisoned())?;
        Ok(purchases.values().filter(|p| p.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl SellerStore for MemoryStore {
    async fn create_seller(&self, seller: Seller) -> StoreResult<()> {
        let mut sellers = self.inner.sellers.write().map_err(|_| poisoned())?;
        sellers.insert((seller.user_id, seller.id), seller);
        Ok(())
    }

    async fn get_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<Option<Seller>> {
        let sellers = self.inner.sellers.read().map_err(|_| poisoned())?;
        Ok(sellers.get(&(user_id, id)).cloned())
    }

    async fn list_sellers(&self, user_id: UserId) -> StoreResult<Vec<Seller>> {
        let sellers = self.inner.sellers.read().map_err(|_| poisoned())?;
        let mut out: Vec<Seller> = sellers
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.0.cmp(&b.id.0)));
        Ok(out)
    }

    async fn delete_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<()> {
        let mut sellers = self.inner.sellers.write().map_err(|_| poisoned())?;
        sellers
            .remove(&(user_id, id))
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }

    async fn count_sellers(&self, user_id: UserId) -> StoreResult<u64> {
        let sellers = self.inner.sellers.read().map_err(|_| poisoned())?;
        Ok(sellers.values().filter(|s| s.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl ReportingStore for MemoryStore {
    async fn revenue_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        let sales = self.list_sales(user_id).await?;
        Ok(rollup::revenue_rollup(&sales, granularity, range))
    }

    async fn spend_rollup(
        &self,
        user_id: UserId,
        granularity: Granularity,
        range: DateRange,
    ) -> StoreResult<Vec<RevenueBucket>> {
        let purchases = self.list_purchases(user_id).await?;
        Ok(rollup::spend_rollup(&purchases, granularity, range))
    }

    async fn top_products(&self, user_id: UserId, limit: i64) -> StoreResult<Vec<TopProductRow>> {
        let sales = self.list_sales(user_id).await?;
        Ok(rollup::top_products(&sales, limit.max(0) as usize))
    }

    async fn spend_totals(&self, user_id: UserId) -> StoreResult<TotalsRow> {
        let purchases = self.list_purchases(user_id).await?;
        Ok(rollup::totals(purchases.iter().map(|p| p.total_cost.cents())))
    }

    async fn dashboard_summary(&self, user_id: UserId) -> StoreResult<DashboardSummary> {
        let sales = self.list_sales(user_id).await?;
        let revenue = rollup::totals(sales.iter().map(|s| s.total_price.cents()));
        let products = self.list_products(user_id, &ProductFilter::default()).await?;
        let stock = rollup::totals(products.iter().map(|p| p.stock));
        let sellers_count = self.count_sellers(user_id).await? as i64;
        Ok(DashboardSummary {
            revenue_total: stockroom_core::Money::from_cents(revenue.total),
            sales_count: revenue.count,
            products_count: stock.count,
            sellers_count,
            units_in_stock: stock.total,
        })
    }
}
