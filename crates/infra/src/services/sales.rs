//! Sales service.

use chrono::Utc;

use stockroom_core::{DomainError, UserId};
use stockroom_sales::{NewSale, Sale, SaleId};

use crate::store::{SaleStore, StoreResult};

/// Records and reads sales.
#[derive(Debug, Clone)]
pub struct SaleService<S> {
    store: S,
}

impl<S> SaleService<S>
where
    S: SaleStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a sale, decrementing the product's stock in the same write.
    pub async fn record(&self, user_id: UserId, new: NewSale) -> StoreResult<Sale> {
        let sale = self.store.record_sale(user_id, new, Utc::now()).await?;
        tracing::info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity,
            total = %sale.total_price,
            "sale recorded"
        );
        Ok(sale)
    }

    pub async fn get(&self, user_id: UserId, id: SaleId) -> StoreResult<Sale> {
        self.store
            .get_sale(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn list(&self, user_id: UserId) -> StoreResult<Vec<Sale>> {
        self.store.list_sales(user_id).await
    }

    /// Remove a sale record. Stock is not compensated; a mis-entered sale is
    /// corrected by an explicit restock so the audit trail stays complete.
    pub async fn delete(&self, user_id: UserId, id: SaleId) -> StoreResult<()> {
        self.store.delete_sale(user_id, id).await?;
        tracing::info!(sale_id = %id, "sale deleted");
        Ok(())
    }

    pub async fn count(&self, user_id: UserId) -> StoreResult<u64> {
        self.store.count_sales(user_id).await
    }
}
