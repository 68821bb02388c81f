//! Seller service.

use chrono::Utc;

use stockroom_core::{DomainError, UserId};
use stockroom_sellers::{NewSeller, Seller, SellerId};

use crate::store::{SellerStore, StoreResult};

#[derive(Debug, Clone)]
pub struct SellerService<S> {
    store: S,
}

impl<S> SellerService<S>
where
    S: SellerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, user_id: UserId, new: NewSeller) -> StoreResult<Seller> {
        let seller = Seller::create(user_id, new, Utc::now())?;
        self.store.create_seller(seller.clone()).await?;
        tracing::info!(seller_id = %seller.id, "seller created");
        Ok(seller)
    }

    pub async fn get(&self, user_id: UserId, id: SellerId) -> StoreResult<Seller> {
        self.store
            .get_seller(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn list(&self, user_id: UserId) -> StoreResult<Vec<Seller>> {
        self.store.list_sellers(user_id).await
    }

    pub async fn delete(&self, user_id: UserId, id: SellerId) -> StoreResult<()> {
        self.store.delete_seller(user_id, id).await?;
        tracing::info!(seller_id = %id, "seller deleted");
        Ok(())
    }

    pub async fn count(&self, user_id: UserId) -> StoreResult<u64> {
        self.store.count_sellers(user_id).await
    }
}
