//! Purchase audit service (read-only).
//!
//! Purchases are written by the product create/restock paths; this service
//! only exposes the audit trail.

use stockroom_core::{DomainError, UserId};
use stockroom_purchasing::{Purchase, PurchaseId};

use crate::store::{PurchaseStore, StoreResult};

#[derive(Debug, Clone)]
pub struct PurchaseService<S> {
    store: S,
}

impl<S> PurchaseService<S>
where
    S: PurchaseStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, user_id: UserId, id: PurchaseId) -> StoreResult<Purchase> {
        self.store
            .get_purchase(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn list(&self, user_id: UserId) -> StoreResult<Vec<Purchase>> {
        self.store.list_purchases(user_id).await
    }

    pub async fn count(&self, user_id: UserId) -> StoreResult<u64> {
        self.store.count_purchases(user_id).await
    }
}
