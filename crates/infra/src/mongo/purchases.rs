//! Read-side of the `purchases` collection.
//!
//! Writes happen inside the product create/restock paths; see
//! [`super::products`].

use async_trait::async_trait;
use bson::doc;

use stockroom_core::UserId;
use stockroom_purchasing::{Purchase, PurchaseId};

use crate::store::{PurchaseStore, StoreResult};

use super::products::collect;
use super::{MongoStore, by_id, by_user};

#[async_trait]
impl PurchaseStore for MongoStore {
    async fn get_purchase(&self, user_id: UserId, id: PurchaseId) -> StoreResult<Option<Purchase>> {
        Ok(self.purchases().find_one(by_id(user_id, id)).await?)
    }

    async fn list_purchases(&self, user_id: UserId) -> StoreResult<Vec<Purchase>> {
        let cursor = self
            .purchases()
            .find(by_user(user_id))
            .sort(doc! { "purchased_at": -1, "_id": -1 })
            .await?;
        collect(cursor).await
    }

    async fn count_purchases(&self, user_id: UserId) -> StoreResult<u64> {
        Ok(self.purchases().count_documents(by_user(user_id)).await?)
    }
}
