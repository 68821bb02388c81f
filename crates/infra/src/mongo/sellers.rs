//! Seller CRUD against the `sellers` collection.

use async_trait::async_trait;
use bson::doc;

use stockroom_core::{DomainError, UserId};
use stockroom_sellers::{Seller, SellerId};

use crate::store::{SellerStore, StoreResult};

use super::products::collect;
use super::{MongoStore, by_id, by_user};

#[async_trait]
impl SellerStore for MongoStore {
    async fn create_seller(&self, seller: Seller) -> StoreResult<()> {
        self.sellers().insert_one(&seller).await?;
        Ok(())
    }

    async fn get_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<Option<Seller>> {
        Ok(self.sellers().find_one(by_id(user_id, id)).await?)
    }

    async fn list_sellers(&self, user_id: UserId) -> StoreResult<Vec<Seller>> {
        let cursor = self
            .sellers()
            .find(by_user(user_id))
            .sort(doc! { "name": 1, "_id": 1 })
            .await?;
        collect(cursor).await
    }

    async fn delete_seller(&self, user_id: UserId, id: SellerId) -> StoreResult<()> {
        let result = self.sellers().delete_one(by_id(user_id, id)).await?;
        if result.deleted_count == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn count_sellers(&self, user_id: UserId) -> StoreResult<u64> {
        Ok(self.sellers().count_documents(by_user(user_id)).await?)
    }
}
