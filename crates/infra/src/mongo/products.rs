//! Catalog operations against the `products` (and `purchases`) collections.

use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::ClientSession;

use stockroom_core::{DomainError, Quantity, UserId};
use stockroom_products::{Product, ProductFilter, ProductId};
use stockroom_purchasing::Purchase;

use crate::store::{ProductStore, StoreError, StoreResult};

use super::{MongoStore, by_id, by_user, escape_regex};

impl MongoStore {
    async fn insert_product_in_txn(
        &self,
        product: &Product,
        intake: Option<&Purchase>,
        session: &mut ClientSession,
    ) -> StoreResult<()> {
        self.products()
            .insert_one(product)
            .session(&mut *session)
            .await?;
        if let Some(purchase) = intake {
            self.purchases()
                .insert_one(purchase)
                .session(session)
                .await?;
        }
        Ok(())
    }

    async fn insert_product_sequential(
        &self,
        product: &Product,
        intake: Option<&Purchase>,
    ) -> StoreResult<()> {
        self.products().insert_one(product).await?;
        if let Some(purchase) = intake {
            if let Err(err) = self.purchases().insert_one(purchase).await {
                // Compensate: without a transaction the product insert has
                // already landed, so take it back out.
                let _ = self
                    .products()
                    .delete_one(by_id(product.user_id, product.id))
                    .await;
                return Err(err.into());
            }
        }
        Ok(())
    }

    async fn restock_in_txn(
        &self,
        user_id: UserId,
        id: ProductId,
        quantity: Quantity,
        now: DateTime<Utc>,
        session: &mut ClientSession,
    ) -> StoreResult<(Product, Purchase)> {
        let mut product: Product = self
            .products()
            .find_one(by_id(user_id, id))
            .session(&mut *session)
            .await?
            .ok_or(DomainError::NotFound)?;
        product.add_stock(quantity)?;
        product.updated_at = now;
        let purchase = Purchase::intake(&product, quantity, now)?;

        self.products()
            .update_one(
                by_id(user_id, id),
                doc! {
                    "$inc": { "stock": quantity.get() },
                    "$set": { "updated_at": bson::DateTime::from_chrono(now) },
                },
            )
            .session(&mut *session)
            .await?;
        self.purchases()
            .insert_one(&purchase)
            .session(session)
            .await?;
        Ok((product, purchase))
    }

    async fn restock_sequential(
        &self,
        user_id: UserId,
        id: ProductId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> StoreResult<(Product, Purchase)> {
        let mut product: Product = self
            .products()
            .find_one(by_id(user_id, id))
            .await?
            .ok_or(DomainError::NotFound)?;
        product.add_stock(quantity)?;
        product.updated_at = now;
        let purchase = Purchase::intake(&product, quantity, now)?;

        let result = self
            .products()
            .update_one(
                by_id(user_id, id),
                doc! {
                    "$inc": { "stock": quantity.get() },
                    "$set": { "updated_at": bson::DateTime::from_chrono(now) },
                },
            )
            .await?;
        if result.matched_count == 0 {
            return Err(DomainError::not_found().into());
        }
        if let Err(err) = self.purchases().insert_one(&purchase).await {
            // Compensate the increment so stock and audit trail stay in step.
            let _ = self
                .products()
                .update_one(
                    by_id(user_id, id),
                    doc! { "$inc": { "stock": -quantity.get() } },
                )
                .await;
            return Err(err.into());
        }
        Ok((product, purchase))
    }
}

#[async_trait]
impl ProductStore for MongoStore {
    async fn create_product(&self, product: Product, intake: Option<Purchase>) -> StoreResult<()> {
        if let Some(mut session) = self.open_txn().await? {
            match self
                .insert_product_in_txn(&product, intake.as_ref(), &mut session)
                .await
            {
                Ok(()) => {
                    session.commit_transaction().await?;
                    return Ok(());
                }
                Err(StoreError::TxnUnsupported) => {
                    let _ = session.abort_transaction().await;
                    self.disable_txn();
                }
                Err(err) => {
                    let _ = session.abort_transaction().await;
                    return Err(err);
                }
            }
        }
        self.insert_product_sequential(&product, intake.as_ref())
            .await
    }

    async fn get_product(&self, user_id: UserId, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.products().find_one(by_id(user_id, id)).await?)
    }

    async fn list_products(
        &self,
        user_id: UserId,
        filter: &ProductFilter,
    ) -> StoreResult<Vec<Product>> {
        let mut query = by_user(user_id);
        if let Some(category) = &filter.category {
            query.insert("category", category.as_str());
        }
        if let Some(needle) = &filter.name_contains {
            query.insert(
                "name",
                doc! { "$regex": escape_regex(needle), "$options": "i" },
            );
        }
        let cursor = self
            .products()
            .find(query)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;
        collect(cursor).await
    }

    async fn replace_product(&self, product: &Product) -> StoreResult<()> {
        let result = self
            .products()
            .replace_one(by_id(product.user_id, product.id), product)
            .await?;
        if result.matched_count == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn restock_product(
        &self,
        user_id: UserId,
        id: ProductId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> StoreResult<(Product, Purchase)> {
        if let Some(mut session) = self.open_txn().await? {
            match self
                .restock_in_txn(user_id, id, quantity, now, &mut session)
                .await
            {
                Ok(out) => {
                    session.commit_transaction().await?;
                    return Ok(out);
                }
                Err(StoreError::TxnUnsupported) => {
                    let _ = session.abort_transaction().await;
                    self.disable_txn();
                }
                Err(err) => {
                    let _ = session.abort_transaction().await;
                    return Err(err);
                }
            }
        }
        self.restock_sequential(user_id, id, quantity, now).await
    }

    async fn delete_product(&self, user_id: UserId, id: ProductId) -> StoreResult<()> {
        let result = self.products().delete_one(by_id(user_id, id)).await?;
        if result.deleted_count == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn count_products(&self, user_id: UserId) -> StoreResult<u64> {
        Ok(self.products().count_documents(by_user(user_id)).await?)
    }
}

/// Drain a typed cursor into a vector.
pub(crate) async fn collect<T>(mut cursor: mongodb::Cursor<T>) -> StoreResult<Vec<T>>
where
    T: serde::de::DeserializeOwned + Send + Sync + Unpin,
{
    use futures::stream::TryStreamExt;

    let mut out = Vec::new();
    while let Some(item) = cursor.try_next().await? {
        out.push(item);
    }
    Ok(out)
}
