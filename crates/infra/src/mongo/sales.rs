//! Sale recording against the `sales` (and `products`) collections.
//!
//! The stock decrement is a conditional `$inc` whose filter requires
//! `stock >= quantity`; the update simply does not match when the product
//! cannot cover the sale, so stock can never go negative — with or without a
//! surrounding transaction.

use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::ClientSession;

use stockroom_core::{DomainError, Quantity, UserId};
use stockroom_products::{Product, ProductId};
use stockroom_sales::{NewSale, Sale, SaleId};

use crate::store::{SaleStore, StoreError, StoreResult};

use super::products::collect;
use super::{MongoStore, by_id, by_user};

/// Filter matching the product only when it can cover `quantity` units.
fn stock_guard(user_id: UserId, id: ProductId, quantity: Quantity) -> bson::Document {
    let mut filter = by_id(user_id, id);
    filter.insert("stock", doc! { "$gte": quantity.get() });
    filter
}

impl MongoStore {
    async fn record_sale_in_txn(
        &self,
        user_id: UserId,
        new: &NewSale,
        now: DateTime<Utc>,
        session: &mut ClientSession,
    ) -> StoreResult<Sale> {
        let product: Product = self
            .products()
            .find_one(by_id(user_id, new.product_id))
            .session(&mut *session)
            .await?
            .ok_or(DomainError::NotFound)?;
        let quantity = Quantity::new(new.quantity)?;
        let sale = Sale::record(user_id, &product, new.clone(), now)?;

        let result = self
            .products()
            .update_one(
                stock_guard(user_id, new.product_id, quantity),
                doc! { "$inc": { "stock": -quantity.get() } },
            )
            .session(&mut *session)
            .await?;
        if result.matched_count == 0 {
            // The product was read in this transaction, so a miss can only
            // mean the guard failed.
            return Err(DomainError::insufficient_stock(quantity.get(), product.stock).into());
        }
        self.sales().insert_one(&sale).session(session).await?;
        Ok(sale)
    }

    async fn record_sale_sequential(
        &self,
        user_id: UserId,
        new: NewSale,
        now: DateTime<Utc>,
    ) -> StoreResult<Sale> {
        let product: Product = self
            .products()
            .find_one(by_id(user_id, new.product_id))
            .await?
            .ok_or(DomainError::NotFound)?;
        let quantity = Quantity::new(new.quantity)?;
        let product_id = new.product_id;
        let sale = Sale::record(user_id, &product, new, now)?;

        let result = self
            .products()
            .update_one(
                stock_guard(user_id, product_id, quantity),
                doc! { "$inc": { "stock": -quantity.get() } },
            )
            .await?;
        if result.matched_count == 0 {
            // Guard miss: distinguish a concurrent delete from plain
            // insufficient stock by re-reading.
            return match self.products().find_one(by_id(user_id, product_id)).await? {
                None => Err(DomainError::not_found().into()),
                Some(current) => {
                    Err(DomainError::insufficient_stock(quantity.get(), current.stock).into())
                }
            };
        }
        if let Err(err) = self.sales().insert_one(&sale).await {
            // Compensate the decrement so the units are not lost.
            let _ = self
                .products()
                .update_one(
                    by_id(user_id, product_id),
                    doc! { "$inc": { "stock": quantity.get() } },
                )
                .await;
            return Err(err.into());
        }
        Ok(sale)
    }
}

#[async_trait]
impl SaleStore for MongoStore {
    async fn record_sale(
        &self,
        user_id: UserId,
        new: NewSale,
        now: DateTime<Utc>,
    ) -> StoreResult<Sale> {
        if let Some(mut session) = self.open_txn().await? {
            match self.record_sale_in_txn(user_id, &new, now, &mut session).await {
                Ok(sale) => {
                    session.commit_transaction().await?;
                    return Ok(sale);
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
        self.record_sale_sequential(user_id, new, now).await
    }

    async fn get_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<Option<Sale>> {
        Ok(self.sales().find_one(by_id(user_id, id)).await?)
    }

    async fn list_sales(&self, user_id: UserId) -> StoreResult<Vec<Sale>> {
        let cursor = self
            .sales()
            .find(by_user(user_id))
            .sort(doc! { "sold_at": -1, "_id": -1 })
            .await?;
        collect(cursor).await
    }

    async fn delete_sale(&self, user_id: UserId, id: SaleId) -> StoreResult<()> {
        let result = self.sales().delete_one(by_id(user_id, id)).await?;
        if result.deleted_count == 0 {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    async fn count_sales(&self, user_id: UserId) -> StoreResult<u64> {
        Ok(self.sales().count_documents(by_user(user_id)).await?)
    }
}
