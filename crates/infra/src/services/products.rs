//! Product catalog service.

use chrono::Utc;

use stockroom_core::{DomainError, Quantity, UserId};
use stockroom_products::{NewProduct, Product, ProductFilter, ProductId, ProductPatch};
use stockroom_purchasing::Purchase;

use crate::store::{ProductStore, StoreResult};

/// CRUD + stock intake over the catalog.
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a product; opening stock (if any) is recorded as a purchase in
    /// the same write.
    pub async fn create(&self, user_id: UserId, new: NewProduct) -> StoreResult<Product> {
        let now = Utc::now();
        let product = Product::create(user_id, new, now)?;
        let intake = match Quantity::new(product.stock) {
            Ok(quantity) => Some(Purchase::intake(&product, quantity, now)?),
            // Zero opening stock: nothing flowed in, nothing to audit.
            Err(_) => None,
        };
        self.store.create_product(product.clone(), intake).await?;
        tracing::info!(product_id = %product.id, stock = product.stock, "product created");
        Ok(product)
    }

    pub async fn get(&self, user_id: UserId, id: ProductId) -> StoreResult<Product> {
        self.store
            .get_product(user_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn list(&self, user_id: UserId, filter: ProductFilter) -> StoreResult<Vec<Product>> {
        self.store.list_products(user_id, &filter).await
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: ProductId,
        patch: ProductPatch,
    ) -> StoreResult<Product> {
        let mut product = self.get(user_id, id).await?;
        if patch.is_empty() {
            return Ok(product);
        }
        product.apply_patch(patch, Utc::now())?;
        self.store.replace_product(&product).await?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Bring `units` more units into stock, leaving a purchase audit record.
    pub async fn restock(
        &self,
        user_id: UserId,
        id: ProductId,
        units: i64,
    ) -> StoreResult<(Product, Purchase)> {
        let quantity = Quantity::new(units)?;
        let (product, purchase) = self
            .store
            .restock_product(user_id, id, quantity, Utc::now())
            .await?;
        tracing::info!(
            product_id = %product.id,
            units = quantity.get(),
            stock = product.stock,
            "product restocked"
        );
        Ok((product, purchase))
    }

    pub async fn delete(&self, user_id: UserId, id: ProductId) -> StoreResult<()> {
        self.store.delete_product(user_id, id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn count(&self, user_id: UserId) -> StoreResult<u64> {
        self.store.count_products(user_id).await
    }
}
