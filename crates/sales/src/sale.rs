use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Money, Quantity, RecordId, UserId};
use stockroom_products::{Product, ProductId};

/// Sale identifier (scoped to the owning user in queries).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub RecordId);

impl SaleId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(RecordId::new())
    }
}

impl core::fmt::Display for SaleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Who bought the units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    pub phone: Option<String>,
}

impl Buyer {
    pub fn new(name: impl Into<String>, phone: Option<String>) -> DomainResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("buyer name must not be empty"));
        }
        Ok(Self {
            name: trimmed.to_string(),
            phone,
        })
    }
}

/// Input for recording a sale.
///
/// The total price is never taken from the caller; it is computed from the
/// product's current price when the sale is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub product_id: ProductId,
    pub quantity: i64,
    pub buyer_name: String,
    pub buyer_phone: Option<String>,
    /// Defaults to the time of recording when absent.
    pub sold_at: Option<DateTime<Utc>>,
}

/// A completed sale of one product.
///
/// `product_name` is denormalized so reports stay readable after the product
/// is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: SaleId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: Money,
    pub buyer: Buyer,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub sold_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Build the sale record for `quantity` units of `product`.
    ///
    /// The caller is responsible for decrementing the product's stock in the
    /// same write; this function only checks the cross-reference invariants
    /// and computes the total.
    pub fn record(
        user_id: UserId,
        product: &Product,
        new: NewSale,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if product.user_id != user_id {
            return Err(DomainError::invariant(
                "sale must reference a product owned by the same user",
            ));
        }
        if new.product_id != product.id {
            return Err(DomainError::invariant(
                "sale input references a different product",
            ));
        }
        let quantity = Quantity::new(new.quantity)?;
        let buyer = Buyer::new(new.buyer_name, new.buyer_phone)?;
        let total_price = product.price.checked_mul(quantity)?;

        Ok(Self {
            id: SaleId::generate(),
            user_id,
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: quantity.get(),
            total_price,
            buyer,
            sold_at: new.sold_at.unwrap_or(now),
            created_at: now,
        })
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}
