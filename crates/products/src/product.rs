use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Money, Quantity, RecordId, UserId};
use stockroom_sellers::SellerId;

/// Product identifier (scoped to the owning user in queries).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(RecordId::new())
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Input for creating a product.
///
/// `stock` is the opening stock level; the store records it as a purchase
/// (stock intake) in the same write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub seller_id: Option<SellerId>,
}

/// Partial update for a product. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub seller_id: Option<SellerId>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price_cents.is_none()
            && self.category.is_none()
            && self.brand.is_none()
            && self.seller_id.is_none()
    }
}

/// Listing filter: optional category match and case-insensitive name search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub name_contains: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// A catalog entry with its current stock level.
///
/// Category and brand are labels managed by the admin UI; the seller reference
/// points at a [`stockroom_sellers::Seller`] owned by the same user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub user_id: UserId,
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub seller_id: Option<SellerId>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn create(user_id: UserId, new: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if new.stock < 0 {
            return Err(DomainError::validation(format!(
                "opening stock must be non-negative, got {}",
                new.stock
            )));
        }
        let price = Money::non_negative(new.price_cents)?;
        Ok(Self {
            id: ProductId::generate(),
            user_id,
            name: name.to_string(),
            price,
            stock: new.stock,
            category: new.category,
            brand: new.brand,
            seller_id: new.seller_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Remove units for a sale. Stock must never go negative.
    pub fn take_stock(&mut self, quantity: Quantity) -> DomainResult<()> {
        let units = quantity.get();
        if self.stock < units {
            return Err(DomainError::insufficient_stock(units, self.stock));
        }
        self.stock -= units;
        Ok(())
    }

    /// Add units from a stock intake (restock).
    pub fn add_stock(&mut self, quantity: Quantity) -> DomainResult<()> {
        self.stock = self
            .stock
            .checked_add(quantity.get())
            .ok_or_else(|| DomainError::invariant("stock level overflowed"))?;
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::validation("product name must not be empty"));
            }
            self.name = name.to_string();
        }
        if let Some(cents) = patch.price_cents {
            self.price = Money::non_negative(cents)?;
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(brand) = patch.brand {
            self.brand = Some(brand);
        }
        if let Some(seller_id) = patch.seller_id {
            self.seller_id = Some(seller_id);
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}
