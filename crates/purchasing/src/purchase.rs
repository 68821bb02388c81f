use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, Money, Quantity, RecordId, UserId};
use stockroom_products::{Product, ProductId};
use stockroom_sellers::SellerId;

/// Purchase identifier (scoped to the owning user in queries).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseId(pub RecordId);

impl PurchaseId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(RecordId::new())
    }
}

impl core::fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Audit record of a stock intake.
///
/// Intake is valued at the product's price at the time of the write; the
/// system does not track a separate cost price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "_id")]
    pub id: PurchaseId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    pub seller_id: Option<SellerId>,
    pub quantity: i64,
    pub total_cost: Money,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Audit record for `quantity` units flowing into `product`'s stock.
    ///
    /// Used both for the opening stock at product creation and for restocks.
    pub fn intake(
        product: &Product,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> stockroom_core::DomainResult<Self> {
        let total_cost = product.price.checked_mul(quantity)?;
        Ok(Self {
            id: PurchaseId::generate(),
            user_id: product.user_id,
            product_id: product.id,
            product_name: product.name.clone(),
            seller_id: product.seller_id,
            quantity: quantity.get(),
            total_cost,
            purchased_at: now,
        })
    }
}

impl Entity for Purchase {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_products::NewProduct;

    fn test_user_id() -> UserId {
        "00000000-0000-0000-0000-000000000001".parse().unwrap()
    }

    fn test_time() -> DateTime<Utc> {
        "2024-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn intake_copies_product_references_and_values_at_price() {
        let seller_id = SellerId::generate();
        let product = Product::create(
            test_user_id(),
            NewProduct {
                name: "Widget".to_string(),
                price_cents: 400,
                stock: 0,
                category: None,
                brand: None,
                seller_id: Some(seller_id),
            },
            test_time(),
        )
        .unwrap();

        let purchase = Purchase::intake(&product, Quantity::new(25).unwrap(), test_time()).unwrap();
        assert_eq!(purchase.user_id, test_user_id());
        assert_eq!(purchase.product_id, product.id);
        assert_eq!(purchase.product_name, "Widget");
        assert_eq!(purchase.seller_id, Some(seller_id));
        assert_eq!(purchase.quantity, 25);
        assert_eq!(purchase.total_cost.cents(), 10_000);
    }
}
