//! Integration tests for the full service stack over the in-memory backend.
//!
//! Tests: Service → Store trait → MemoryStore
//!
//! Verifies:
//! - Two-step writes stay consistent (product+intake, sale+stock decrement)
//! - Stock can never go negative through the sale path
//! - Per-user isolation of every read and write
//! - Reporting rollups agree with the recorded documents

use chrono::{DateTime, Utc};

use stockroom_core::{DomainError, UserId};
use stockroom_products::{NewProduct, Product, ProductFilter, ProductId, ProductPatch};
use stockroom_reporting::{DateRange, Granularity};
use stockroom_sales::NewSale;
use stockroom_sellers::NewSeller;

use crate::memory::MemoryStore;
use crate::services::{
    ProductService, PurchaseService, ReportService, SaleService, SellerService,
};
use crate::store::StoreError;

fn test_user_id() -> UserId {
    "00000000-0000-0000-0000-000000000001".parse().unwrap()
}

fn other_user_id() -> UserId {
    "00000000-0000-0000-0000-000000000002".parse().unwrap()
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

struct Services {
    products: ProductService<MemoryStore>,
    sales: SaleService<MemoryStore>,
    sellers: SellerService<MemoryStore>,
    purchases: PurchaseService<MemoryStore>,
    reports: ReportService<MemoryStore>,
}

fn setup() -> Services {
    let store = MemoryStore::new();
    Services {
        products: ProductService::new(store.clone()),
        sales: SaleService::new(store.clone()),
        sellers: SellerService::new(store.clone()),
        purchases: PurchaseService::new(store.clone()),
        reports: ReportService::new(store),
    }
}

fn new_product(name: &str, price_cents: i64, stock: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price_cents,
        stock,
        category: Some("general".to_string()),
        brand: None,
        seller_id: None,
    }
}

fn new_sale(product: &Product, quantity: i64, sold_at: Option<&str>) -> NewSale {
    NewSale {
        product_id: product.id,
        quantity,
        buyer_name: "Ada".to_string(),
        buyer_phone: None,
        sold_at: sold_at.map(at),
    }
}

fn domain_err(err: &StoreError) -> &DomainError {
    err.as_domain().expect("expected a domain error")
}

#[tokio::test]
async fn create_product_records_opening_intake() {
    let svc = setup();
    let user = test_user_id();

    let product = svc
        .products
        .create(user, new_product("Widget", 1_250, 10))
        .await
        .unwrap();

    let purchases = svc
        .reports
        .spend_rollup(user, Granularity::Yearly, DateRange::unbounded())
        .await
        .unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].count, 1);
    assert_eq!(purchases[0].revenue.cents(), 12_500); // 10 units at 12.50

    assert_eq!(svc.products.count(user).await.unwrap(), 1);
    assert_eq!(product.stock, 10);
}

#[tokio::test]
async fn create_product_with_zero_stock_skips_intake() {
    let svc = setup();
    let user = test_user_id();

    svc.products
        .create(user, new_product("Widget", 1_250, 0))
        .await
        .unwrap();

    let spend = svc
        .reports
        .spend_rollup(user, Granularity::Yearly, DateRange::unbounded())
        .await
        .unwrap();
    assert!(spend.is_empty());
}

#[tokio::test]
async fn record_sale_decrements_stock_and_computes_total() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 500, 8))
        .await
        .unwrap();

    let sale = svc
        .sales
        .record(user, new_sale(&product, 3, None))
        .await
        .unwrap();
    assert_eq!(sale.total_price.cents(), 1_500);
    assert_eq!(sale.product_name, "Widget");

    let product = svc.products.get(user, product.id).await.unwrap();
    assert_eq!(product.stock, 5);
    assert_eq!(svc.sales.count(user).await.unwrap(), 1);
}

#[tokio::test]
async fn record_sale_rejects_oversell_and_leaves_state_untouched() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 500, 2))
        .await
        .unwrap();

    let err = svc
        .sales
        .record(user, new_sale(&product, 3, None))
        .await
        .unwrap_err();
    match domain_err(&err) {
        DomainError::InsufficientStock {
            requested,
            available,
        } => {
            assert_eq!(*requested, 3);
            assert_eq!(*available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    let product = svc.products.get(user, product.id).await.unwrap();
    assert_eq!(product.stock, 2);
    assert_eq!(svc.sales.count(user).await.unwrap(), 0);
}

#[tokio::test]
async fn record_sale_can_drain_stock_to_zero_but_not_below() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 500, 3))
        .await
        .unwrap();

    svc.sales
        .record(user, new_sale(&product, 3, None))
        .await
        .unwrap();
    let product = svc.products.get(user, product.id).await.unwrap();
    assert_eq!(product.stock, 0);

    let err = svc
        .sales
        .record(user, new_sale(&product, 1, None))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_err(&err),
        DomainError::InsufficientStock { .. }
    ));
}

#[tokio::test]
async fn record_sale_for_unknown_product_is_not_found() {
    let svc = setup();
    let user = test_user_id();

    let err = svc
        .sales
        .record(
            user,
            NewSale {
                product_id: ProductId::generate(),
                quantity: 1,
                buyer_name: "Ada".to_string(),
                buyer_phone: None,
                sold_at: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(domain_err(&err), DomainError::NotFound));
}

#[tokio::test]
async fn restock_increments_stock_and_audits_a_purchase() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 400, 0))
        .await
        .unwrap();

    let (product, purchase) = svc.products.restock(user, product.id, 25).await.unwrap();
    assert_eq!(product.stock, 25);
    assert_eq!(purchase.quantity, 25);
    assert_eq!(purchase.total_cost.cents(), 10_000);

    let spend = svc
        .reports
        .spend_rollup(user, Granularity::Yearly, DateRange::unbounded())
        .await
        .unwrap();
    assert_eq!(spend.len(), 1);
    assert_eq!(spend[0].count, 1);
}

#[tokio::test]
async fn purchase_audit_trail_lists_every_intake() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 200, 5))
        .await
        .unwrap();
    svc.products.restock(user, product.id, 7).await.unwrap();

    let trail = svc.purchases.list(user).await.unwrap();
    assert_eq!(trail.len(), 2);
    // Newest first: the restock precedes the opening intake in the listing.
    assert_eq!(trail[0].quantity, 7);
    assert_eq!(trail[1].quantity, 5);
    assert!(trail.iter().all(|p| p.product_id == product.id));

    assert_eq!(svc.purchases.count(user).await.unwrap(), 2);

    let fetched = svc.purchases.get(user, trail[0].id).await.unwrap();
    assert_eq!(fetched, trail[0]);

    let totals = svc.reports.spend_totals(user).await.unwrap();
    assert_eq!(totals.count, 2);
    assert_eq!(totals.total, 12 * 200);
}

#[tokio::test]
async fn restock_rejects_non_positive_units() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 400, 1))
        .await
        .unwrap();

    for units in [0, -4] {
        let err = svc.products.restock(user, product.id, units).await.unwrap_err();
        assert!(matches!(domain_err(&err), DomainError::Validation(_)));
    }
}

#[tokio::test]
async fn update_patches_fields_and_bumps_updated_at() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 400, 1))
        .await
        .unwrap();

    let updated = svc
        .products
        .update(
            user,
            product.id,
            ProductPatch {
                name: Some("Widget Mk2".to_string()),
                price_cents: Some(450),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Widget Mk2");
    assert_eq!(updated.price.cents(), 450);
    assert!(updated.updated_at >= updated.created_at);

    // Empty patch is a no-op read.
    let unchanged = svc
        .products
        .update(user, product.id, ProductPatch::default())
        .await
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
async fn list_products_applies_category_and_name_filter() {
    let svc = setup();
    let user = test_user_id();
    svc.products
        .create(user, new_product("Hammer", 400, 1))
        .await
        .unwrap();
    let mut other = new_product("Saw", 900, 1);
    other.category = Some("cutting".to_string());
    svc.products.create(user, other).await.unwrap();

    let all = svc
        .products
        .list(user, ProductFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let cutting = svc
        .products
        .list(
            user,
            ProductFilter {
                category: Some("cutting".to_string()),
                name_contains: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cutting.len(), 1);
    assert_eq!(cutting[0].name, "Saw");

    let by_name = svc
        .products
        .list(
            user,
            ProductFilter {
                category: None,
                name_contains: Some("ham".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Hammer");
}

#[tokio::test]
async fn deleting_a_sale_does_not_touch_stock() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 500, 5))
        .await
        .unwrap();
    let sale = svc
        .sales
        .record(user, new_sale(&product, 2, None))
        .await
        .unwrap();

    svc.sales.delete(user, sale.id).await.unwrap();
    assert_eq!(svc.sales.count(user).await.unwrap(), 0);
    let product = svc.products.get(user, product.id).await.unwrap();
    assert_eq!(product.stock, 3);
}

#[tokio::test]
async fn users_are_isolated() {
    let svc = setup();
    let alice = test_user_id();
    let bob = other_user_id();

    let product = svc
        .products
        .create(alice, new_product("Widget", 500, 5))
        .await
        .unwrap();
    svc.sellers
        .create(alice, NewSeller { name: "Acme".to_string() })
        .await
        .unwrap();

    assert!(svc
        .products
        .list(bob, ProductFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(svc.sellers.count(bob).await.unwrap(), 0);

    let err = svc.products.get(bob, product.id).await.unwrap_err();
    assert!(matches!(domain_err(&err), DomainError::NotFound));

    // Bob cannot sell Alice's product either.
    let err = svc
        .sales
        .record(bob, new_sale(&product, 1, None))
        .await
        .unwrap_err();
    assert!(matches!(domain_err(&err), DomainError::NotFound));
}

#[tokio::test]
async fn sellers_crud_round_trip() {
    let svc = setup();
    let user = test_user_id();

    let zeta = svc
        .sellers
        .create(user, NewSeller { name: "Zeta Parts".to_string() })
        .await
        .unwrap();
    svc.sellers
        .create(user, NewSeller { name: "Acme Supply".to_string() })
        .await
        .unwrap();

    let listed = svc.sellers.list(user).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Supply", "Zeta Parts"]);

    svc.sellers.delete(user, zeta.id).await.unwrap();
    assert_eq!(svc.sellers.count(user).await.unwrap(), 1);

    let err = svc.sellers.delete(user, zeta.id).await.unwrap_err();
    assert!(matches!(domain_err(&err), DomainError::NotFound));
}

#[tokio::test]
async fn revenue_rollup_buckets_recorded_sales() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 100, 100))
        .await
        .unwrap();

    svc.sales
        .record(user, new_sale(&product, 2, Some("2024-02-20T10:00:00Z")))
        .await
        .unwrap();
    svc.sales
        .record(user, new_sale(&product, 1, Some("2024-03-05T10:00:00Z")))
        .await
        .unwrap();
    svc.sales
        .record(user, new_sale(&product, 4, Some("2024-03-28T10:00:00Z")))
        .await
        .unwrap();

    let monthly = svc
        .reports
        .revenue_rollup(user, Granularity::Monthly, DateRange::unbounded())
        .await
        .unwrap();
    let rows: Vec<(&str, i64, i64)> = monthly
        .iter()
        .map(|b| (b.period.as_str(), b.revenue.cents(), b.count))
        .collect();
    assert_eq!(rows, vec![("2024-02", 200, 1), ("2024-03", 500, 2)]);

    let windowed = svc
        .reports
        .revenue_rollup(
            user,
            Granularity::Daily,
            DateRange::between(at("2024-03-01T00:00:00Z"), at("2024-04-01T00:00:00Z")),
        )
        .await
        .unwrap();
    assert_eq!(windowed.len(), 2);
    assert_eq!(windowed[0].period, "2024-03-05");
}

#[tokio::test]
async fn top_products_ranks_by_revenue() {
    let svc = setup();
    let user = test_user_id();
    let cheap = svc
        .products
        .create(user, new_product("Cheap", 10, 100))
        .await
        .unwrap();
    let dear = svc
        .products
        .create(user, new_product("Dear", 1_000, 100))
        .await
        .unwrap();

    svc.sales
        .record(user, new_sale(&cheap, 50, None))
        .await
        .unwrap();
    svc.sales
        .record(user, new_sale(&dear, 2, None))
        .await
        .unwrap();

    let rows = svc.reports.top_products(user, 10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].product_name, "Dear");
    assert_eq!(rows[0].revenue.cents(), 2_000);
    assert_eq!(rows[1].units, 50);

    let err = svc.reports.top_products(user, 0).await.unwrap_err();
    assert!(matches!(domain_err(&err), DomainError::Validation(_)));
}

#[tokio::test]
async fn dashboard_summary_reflects_all_collections() {
    let svc = setup();
    let user = test_user_id();
    let product = svc
        .products
        .create(user, new_product("Widget", 500, 10))
        .await
        .unwrap();
    svc.products
        .create(user, new_product("Gadget", 900, 4))
        .await
        .unwrap();
    svc.sellers
        .create(user, NewSeller { name: "Acme".to_string() })
        .await
        .unwrap();
    svc.sales
        .record(user, new_sale(&product, 2, None))
        .await
        .unwrap();

    let summary = svc.reports.dashboard_summary(user).await.unwrap();
    assert_eq!(summary.revenue_total.cents(), 1_000);
    assert_eq!(summary.sales_count, 1);
    assert_eq!(summary.products_count, 2);
    assert_eq!(summary.sellers_count, 1);
    // 10 - 2 sold + 4 on the second product.
    assert_eq!(summary.units_in_stock, 12);

    // The summary is per-user like everything else.
    let empty = svc.reports.dashboard_summary(other_user_id()).await.unwrap();
    assert_eq!(empty.sales_count, 0);
    assert_eq!(empty.units_in_stock, 0);
}
