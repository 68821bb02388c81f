use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{DateTime, Duration, Utc};

use stockroom_core::UserId;
use stockroom_products::{NewProduct, Product};
use stockroom_reporting::{DateRange, Granularity, pipeline, rollup};
use stockroom_sales::{NewSale, Sale};

fn bench_user() -> UserId {
    "00000000-0000-0000-0000-000000000001".parse().unwrap()
}

fn base_time() -> DateTime<Utc> {
    "2024-01-01T00:00:00Z".parse().unwrap()
}

/// One product, `n` sales spread over ~a year of days.
fn make_sales(n: usize) -> Vec<Sale> {
    let user = bench_user();
    let product = Product::create(
        user,
        NewProduct {
            name: "Widget".to_string(),
            price_cents: 995,
            stock: i64::MAX / 2,
            category: None,
            brand: None,
            seller_id: None,
        },
        base_time(),
    )
    .unwrap();

    (0..n)
        .map(|i| {
            let sold_at = base_time() + Duration::days((i % 365) as i64);
            Sale::record(
                user,
                &product,
                NewSale {
                    product_id: product.id,
                    quantity: (i % 7 + 1) as i64,
                    buyer_name: "Bench Buyer".to_string(),
                    buyer_phone: None,
                    sold_at: Some(sold_at),
                },
                sold_at,
            )
            .unwrap()
        })
        .collect()
}

fn bench_in_memory_rollup(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_memory_revenue_rollup");
    for &size in &[100usize, 1_000, 10_000] {
        let sales = make_sales(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("daily", size), &sales, |b, sales| {
            b.iter(|| {
                rollup::revenue_rollup(
                    black_box(sales),
                    Granularity::Daily,
                    DateRange::unbounded(),
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("monthly", size), &sales, |b, sales| {
            b.iter(|| {
                rollup::revenue_rollup(
                    black_box(sales),
                    Granularity::Monthly,
                    DateRange::unbounded(),
                )
            })
        });
    }
    group.finish();
}

fn bench_top_products(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_memory_top_products");
    for &size in &[1_000usize, 10_000] {
        let sales = make_sales(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &sales, |b, sales| {
            b.iter(|| rollup::top_products(black_box(sales), 10))
        });
    }
    group.finish();
}

fn bench_pipeline_construction(c: &mut Criterion) {
    let user = bench_user();
    let range = DateRange::between(base_time(), base_time() + Duration::days(365));
    c.bench_function("build_revenue_rollup_pipeline", |b| {
        b.iter(|| pipeline::revenue_rollup(black_box(user), Granularity::Weekly, black_box(range)))
    });
}

criterion_group!(
    benches,
    bench_in_memory_rollup,
    bench_top_products,
    bench_pipeline_construction
);
criterion_main!(benches);
