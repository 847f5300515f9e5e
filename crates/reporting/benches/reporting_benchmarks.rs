use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use wms_catalog::{Catalog, ComboDefinition, Product, SkuMapping};
use wms_core::{Msku, Platform, Sku};
use wms_ingest::SalesRecord;
use wms_mapping::SkuResolver;
use wms_reporting::{SalesSummary, StockReport};

const PRODUCTS: usize = 500;

fn build_catalog() -> Catalog {
    let products = (0..PRODUCTS)
        .map(|i| Product {
            msku: Msku::new(format!("MSKU-{i:04}")).unwrap(),
            description: format!("product {i}"),
            stock: 1_000,
            location: "WH1".to_string(),
        })
        .collect();
    let mappings = (0..PRODUCTS)
        .map(|i| SkuMapping {
            platform: None,
            sku: Sku::new(format!("SKU-{i:04}")).unwrap(),
            msku: Msku::new(format!("MSKU-{i:04}")).unwrap(),
        })
        .collect();
    let combos = (0..50)
        .map(|i| {
            let mut combo = ComboDefinition::new(Sku::new(format!("COMBO-{i:02}")).unwrap());
            combo.add_component(Msku::new(format!("MSKU-{:04}", i * 2)).unwrap(), 2);
            combo.add_component(Msku::new(format!("MSKU-{:04}", i * 2 + 1)).unwrap(), 1);
            combo
        })
        .collect();
    Catalog::from_parts(products, mappings, combos).unwrap()
}

fn build_records(resolver: &SkuResolver, rows: usize) -> Vec<SalesRecord> {
    (0..rows)
        .map(|i| {
            let raw = if i % 5 == 0 {
                format!("COMBO-{:02}", i % 50)
            } else {
                format!("SKU-{:04}", i % PRODUCTS)
            };
            let platform = Platform::ALL[i % 3];
            let resolution = resolver.resolve_detailed(platform, &raw, 2).unwrap();
            SalesRecord {
                file_name: "bench.csv".to_string(),
                row: i + 2,
                platform,
                raw_sku: raw,
                sku: resolution.sku,
                order_qty: 2,
                order_id: None,
                timestamp: None,
                kind: resolution.kind,
                lines: resolution.lines,
            }
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = SkuResolver::new(Arc::new(build_catalog()));
    let mut group = c.benchmark_group("resolve");

    group.bench_function("single_sku", |b| {
        b.iter(|| resolver.resolve(Platform::Amazon, black_box("SKU-0042"), black_box(3)))
    });
    group.bench_function("combo_sku", |b| {
        b.iter(|| resolver.resolve(Platform::Flipkart, black_box("COMBO-07"), black_box(3)))
    });
    group.bench_function("unmapped_sku", |b| {
        b.iter(|| resolver.resolve(Platform::Meesho, black_box("NOPE"), black_box(1)))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let catalog = build_catalog();
    let resolver = SkuResolver::new(Arc::new(catalog.clone()));
    let mut group = c.benchmark_group("aggregate");

    for rows in [100usize, 1_000, 10_000].iter() {
        let records = build_records(&resolver, *rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("summary_and_projection", rows), &records, |b, records| {
            b.iter(|| {
                let summary = SalesSummary::from_records(black_box(records));
                StockReport::project(&catalog, &summary)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_aggregate);
criterion_main!(benches);
