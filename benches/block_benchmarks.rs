//! Criterion benchmarks for block construction and data binding.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks cover type resolution, tree assembly, the set_data and
//! bind pipelines, collection resizing and view compilation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::sync::Arc;

use typed_blocks::core::{Block, BlockExtension, BlockFactory, BlockRegistry, Data, Options};
use typed_blocks::CoreExtension;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `object` block with `fields` alternating text and integer children
fn make_object(factory: &BlockFactory, fields: usize) -> Block {
    let mut builder = factory
        .create_named_builder("record", "object", Data::Null, Options::new())
        .unwrap();
    for i in 0..fields {
        let type_name = if i % 2 == 0 { "text" } else { "integer" };
        builder
            .add_child(&format!("f{i}"), type_name, Options::new())
            .unwrap();
    }
    let mut block = builder.get_block().unwrap();
    block.initialize().unwrap();
    block
}

fn model_data(fields: usize) -> Data {
    let map: serde_json::Map<String, Data> = (0..fields)
        .map(|i| {
            let value = if i % 2 == 0 { json!(format!("value {i}")) } else { json!(i) };
            (format!("f{i}"), value)
        })
        .collect();
    Data::Object(map)
}

fn submitted_data(fields: usize) -> Data {
    let map: serde_json::Map<String, Data> = (0..fields)
        .map(|i| (format!("f{i}"), json!(format!(" {} ", i * 3))))
        .collect();
    Data::Object(map)
}

// ---------------------------------------------------------------------------
// Registry Benchmarks
// ---------------------------------------------------------------------------

fn bench_resolve_cold(c: &mut Criterion) {
    c.bench_function("resolve_cold", |b| {
        b.iter(|| {
            let core = Arc::new(CoreExtension::new()) as Arc<dyn BlockExtension>;
            let registry = BlockRegistry::new(vec![core]);
            black_box(registry.resolve("collection").unwrap());
        });
    });
}

fn bench_resolve_cached(c: &mut Criterion) {
    let factory = BlockFactory::builder().build();
    factory.registry().resolve("date").unwrap();

    c.bench_function("resolve_cached", |b| {
        b.iter(|| black_box(factory.registry().resolve(black_box("date")).unwrap()));
    });
}

// ---------------------------------------------------------------------------
// Construction Benchmarks
// ---------------------------------------------------------------------------

fn bench_create_object(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_object");
    let factory = BlockFactory::builder().build();

    for fields in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(fields), &fields, |b, &n| {
            b.iter(|| black_box(make_object(&factory, n).child_count()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Data Pipeline Benchmarks
// ---------------------------------------------------------------------------

fn bench_set_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_data");
    let factory = BlockFactory::builder().build();

    for fields in [4, 16, 64] {
        let mut block = make_object(&factory, fields);
        let data = model_data(fields);
        group.bench_with_input(BenchmarkId::from_parameter(fields), &fields, |b, _| {
            b.iter(|| {
                block.set_data(data.clone()).unwrap();
                black_box(block.view_data().is_object())
            });
        });
    }
    group.finish();
}

fn bench_set_data_then_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_data_then_bind");
    let factory = BlockFactory::builder().build();

    for fields in [4, 16, 64] {
        let mut block = make_object(&factory, fields);
        let data = model_data(fields);
        let submitted = submitted_data(fields);
        group.bench_with_input(BenchmarkId::from_parameter(fields), &fields, |b, _| {
            b.iter(|| {
                block.set_data(data.clone()).unwrap();
                block.bind(submitted.clone()).unwrap();
                black_box(block.is_valid())
            });
        });
    }
    group.finish();
}

fn bench_collection_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_resize");
    let factory = BlockFactory::builder().build();

    for entries in [10, 100] {
        let small = json!((0..entries / 2).map(|i| format!("tag {i}")).collect::<Vec<_>>());
        let large = json!((0..entries).map(|i| format!("tag {i}")).collect::<Vec<_>>());
        let mut tags = factory
            .create_named("tags", "collection", Data::Null, Options::new())
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, _| {
            b.iter(|| {
                tags.set_data(large.clone()).unwrap();
                tags.set_data(small.clone()).unwrap();
                black_box(tags.child_count())
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// View Benchmarks
// ---------------------------------------------------------------------------

fn bench_view_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_compile");
    let factory = BlockFactory::builder().build();

    for fields in [4, 16, 64] {
        let mut block = make_object(&factory, fields);
        block.set_data(model_data(fields)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(fields), &fields, |b, _| {
            b.iter(|| black_box(block.create_view().len()));
        });
    }
    group.finish();
}

criterion_group!(registry_benches, bench_resolve_cold, bench_resolve_cached);

criterion_group!(construction_benches, bench_create_object);

criterion_group!(
    pipeline_benches,
    bench_set_data,
    bench_set_data_then_bind,
    bench_collection_resize,
);

criterion_group!(view_benches, bench_view_compile);

criterion_main!(
    registry_benches,
    construction_benches,
    pipeline_benches,
    view_benches,
);
