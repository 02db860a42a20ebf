//! Benchmarks for schema inference and self-validation
//!
//! Run with: cargo bench --bench inference_bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsonschema_builder::inference::{SchemaInferrer, detect_format, merge_schemas};
use jsonschema_builder::validation::build_validation_tree;
use jsonschema_builder::{SchemaNode, SchemaType};
use serde_json::{Value, json};

/// Generate an array of sample records for benchmarking
fn generate_sample_records(count: usize) -> Value {
    let statuses = ["active", "inactive", "pending", "archived"];
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("user-{i}"),
                "email": format!("user{i}@example.com"),
                "name": format!("User {i}"),
                "age": 20 + (i % 60),
                "balance": 1000.0 + (i as f64 * 10.5),
                "is_active": i % 2 == 0,
                "status": statuses[i % statuses.len()],
                "created_at": "2024-01-15T10:30:00Z",
                "updatedAt": 1_700_000_000_000_i64 + i as i64,
                "coords": [52.5 + (i as f64 * 0.01), 13.4],
                "website": format!("https://user{i}.example.com")
            })
        })
        .collect();
    Value::Array(records)
}

/// Benchmark format detection for various string patterns
fn bench_format_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_detection");

    let test_cases = vec![
        ("email", "user@example.com"),
        ("uuid", "550e8400-e29b-41d4-a716-446655440000"),
        ("uri", "https://example.com/path"),
        ("date", "2024-01-15"),
        ("datetime", "2024-01-15T10:30:00Z"),
        ("plain_string", "hello world"),
    ];

    for (name, value) in test_cases {
        group.bench_with_input(BenchmarkId::new("detect", name), &value, |b, value| {
            b.iter(|| black_box(detect_format(value)));
        });
    }

    group.finish();
}

/// Benchmark schema inference over object arrays of varying length
///
/// Heuristic passes scan every element once per property, so this grows
/// with elements × properties.
fn bench_schema_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_inference");
    let inferrer = SchemaInferrer::new();

    for count in [10, 100, 1000].iter() {
        let records = generate_sample_records(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(
            BenchmarkId::new("create_schema", count),
            &records,
            |b, records| {
                b.iter(|| black_box(inferrer.create_schema(records)));
            },
        );
    }

    group.finish();
}

/// Benchmark building the self-validation tree of an inferred schema
fn bench_validation_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_tree");
    let sample = generate_sample_records(100);
    let schema = SchemaNode::Object(SchemaInferrer::new().create_schema(&sample));

    group.bench_function("build", |b| {
        b.iter(|| black_box(build_validation_tree(&schema)));
    });

    group.finish();
}

/// Benchmark schema merging
fn bench_schema_merging(c: &mut Criterion) {
    let mut group = c.benchmark_group("schema_merging");

    group.bench_function("merge_numbers", |b| {
        let integer = SchemaNode::typed(SchemaType::Integer);
        let number = SchemaNode::typed(SchemaType::Number);
        b.iter(|| black_box(merge_schemas(&integer, &number)));
    });

    group.bench_function("merge_one_of", |b| {
        let string = SchemaNode::typed(SchemaType::String);
        let boolean = SchemaNode::typed(SchemaType::Boolean);
        b.iter(|| black_box(merge_schemas(&string, &boolean)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_schema_inference,
    bench_validation_tree,
    bench_schema_merging
);
criterion_main!(benches);
