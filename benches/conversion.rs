//! Run conversion benchmarks
//!
//! Measures loading a run document and converting it into a run entity as
//! the number of nested metrics, params and tags grows.
//!
//! Run with: cargo bench --bench conversion

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlflow_elasticsearchstore::document::from_source;
use mlflow_elasticsearchstore::entities::RunStatus;
use mlflow_elasticsearchstore::models::{
    ElasticLatestMetric, ElasticParam, ElasticRun, ElasticTag, ToMlflowEntity,
};

const SIZES: [usize; 3] = [10, 100, 1_000];

fn build_run(nested: usize) -> ElasticRun {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    ElasticRun::builder("run-bench", "0", RunStatus::Finished)
        .name("bench")
        .latest_metrics(
            (0..nested)
                .map(|i| ElasticLatestMetric::new(format!("m{i}"), i as f64, 10).with_timestamp(ts))
                .collect(),
        )
        .params(
            (0..nested)
                .map(|i| ElasticParam::new("run-bench", format!("p{i}"), i.to_string()))
                .collect(),
        )
        .tags(
            (0..nested)
                .map(|i| ElasticTag::new("run-bench", format!("t{i}"), "v"))
                .collect(),
        )
        .build()
}

/// Benchmark record -> entity conversion
fn bench_to_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_to_entity");

    for size in SIZES {
        let record = build_run(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &record, |b, record| {
            b.iter(|| black_box(record).to_mlflow_entity().unwrap());
        });
    }

    group.finish();
}

/// Benchmark `_source` JSON -> record -> entity
fn bench_from_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_from_source");

    for size in SIZES {
        let source = serde_json::to_value(build_run(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                let record: ElasticRun = from_source(black_box(source).clone()).unwrap();
                record.to_mlflow_entity().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_entity, bench_from_source);
criterion_main!(benches);
