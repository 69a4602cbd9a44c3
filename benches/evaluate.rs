use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value as Json};
use warden::{parse, ConditionTree, Policy};

/// Build a filter with `n` field conditions and a matching record.
fn build_filter(n: usize) -> (Json, Json) {
    let mut filter = Map::new();
    let mut record = Map::new();
    for i in 0..n {
        let field = format!("f{i}");
        filter.insert(field.clone(), json!({"gte": 1}));
        record.insert(field, json!(10));
    }
    (Json::Object(filter), Json::Object(record))
}

/// Build a policy with `n` conditional allow rules and one deny.
fn build_policy(n: usize) -> Policy {
    let mut builder = Policy::builder();
    for i in 0..n {
        builder = builder.allow_when("read", "Article", json!({"id": i}));
    }
    builder.deny_when("read", "Article", json!({"archived": true})).build()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &n in &[5, 20, 50] {
        let (filter, _) = build_filter(n);
        group.bench_function(format!("{n}_conditions"), |b| {
            b.iter(|| parse(black_box(&filter)).unwrap());
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (filter, record) = build_filter(n);
        let tree = parse(&filter).unwrap();
        group.bench_function(format!("{n}_conditions"), |b| {
            b.iter(|| tree.evaluate(black_box(&record)).unwrap());
        });
    }

    let relation_tree = parse(&json!({
        "items": {"some": {"qty": {"gt": 3}}},
        "author": {"is": {"name": {"istartsWith": "k"}}},
    }))
    .unwrap();
    let relation_record = json!({
        "items": [{"qty": 1}, {"qty": 2}, {"qty": 5}],
        "author": {"name": "Kim"},
    });
    group.bench_function("relations", |b| {
        b.iter(|| relation_tree.evaluate(black_box(&relation_record)).unwrap());
    });

    group.finish();
}

fn bench_accessible_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("accessible_by");

    for &n in &[5, 20, 50] {
        let policy = build_policy(n);
        group.bench_function(format!("{n}_rules"), |b| {
            b.iter(|| {
                black_box(
                    policy
                        .accessible_by(black_box("read"), black_box("Article"))
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_tree_helpers(b: &mut Criterion) {
    let tree: ConditionTree = parse(&json!({
        "OR": [
            {"id": {"in": [1, 2, 3]}},
            {"title": {"contains": "x", "mode": "insensitive"}},
        ]
    }))
    .unwrap();

    b.bench_function("serialize_tree", |bench| {
        bench.iter(|| black_box(tree.to_filter()));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_evaluate,
    bench_accessible_by,
    bench_tree_helpers
);
criterion_main!(benches);
