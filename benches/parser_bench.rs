use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parsekit::{parse, JsonParser, StrSource};
use serde_json::Value;

// A sample "medium" document
const MEDIUM_JSON: &str = r#"
{
    "name": "Babbage",
    "age": 30,
    "admin": true,
    "friends": ["Ada", "Charles", "Grace"],
    "tasks": [
        { "id": 1, "title": "Parse JSON", "done": false },
        { "id": 2, "title": "Write docs", "done": true }
    ],
    "nested": {"key": [null, 1, 1.23e4]}
}
"#;

// The same document with comments, which serde_json cannot read
const COMMENTED_JSON: &str = r#"
# user record
{
    "name": "Babbage", // display name
    "age": 30,
    /* permissions */
    "admin": true,
    "friends": ["Ada", "Charles", "Grace"]
}
"#;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Document Parsing");

    group.bench_function("parsekit tree", |b| {
        let mut parser = JsonParser::new();
        b.iter(|| {
            let tree = parser
                .parse(&mut StrSource::new(black_box(MEDIUM_JSON)))
                .unwrap();
            black_box(tree);
        })
    });

    // The element stream skips building the tree
    group.bench_function("parsekit tokens", |b| {
        let mut parser = JsonParser::new();
        b.iter(|| {
            let mut source = StrSource::new(black_box(MEDIUM_JSON));
            let _ = parser.tokens(&mut source).count();
        })
    });

    group.bench_function("parsekit with comments", |b| {
        b.iter(|| {
            let _ = parse(black_box(COMMENTED_JSON)).unwrap();
        })
    });

    group.bench_function("serde_json::from_str", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(black_box(MEDIUM_JSON)).unwrap();
        })
    });

    group.finish();
}

fn bench_serializing(c: &mut Criterion) {
    let tree = parse(MEDIUM_JSON).unwrap();
    let serde_value: Value = serde_json::from_str(MEDIUM_JSON).unwrap();

    let mut group = c.benchmark_group("Document Serializing");

    group.bench_function("to_text", |b| {
        b.iter(|| {
            let _ = black_box(&tree).to_text();
        })
    });

    group.bench_function("to_pretty_text", |b| {
        b.iter(|| {
            let _ = black_box(&tree).to_pretty_text();
        })
    });

    group.bench_function("serde_json::to_string", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&serde_value)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_serializing);
criterion_main!(benches);
