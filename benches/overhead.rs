use axum::http::Request;
use axum::{Router, routing::get};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tideway_validator::extract::StaticFields;
use tideway_validator::validation::{FieldSource, evaluate};
use tideway_validator::{RuleLibrary, ValidationGroup, ruleset, validation};
use tower::ServiceExt;

// Raw Axum route, no validation
fn raw_axum_search() -> Router {
    Router::new().route("/search", get(|| async { "Valid!" }))
}

// Same route behind a validation layer
fn validated_search() -> Router {
    let layer = validation(|v, message| {
        ValidationGroup::new()
            .query("q", ruleset![v.trim(), v.is_alpha(), [v.contains(), "abc"]])
            .query("page", ruleset![[v.is_int(), serde_json::json!({"min": 1})]])
            .header("x-api-key", ruleset![v.required(), message("API key required")])
    })
    .unwrap();

    Router::new()
        .route("/search", get(|| async { "Valid!" }))
        .layer(layer)
}

async fn make_request(router: &Router, path: &str) {
    let req = Request::builder()
        .uri(path)
        .header("x-api-key", "secret")
        .body(axum::body::Body::empty())
        .unwrap();

    let _response = router.clone().oneshot(req).await.unwrap();
}

fn benchmark_request_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_overhead");

    let raw_router = raw_axum_search();
    let validated_router = validated_search();

    let rt = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("raw_axum", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&raw_router), "/search?q=abcdef&page=2"));
        });
    });

    group.bench_function("validated_pass", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&validated_router), "/search?q=abcdef&page=2"));
        });
    });

    group.bench_function("validated_fail", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&validated_router), "/search?q=123&page=0"));
        });
    });

    group.finish();
}

fn benchmark_evaluate(c: &mut Criterion) {
    let v = RuleLibrary::new();
    let groups = vec![
        ValidationGroup::new()
            .query("q", ruleset![v.trim(), v.is_alpha(), [v.contains(), "abc"]])
            .json("post.author.email", ruleset![v.trim(), v.to_lower_case(), v.is_email()])
            .compile()
            .unwrap(),
    ];
    let fields = StaticFields::new()
        .with(FieldSource::Query, "q", "  abcdef ")
        .with(FieldSource::Json, "post.author.email", "Ada@Example.com");

    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("evaluate_static_fields", |b| {
        b.iter(|| {
            let mut fields = fields.clone();
            rt.block_on(async {
                black_box(evaluate(black_box(&groups), &mut fields).await.unwrap());
            });
        });
    });
}

criterion_group!(benches, benchmark_request_overhead, benchmark_evaluate);
criterion_main!(benches);
