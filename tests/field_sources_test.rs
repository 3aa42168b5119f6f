use axum::{
    Form, Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::collections::HashMap;
use tideway_validator::{
    ValidationBuilder, ValidationConfig, ValidationGroup, ValidatorError, ruleset, testing,
    validation,
};

#[tokio::test]
async fn test_urlencoded_body_field() {
    let layer = validation(|v, _| {
        ValidationGroup::new().body("email", ruleset![v.trim(), v.is_email()])
    })
    .unwrap();

    // The handler still sees the original, unsanitized body
    let app = Router::new()
        .route(
            "/signup",
            post(|Form(fields): Form<HashMap<String, String>>| async move {
                fields.get("email").cloned().unwrap_or_default()
            }),
        )
        .layer(layer);

    testing::post(app.clone(), "/signup")
        .form_body(&[("email", " ada@example.com ")])
        .execute()
        .await
        .assert_ok()
        .assert_body(" ada@example.com ")
        .await;

    testing::post(app, "/signup")
        .form_body(&[("email", "not-an-email")])
        .execute()
        .await
        .assert_bad_request()
        .assert_body("Invalid Value: the request body \"email\" is invalid - is_email")
        .await;
}

#[tokio::test]
async fn test_multipart_body_field() {
    let layer = validation(|v, _| {
        ValidationGroup::new().body("name", ruleset![v.required(), v.is_alphanumeric()])
    })
    .unwrap();
    let app = Router::new()
        .route("/upload", post(|| async { "stored" }))
        .layer(layer);

    testing::post(app.clone(), "/upload")
        .multipart_body(&[("name", "report2024")])
        .execute()
        .await
        .assert_ok();

    testing::post(app, "/upload")
        .multipart_body(&[("other", "x")])
        .execute()
        .await
        .assert_bad_request()
        .assert_body("Invalid Value: the request body \"name\" is invalid - required")
        .await;
}

#[tokio::test]
async fn test_large_multipart_field_within_body_limit() {
    let layer = validation(|v, _| {
        ValidationGroup::new().body("name", ruleset![v.required(), v.is_alpha()])
    })
    .unwrap();
    let app = Router::new()
        .route("/upload", post(|| async { "stored" }))
        .layer(layer);

    // Larger than axum's own 2 MB multipart default, smaller than the 10 MB body limit
    let name = "a".repeat(3 * 1024 * 1024);
    testing::post(app.clone(), "/upload")
        .multipart_body(&[("name", name.as_str())])
        .execute()
        .await
        .assert_ok();

    let name = format!("{}1", name);
    testing::post(app, "/upload")
        .multipart_body(&[("name", name.as_str())])
        .execute()
        .await
        .assert_bad_request()
        .assert_body("Invalid Value: the request body \"name\" is invalid - is_alpha")
        .await;
}

#[tokio::test]
async fn test_oversized_multipart_body_is_rejected() {
    let layer = ValidationBuilder::new()
        .config(ValidationConfig::builder().max_body_size(64).build())
        .groups(|v, _| ValidationGroup::new().body("name", v.required()))
        .build()
        .unwrap();
    let app = Router::new()
        .route("/upload", post(|| async { "stored" }))
        .layer(layer);

    testing::post(app, "/upload")
        .multipart_body(&[("name", "a".repeat(256).as_str())])
        .execute()
        .await
        .assert_payload_too_large();
}

#[tokio::test]
async fn test_body_field_with_other_content_type_is_absent() {
    let layer = validation(|v, _| ValidationGroup::new().body("email", v.required())).unwrap();
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(layer);

    testing::post(app, "/")
        .raw_json(r#"{"email": "ada@example.com"}"#)
        .execute()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn test_json_scalars_and_missing_paths() {
    let layer = validation(|v, _| {
        ValidationGroup::new()
            .json("user.age", ruleset![[v.is_int(), serde_json::json!({"min": 18})]])
            .json("user.tags[0]", v.is_alpha())
    })
    .unwrap();
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(layer);

    testing::post(app.clone(), "/")
        .raw_json(r#"{"user": {"age": 42, "tags": ["admin"]}}"#)
        .execute()
        .await
        .assert_ok();

    testing::post(app, "/")
        .raw_json(r#"{"user": {"age": 12}}"#)
        .execute()
        .await
        .assert_bad_request()
        .assert_body(
            "Invalid Value: the JSON body \"user.age\" is invalid - is_int\n\
             Invalid Value: the JSON body \"user.tags[0]\" is invalid - is_alpha",
        )
        .await;
}

#[tokio::test]
async fn test_object_wildcard_takes_first_member_in_document_order() {
    let layer = validation(|v, _| ValidationGroup::new().json("$.*", v.is_alpha())).unwrap();
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(layer);

    testing::post(app.clone(), "/")
        .raw_json(r#"{"b": "1x", "a": "ok"}"#)
        .execute()
        .await
        .assert_bad_request()
        .assert_body("Invalid Value: the JSON body \"$.*\" is invalid - is_alpha")
        .await;

    testing::post(app, "/")
        .raw_json(r#"{"b": "ok", "a": "1x"}"#)
        .execute()
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_invalid_json_is_server_error() {
    let layer = validation(|v, _| ValidationGroup::new().json("title", v.required())).unwrap();
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(layer);

    testing::post(app, "/")
        .raw_json("{not json")
        .execute()
        .await
        .assert_server_error()
        .assert_json()
        .assert_json_path("error", serde_json::json!("Request could not be processed"))
        .await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let layer = ValidationBuilder::new()
        .config(ValidationConfig::builder().max_body_size(32).build())
        .groups(|v, _| ValidationGroup::new().json("title", v.required()))
        .build()
        .unwrap();
    let app = Router::new()
        .route("/", post(|| async { "ok" }))
        .layer(layer);

    let title = "x".repeat(64);
    testing::post(app.clone(), "/")
        .raw_json(format!(r#"{{"title": "{}"}}"#, title))
        .header("content-length", "77")
        .execute()
        .await
        .assert_payload_too_large();

    testing::post(app, "/")
        .raw_json(r#"{"title": "short"}"#)
        .execute()
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_query_only_layer_never_reads_body() {
    let layer = ValidationBuilder::new()
        .config(ValidationConfig::builder().max_body_size(4).build())
        .groups(|v, _| ValidationGroup::new().query("q", v.required()))
        .build()
        .unwrap();
    let app = Router::new()
        .route("/", post(|body: String| async move { body }))
        .layer(layer);

    testing::post(app, "/?q=1")
        .text_body("a body longer than four bytes")
        .execute()
        .await
        .assert_ok()
        .assert_body("a body longer than four bytes")
        .await;
}

#[tokio::test]
async fn test_path_param_field() {
    let layer = validation(|v, _| ValidationGroup::new().param("id", v.is_uuid())).unwrap();
    let app = Router::new().route("/users/{id}", get(|| async { "found" }).route_layer(layer));

    testing::get(app.clone(), "/users/550e8400-e29b-41d4-a716-446655440000")
        .execute()
        .await
        .assert_ok();

    testing::get(app, "/users/42")
        .execute()
        .await
        .assert_bad_request()
        .assert_body("Invalid Value: the path parameter \"id\" is invalid - is_uuid")
        .await;
}

#[tokio::test]
async fn test_non_utf8_header_is_absent() {
    let layer = validation(|v, _| ValidationGroup::new().header("x-name", v.required())).unwrap();
    let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);

    let mut request = axum::http::Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert("x-name", HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap());

    use tower::ServiceExt;
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[test]
fn test_malformed_descriptor_fails_at_build() {
    let err = validation(|v, _| ValidationGroup::new().query("q", ruleset![5, v.is_int()]))
        .err()
        .unwrap();
    assert!(matches!(err, ValidatorError::MalformedDescriptor { .. }));
    assert_eq!(
        err.to_string(),
        "Malformed rule descriptor for query parameter \"q\" at [0]: argument appears before any rule"
    );
}

#[test]
fn test_missing_rule_argument_fails_at_build() {
    let err = validation(|v, _| ValidationGroup::new().header("x", v.equals()))
        .err()
        .unwrap();
    assert!(matches!(err, ValidatorError::MalformedDescriptor { .. }));
}
