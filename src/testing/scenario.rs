//! Alba-style HTTP scenarios for exercising validation layers
//!
//! Requests are sent straight to the router with `oneshot`, no server needed.
//!
//! # Example
//!
//! ```rust
//! use axum::{Router, routing::get};
//! use tideway_validator::{ValidationGroup, ruleset, testing, validation};
//!
//! # tokio_test::block_on(async {
//! let layer = validation(|v, _| ValidationGroup::new().query("q", v.is_alpha())).unwrap();
//! let app = Router::new().route("/search", get(|| async { "Valid!" })).layer(layer);
//!
//! testing::get(app.clone(), "/search?q=abc")
//!     .execute()
//!     .await
//!     .assert_ok()
//!     .assert_body("Valid!")
//!     .await;
//!
//! testing::get(app, "/search?q=ab1")
//!     .execute()
//!     .await
//!     .assert_bad_request()
//!     .assert_body("Invalid Value: the query parameter \"q\" is invalid - is_alpha")
//!     .await;
//! # });
//! ```

use crate::extract::json::lookup;
use axum::{
    Router,
    body::Body,
    http::{HeaderName, Method, Request, StatusCode, header},
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

const MULTIPART_BOUNDARY: &str = "tideway-validator-boundary";

/// Test scenario builder
pub struct Scenario {
    app: Router,
    request: Request<Body>,
}

impl Scenario {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            request: Request::builder()
                .method(Method::GET)
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        *self.request.method_mut() = method;
        self
    }

    pub fn uri(mut self, uri: &str) -> Self {
        *self.request.uri_mut() = uri.parse().unwrap();
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.request.headers_mut().insert(
            HeaderName::from_bytes(key.as_bytes()).unwrap(),
            value.parse().unwrap(),
        );
        self
    }

    /// Append URL-encoded query parameters to the request URI
    pub fn with_query(mut self, params: &[(&str, &str)]) -> Self {
        let uri = self.request.uri().clone();
        let mut query_parts = vec![];

        if let Some(query) = uri.query() {
            query_parts.push(query.to_string());
        }

        for (key, value) in params {
            query_parts.push(format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)));
        }

        let path = uri.path();
        let new_uri = if query_parts.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query_parts.join("&"))
        };

        *self.request.uri_mut() = new_uri.parse().unwrap();
        self
    }

    /// Set JSON body from a serializable type
    pub fn json_body<T: Serialize>(self, body: &T) -> Self {
        self.raw_json(serde_json::to_string(body).unwrap())
    }

    /// Set a JSON content type with an arbitrary (possibly malformed) body
    pub fn raw_json(mut self, body: impl Into<String>) -> Self {
        *self.request.body_mut() = Body::from(body.into());
        self.request
            .headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        self
    }

    /// Set an `application/x-www-form-urlencoded` body
    pub fn form_body(mut self, fields: &[(&str, &str)]) -> Self {
        let body = serde_urlencoded::to_string(fields).unwrap();
        *self.request.body_mut() = Body::from(body);
        self.request.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self
    }

    /// Set a `multipart/form-data` body of text parts
    pub fn multipart_body(mut self, fields: &[(&str, &str)]) -> Self {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));

        *self.request.body_mut() = Body::from(body);
        self.request.headers_mut().insert(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
                .parse()
                .unwrap(),
        );
        self
    }

    /// Set plain text body
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        *self.request.body_mut() = Body::from(body.into());
        self
    }

    /// Execute the request and get an assertion builder
    pub async fn execute(self) -> ScenarioAssert {
        let response = self.app.oneshot(self.request).await.unwrap();
        ScenarioAssert { response }
    }
}

/// Assertion builder for test responses
pub struct ScenarioAssert {
    response: axum::response::Response,
}

impl ScenarioAssert {
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.response.status(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.response.status()
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_bad_request(self) -> Self {
        self.assert_status(StatusCode::BAD_REQUEST)
    }

    pub fn assert_payload_too_large(self) -> Self {
        self.assert_status(StatusCode::PAYLOAD_TOO_LARGE)
    }

    pub fn assert_server_error(self) -> Self {
        self.assert_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Assert a header exists with the given value
    pub fn assert_header(self, key: &str, expected: &str) -> Self {
        let value = self
            .response
            .headers()
            .get(key)
            .unwrap_or_else(|| panic!("Header '{}' not found", key))
            .to_str()
            .unwrap();
        assert_eq!(value, expected, "Header '{}' value mismatch", key);
        self
    }

    fn assert_content_type(self, expected: &str) -> Self {
        let content_type = self
            .response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("Content-Type header not found")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains(expected),
            "Expected {} content type, got: {}",
            expected,
            content_type
        );
        self
    }

    pub fn assert_json(self) -> Self {
        self.assert_content_type("application/json")
    }

    pub fn assert_text(self) -> Self {
        self.assert_content_type("text/plain")
    }

    pub async fn body_bytes(self) -> Vec<u8> {
        axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    pub async fn body_string(self) -> String {
        String::from_utf8(self.body_bytes().await).unwrap()
    }

    pub async fn json<T: for<'de> Deserialize<'de>>(self) -> T {
        let bytes = self.body_bytes().await;
        serde_json::from_slice(&bytes).expect("Failed to parse JSON response")
    }

    /// Assert the body equals `expected` exactly
    pub async fn assert_body(self, expected: &str) -> Self {
        let status = self.response.status();
        let body = self.body_string().await;
        assert_eq!(body, expected, "Response body mismatch");
        Self::rebuilt(status, body)
    }

    /// Assert the body contains the given text
    pub async fn assert_contains(self, text: &str) -> Self {
        let status = self.response.status();
        let body = self.body_string().await;
        assert!(
            body.contains(text),
            "Response body does not contain '{}'. Body: {}",
            text,
            body
        );
        Self::rebuilt(status, body)
    }

    /// Assert the JSON value at `path` (e.g. `errors[0].field`) equals `expected`
    ///
    /// Non-string values are compared by their JSON text.
    pub async fn assert_json_path(self, path: &str, expected: serde_json::Value) -> Self {
        let status = self.response.status();
        let body = self.body_string().await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        let actual = lookup(&json, path)
            .unwrap()
            .unwrap_or_else(|| panic!("Path '{}' not found in JSON", path));
        let expected = crate::extract::json::stringify(&expected);
        assert_eq!(actual, expected, "JSON path '{}' value mismatch", path);

        Self::rebuilt(status, body)
    }

    /// Get the underlying response for custom assertions
    pub fn response(self) -> axum::response::Response {
        self.response
    }

    fn rebuilt(status: StatusCode, body: String) -> Self {
        let mut response = axum::response::Response::new(Body::from(body));
        *response.status_mut() = status;
        Self { response }
    }
}

/// GET scenario
pub fn get(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::GET).uri(uri)
}

/// POST scenario
pub fn post(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::POST).uri(uri)
}

/// PUT scenario
pub fn put(app: Router, uri: &str) -> Scenario {
    Scenario::new(app).method(Method::PUT).uri(uri)
}
