//! tideway-validator - declarative request validation middleware for Axum
//!
//! Declare, per route, which query parameters, headers, form fields, JSON
//! paths and path parameters must satisfy which rules. Requests that fail
//! are answered with `400 Bad Request` and a plain-text list of failure
//! messages before the handler runs.
//!
//! # Features
//!
//! - **Rules**: validator-backed built-ins (`is_email`, `is_length`, ...) and
//!   sanitizers (`trim`, `escape`, ...) in a [`RuleLibrary`] you can extend
//! - **Descriptors**: nested [`ruleset!`] lists of rules, arguments and
//!   custom messages, parsed once when the layer is built
//! - **Sources**: query, header, urlencoded/multipart body, JSON path, path parameter
//! - **Results**: a [`ResultSet`] stored in request extensions and
//!   available to handlers as an extractor
//! - **Testing**: Alba-style HTTP scenarios in [`testing`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use tideway_validator::{ValidationGroup, ruleset, validation};
//!
//! #[tokio::main]
//! async fn main() {
//!     tideway_validator::init_tracing();
//!
//!     let layer = validation(|v, message| {
//!         ValidationGroup::new()
//!             .query("q", ruleset![v.is_alpha(), [v.contains(), "abc"]])
//!             .header("x-api-key", ruleset![v.required(), message("API key required")])
//!     })
//!     .expect("valid rule declarations");
//!
//!     let app = Router::new()
//!         .route("/search", get(|| async { "Valid!" }))
//!         .layer(layer);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
mod error;
pub mod extract;
mod middleware;
pub mod rules;
pub mod testing;
pub mod utils;
pub mod validation;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LogLevel, LoggingConfig, ValidationConfig};
pub use error::{ErrorResponse, Result, ValidatorError};
pub use extract::{FieldExtractor, RequestFields, StaticFields};
pub use middleware::{
    OnResult, ValidationBuilder, ValidationLayer, ValidationService, validation,
};
pub use rules::{Rule, RuleLibrary, RuleOutcome};
pub use validation::{
    FieldError, FieldSource, Message, MessageFactory, ResultSet, RuleDescriptor, RuleInvocation,
    ValidationGroup, message,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "tideway_validator=debug")
/// - `TIDEWAY_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
