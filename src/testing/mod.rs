//! Testing utilities for validated Axum routes
//!
//! Alba-style HTTP endpoint testing without running a server, with fluent
//! assertions for status codes and the plain-text failure bodies a
//! [`ValidationLayer`](crate::ValidationLayer) produces.

mod scenario;

pub use scenario::{Scenario, ScenarioAssert, get, post, put};
