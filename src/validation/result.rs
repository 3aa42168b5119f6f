use super::executor::FieldOutcome;
use super::group::FieldSource;
use super::parser::RuleInvocation;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A failed field: where it came from, the rule that failed and its message
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub source: FieldSource,
    pub field: String,
    pub invocation: RuleInvocation,
    pub message: String,
}

/// Aggregated outcome of validating a request
///
/// `messages` and `errors` line up one-to-one and follow the order fields
/// were evaluated in: group by group, then query, header, body, json and
/// path parameters in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    has_error: bool,
    messages: Vec<String>,
    errors: Vec<FieldError>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First error recorded for `field`, if any
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Fold one field's outcome into the set
    pub fn record(&mut self, source: FieldSource, field: &str, outcome: FieldOutcome) {
        if let Some(failure) = outcome.into_failure() {
            self.has_error = true;
            self.messages.push(failure.message.clone());
            self.errors.push(FieldError {
                source,
                field: field.to_string(),
                invocation: failure.invocation,
                message: failure.message,
            });
        }
    }

    /// Append another set's failures after this one's
    pub fn merge(&mut self, other: ResultSet) {
        self.has_error |= other.has_error;
        self.messages.extend(other.messages);
        self.errors.extend(other.errors);
    }

    /// Failure messages joined with newlines
    pub fn to_text(&self) -> String {
        self.messages.join("\n")
    }
}

impl IntoResponse for ResultSet {
    /// 400 with the joined messages as a plain-text body
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_text(),
        )
            .into_response()
    }
}
