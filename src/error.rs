use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::validation::FieldSource;

/// The main error type for tideway-validator
///
/// Validation failures are not errors: they are reported through
/// [`ResultSet`](crate::ResultSet). This type covers misconfigured rule
/// declarations (caught when a layer is built) and requests whose fields
/// could not be extracted at all.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("Malformed rule descriptor for {kind} \"{field}\" at {position}: {reason}")]
    MalformedDescriptor {
        kind: FieldSource,
        field: String,
        position: String,
        reason: String,
    },

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Field extraction failed: {0}")]
    Extraction(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Error body returned for extraction and configuration failures.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl ValidatorError {
    pub fn malformed(
        kind: FieldSource,
        field: impl Into<String>,
        position: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedDescriptor {
            kind,
            field: field.into(),
            position: position.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule(name.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MalformedDescriptor { .. }
            | Self::UnknownRule(_)
            | Self::Extraction(_)
            | Self::Config(_)
            | Self::Internal(_)
            | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a message that is safe to show to clients.
    ///
    /// Server errors (5xx) get a generic message; the details are only
    /// written to the server log (CWE-209).
    fn safe_message(&self) -> String {
        match self {
            Self::PayloadTooLarge(msg) => format!("Payload too large: {}", msg),
            Self::Extraction(_) => "Request could not be processed".to_string(),
            Self::MalformedDescriptor { .. }
            | Self::UnknownRule(_)
            | Self::Config(_)
            | Self::Internal(_)
            | Self::Anyhow(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ValidatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Request validation aborted"
        );

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias for tideway-validator
pub type Result<T> = std::result::Result<T, ValidatorError>;

impl From<serde_json::Error> for ValidatorError {
    fn from(err: serde_json::Error) -> Self {
        ValidatorError::Extraction(format!("JSON body could not be decoded: {}", err))
    }
}

impl From<axum::extract::multipart::MultipartError> for ValidatorError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ValidatorError::PayloadTooLarge(err.body_text());
        }
        ValidatorError::Extraction(format!("multipart body could not be decoded: {}", err))
    }
}
