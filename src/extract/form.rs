//! Form-style body decoding for `body` fields

use crate::error::{Result, ValidatorError};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request},
    http::{Extensions, HeaderMap, header},
};
use bytes::Bytes;
use std::collections::HashMap;
use tower::{Layer, ServiceExt, service_fn};

/// Body encodings that `body` fields can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    UrlEncoded,
    Multipart,
    /// Anything else; every body field reads as absent
    Unsupported,
}

impl FormKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            Self::UrlEncoded
        } else if content_type.starts_with("multipart/form-data") {
            Self::Multipart
        } else {
            Self::Unsupported
        }
    }
}

/// Decode `application/x-www-form-urlencoded` pairs. A repeated key keeps its last value.
pub fn decode_urlencoded(bytes: &[u8]) -> Result<HashMap<String, String>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes).map_err(|e| {
        ValidatorError::extraction(format!("form body could not be decoded: {}", e))
    })?;
    Ok(pairs.into_iter().collect())
}

/// Decode the text parts of a `multipart/form-data` body.
///
/// File parts are skipped. A repeated name keeps its last value. The
/// request's extensions are carried over, but the body limit is always
/// `limit`, replacing axum's multipart default.
pub async fn decode_multipart(
    headers: &HeaderMap,
    extensions: &Extensions,
    bytes: Bytes,
    limit: usize,
) -> Result<HashMap<String, String>> {
    let mut request = Request::new(Body::from(bytes));
    *request.headers_mut() = headers.clone();
    *request.extensions_mut() = extensions.clone();

    DefaultBodyLimit::max(limit)
        .layer(service_fn(read_text_fields))
        .oneshot(request)
        .await
}

async fn read_text_fields(request: Request) -> Result<HashMap<String, String>> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| ValidatorError::extraction(rejection.body_text()))?;

    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let text = field.text().await?;
        fields.insert(name, text);
    }

    Ok(fields)
}
