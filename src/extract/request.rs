use super::FieldExtractor;
use super::form::{self, FormKind};
use super::json::{self, JsonPath};
use crate::error::{Result, ValidatorError};
use crate::validation::{CompiledField, FieldSource};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, RawPathParams, Request},
    http::{header, request::Parts},
};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error as _;

enum BodyState {
    Pending(Body),
    Buffered(Bytes),
}

/// Lazily decoded view of a request's fields
///
/// Each source is decoded at most once, on first use, and cached. The body
/// is buffered (up to `max_body_size` bytes) only when a `body` or `json`
/// field is requested; [`RequestFields::into_request`] hands the same bytes
/// back for the downstream handler.
pub struct RequestFields {
    parts: Parts,
    body: BodyState,
    max_body_size: usize,
    query: Option<Vec<(String, String)>>,
    form: Option<HashMap<String, String>>,
    json: Option<Value>,
    params: Option<Vec<(String, String)>>,
}

impl RequestFields {
    pub fn new(request: Request, max_body_size: usize) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: BodyState::Pending(body),
            max_body_size,
            query: None,
            form: None,
            json: None,
            params: None,
        }
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Rebuild the request, with the buffered body if it was read
    pub fn into_request(self) -> Request {
        let body = match self.body {
            BodyState::Pending(body) => body,
            BodyState::Buffered(bytes) => Body::from(bytes),
        };
        Request::from_parts(self.parts, body)
    }

    async fn bytes(&mut self) -> Result<Bytes> {
        let body = match std::mem::replace(&mut self.body, BodyState::Buffered(Bytes::new())) {
            BodyState::Buffered(bytes) => {
                self.body = BodyState::Buffered(bytes.clone());
                return Ok(bytes);
            }
            BodyState::Pending(body) => body,
        };

        let declared = self
            .parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(length) = declared.filter(|length| *length > self.max_body_size) {
            return Err(ValidatorError::payload_too_large(format!(
                "body of {} bytes exceeds the {} byte limit",
                length, self.max_body_size
            )));
        }

        let limit = self.max_body_size;
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
            if e.source().is_some_and(|s| s.is::<LengthLimitError>()) {
                ValidatorError::payload_too_large(format!("body exceeds the {} byte limit", limit))
            } else {
                ValidatorError::extraction(format!("request body could not be read: {}", e))
            }
        })?;
        self.body = BodyState::Buffered(bytes.clone());
        Ok(bytes)
    }

    fn query_value(&mut self, key: &str) -> Result<Option<String>> {
        if self.query.is_none() {
            let pairs = match self.parts.uri.query() {
                Some(query) => serde_urlencoded::from_str(query).map_err(|e| {
                    ValidatorError::extraction(format!("query string could not be decoded: {}", e))
                })?,
                None => Vec::new(),
            };
            self.query = Some(pairs);
        }

        Ok(self
            .query
            .as_ref()
            .and_then(|pairs| pairs.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone()))
    }

    fn header_value(&self, key: &str) -> Option<String> {
        self.parts
            .headers
            .get(key)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn body_value(&mut self, key: &str) -> Result<Option<String>> {
        if self.form.is_none() {
            let fields = match FormKind::from_headers(&self.parts.headers) {
                FormKind::UrlEncoded => form::decode_urlencoded(&self.bytes().await?)?,
                FormKind::Multipart => {
                    let bytes = self.bytes().await?;
                    form::decode_multipart(
                        &self.parts.headers,
                        &self.parts.extensions,
                        bytes,
                        self.max_body_size,
                    )
                    .await?
                }
                FormKind::Unsupported => HashMap::new(),
            };
            self.form = Some(fields);
        }

        Ok(self.form.as_ref().and_then(|f| f.get(key).cloned()))
    }

    async fn json_value(&mut self, path: &JsonPath) -> Result<Option<String>> {
        if self.json.is_none() {
            let bytes = self.bytes().await?;
            self.json = Some(serde_json::from_slice(&bytes)?);
        }

        Ok(self
            .json
            .as_ref()
            .and_then(|document| path.first(document))
            .map(json::stringify))
    }

    async fn param_value(&mut self, key: &str) -> Result<Option<String>> {
        if self.params.is_none() {
            let params = RawPathParams::from_request_parts(&mut self.parts, &())
                .await
                .map_err(|rejection| ValidatorError::extraction(rejection.body_text()))?;
            self.params = Some(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        }

        Ok(self
            .params
            .as_ref()
            .and_then(|params| params.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v.clone()))
    }
}

#[async_trait]
impl FieldExtractor for RequestFields {
    async fn extract(&mut self, source: FieldSource, key: &str) -> Result<Option<String>> {
        match source {
            FieldSource::Query => self.query_value(key),
            FieldSource::Header => Ok(self.header_value(key)),
            FieldSource::Body => self.body_value(key).await,
            FieldSource::Json => {
                let path = JsonPath::parse(key).map_err(|reason| {
                    ValidatorError::config(format!("invalid JSON path \"{}\": {}", key, reason))
                })?;
                self.json_value(&path).await
            }
            FieldSource::Param => self.param_value(key).await,
        }
    }

    async fn extract_field(&mut self, field: &CompiledField) -> Result<Option<String>> {
        match &field.json_path {
            Some(path) => self.json_value(path).await,
            None => self.extract(field.source, &field.key).await,
        }
    }
}
