//! Field extraction adapters
//!
//! A [`FieldExtractor`] turns `(source, key)` into the raw text that rules
//! see. [`RequestFields`] reads from an HTTP request; [`StaticFields`] is a
//! fixed table, handy for testing rule sets without a router.

pub mod form;
pub mod json;
mod request;

pub use request::RequestFields;

use crate::error::Result;
use crate::validation::{CompiledField, FieldSource};
use async_trait::async_trait;
use std::collections::HashMap;

/// Reads field values for validation.
///
/// `Ok(None)` means the field is absent. Errors abort validation of the
/// whole request.
#[async_trait]
pub trait FieldExtractor: Send {
    async fn extract(&mut self, source: FieldSource, key: &str) -> Result<Option<String>>;

    /// Extract a compiled field; extractors may use its pre-parsed parts
    async fn extract_field(&mut self, field: &CompiledField) -> Result<Option<String>> {
        self.extract(field.source, &field.key).await
    }
}

/// In-memory field table
#[derive(Debug, Clone, Default)]
pub struct StaticFields {
    values: HashMap<(FieldSource, String), String>,
    requested: Vec<(FieldSource, String)>,
}

impl StaticFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: FieldSource, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert((source, key.into()), value.into());
        self
    }

    /// Every `(source, key)` that was asked for, in order
    pub fn requested(&self) -> &[(FieldSource, String)] {
        &self.requested
    }
}

#[async_trait]
impl FieldExtractor for StaticFields {
    async fn extract(&mut self, source: FieldSource, key: &str) -> Result<Option<String>> {
        self.requested.push((source, key.to_string()));
        Ok(self.values.get(&(source, key.to_string())).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_fields() {
        let mut fields = StaticFields::new()
            .with(FieldSource::Query, "q", "abc")
            .with(FieldSource::Header, "q", "header");

        assert_eq!(fields.extract(FieldSource::Query, "q").await.unwrap().as_deref(), Some("abc"));
        assert_eq!(fields.extract(FieldSource::Body, "q").await.unwrap(), None);
        assert_eq!(fields.requested().len(), 2);
    }
}
