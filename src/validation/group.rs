use super::descriptor::RuleDescriptor;
use super::parser::{RuleInvocation, parse};
use crate::error::{Result, ValidatorError};
use crate::extract::json::JsonPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a field value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    Query,
    Header,
    Body,
    Json,
    Param,
}

impl FieldSource {
    /// Processing order within a validation group
    pub const ALL: [FieldSource; 5] = [
        FieldSource::Query,
        FieldSource::Header,
        FieldSource::Body,
        FieldSource::Json,
        FieldSource::Param,
    ];

    /// Human-readable kind used in failure messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Query => "query parameter",
            Self::Header => "request header",
            Self::Body => "request body",
            Self::Json => "JSON body",
            Self::Param => "path parameter",
        }
    }

    /// Default failure message for `field`, naming the failing rule when known
    pub fn message(&self, field: &str, rule: Option<&str>) -> String {
        match rule {
            Some(rule) => format!(
                "Invalid Value: the {} \"{}\" is invalid - {}",
                self.describe(),
                field,
                rule
            ),
            None => format!("Invalid Value: the {} \"{}\" is invalid", self.describe(), field),
        }
    }
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// One declared bundle of field rules
///
/// Fields keep their declaration order. Declaring the same key twice for a
/// source replaces the earlier rules in place.
///
/// # Example
///
/// ```rust
/// use tideway_validator::{RuleLibrary, ValidationGroup, message, ruleset};
///
/// let v = RuleLibrary::new();
/// let group = ValidationGroup::new()
///     .query("q", ruleset![v.is_alpha(), [v.contains(), "abc"]])
///     .header("x-api-key", ruleset![v.required(), message("API key required")])
///     .json("post.author.email", ruleset![v.trim(), v.is_email()]);
///
/// assert_eq!(group.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationGroup {
    fields: Vec<(FieldSource, String, RuleDescriptor)>,
    message: Option<String>,
}

impl ValidationGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare rules for a field of any source
    pub fn field(
        mut self,
        source: FieldSource,
        key: impl Into<String>,
        rules: impl Into<RuleDescriptor>,
    ) -> Self {
        let key = key.into();
        let rules = rules.into();
        match self
            .fields
            .iter_mut()
            .find(|(s, k, _)| *s == source && *k == key)
        {
            Some(existing) => existing.2 = rules,
            None => self.fields.push((source, key, rules)),
        }
        self
    }

    pub fn query(self, key: impl Into<String>, rules: impl Into<RuleDescriptor>) -> Self {
        self.field(FieldSource::Query, key, rules)
    }

    pub fn header(self, key: impl Into<String>, rules: impl Into<RuleDescriptor>) -> Self {
        self.field(FieldSource::Header, key, rules)
    }

    pub fn body(self, key: impl Into<String>, rules: impl Into<RuleDescriptor>) -> Self {
        self.field(FieldSource::Body, key, rules)
    }

    /// Declare rules for the value at a JSON path such as `post.author.email`
    pub fn json(self, path: impl Into<String>, rules: impl Into<RuleDescriptor>) -> Self {
        self.field(FieldSource::Json, path, rules)
    }

    /// Declare rules for a path parameter of the matched route
    pub fn param(self, key: impl Into<String>, rules: impl Into<RuleDescriptor>) -> Self {
        self.field(FieldSource::Param, key, rules)
    }

    /// Fallback message for failing rules that have no name
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse every field's descriptor, failing on the first malformed one
    pub fn compile(&self) -> Result<CompiledGroup> {
        let mut fields = Vec::with_capacity(self.fields.len());

        for source in FieldSource::ALL {
            for (_, key, descriptor) in self.fields.iter().filter(|(s, _, _)| *s == source) {
                let json_path = match source {
                    FieldSource::Json => Some(JsonPath::parse(key).map_err(|reason| {
                        ValidatorError::config(format!("invalid JSON path \"{}\": {}", key, reason))
                    })?),
                    _ => None,
                };

                let invocations = parse(descriptor).map_err(|err| {
                    ValidatorError::malformed(source, key.clone(), err.position, err.reason)
                })?;

                fields.push(CompiledField {
                    source,
                    key: key.clone(),
                    json_path,
                    invocations,
                });
            }
        }

        Ok(CompiledGroup {
            fields,
            message: self.message.clone(),
        })
    }
}

impl From<ValidationGroup> for Vec<ValidationGroup> {
    fn from(group: ValidationGroup) -> Self {
        vec![group]
    }
}

/// A field with its parsed invocation list
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub source: FieldSource,
    pub key: String,
    /// Parsed form of `key` for `json` fields
    pub json_path: Option<JsonPath>,
    pub invocations: Vec<RuleInvocation>,
}

/// A validation group ready to run, fields ordered query → header → body → json → param
#[derive(Debug, Clone)]
pub struct CompiledGroup {
    fields: Vec<CompiledField>,
    message: Option<String>,
}

impl CompiledGroup {
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether any declared field reads from `source`
    pub fn uses(&self, source: FieldSource) -> bool {
        self.fields.iter().any(|f| f.source == source)
    }
}
