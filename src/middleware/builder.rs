use super::layer::{OnResult, Validation, ValidationLayer};
use crate::config::ValidationConfig;
use crate::error::Result;
use crate::rules::RuleLibrary;
use crate::validation::{MessageFactory, ResultSet, ValidationGroup, message_factory};
use axum::{extract::Request, response::Response};
use std::sync::Arc;

/// Builder for [`ValidationLayer`]
///
/// # Example
///
/// ```rust
/// use axum::{Router, routing::get};
/// use tideway_validator::{ValidationBuilder, ValidationGroup, ruleset};
///
/// let layer = ValidationBuilder::new()
///     .groups(|v, message| {
///         ValidationGroup::new()
///             .query("q", ruleset![v.is_alpha(), [v.contains(), "abc"]])
///             .header("x-api-key", ruleset![v.required(), message("API key required")])
///     })
///     .build()
///     .unwrap();
///
/// let app: Router = Router::new()
///     .route("/search", get(|| async { "ok" }))
///     .layer(layer);
/// ```
#[must_use = "builder does nothing until you call build()"]
pub struct ValidationBuilder {
    library: RuleLibrary,
    config: ValidationConfig,
    groups: Vec<ValidationGroup>,
    on_result: Option<OnResult>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self {
            library: RuleLibrary::new(),
            config: ValidationConfig::default(),
            groups: Vec::new(),
            on_result: None,
        }
    }

    /// Rule library handed to [`groups`](Self::groups) closures
    pub fn library(mut self, library: RuleLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare groups using the rule library and message constructor.
    ///
    /// The closure may return one group or several. Calling this more than
    /// once appends.
    pub fn groups<F, G>(mut self, declare: F) -> Self
    where
        F: FnOnce(&RuleLibrary, MessageFactory) -> G,
        G: Into<Vec<ValidationGroup>>,
    {
        let groups = declare(&self.library, message_factory).into();
        self.groups.extend(groups);
        self
    }

    pub fn group(mut self, group: ValidationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Run `hook` after every evaluation, before the 400 check.
    ///
    /// The [`ResultSet`] is already stored in the request extensions. If the
    /// hook returns a response it is sent as-is and the handler is skipped.
    pub fn on_result<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResultSet, &Request) -> Option<Response> + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(hook));
        self
    }

    /// Compile every group into a layer
    ///
    /// # Errors
    ///
    /// Fails with [`ValidatorError::MalformedDescriptor`](crate::ValidatorError::MalformedDescriptor)
    /// for a descriptor that cannot be parsed, or
    /// [`ValidatorError::Config`](crate::ValidatorError::Config) for an invalid
    /// JSON path or a zero body size limit.
    pub fn build(self) -> Result<ValidationLayer> {
        if self.config.max_body_size == 0 {
            return Err(crate::error::ValidatorError::config(
                "Maximum body size must be greater than 0",
            ));
        }

        let groups = self
            .groups
            .iter()
            .map(ValidationGroup::compile)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            groups = groups.len(),
            fields = groups.iter().map(|g| g.fields().len()).sum::<usize>(),
            "Validation layer built"
        );

        Ok(ValidationLayer::new(Validation {
            groups,
            config: self.config,
            on_result: self.on_result,
        }))
    }
}

impl Default for ValidationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a validation layer from a group declaration with default settings
///
/// ```rust
/// use tideway_validator::{ValidationGroup, ruleset, validation};
///
/// let layer = validation(|v, message| {
///     ValidationGroup::new().body("email", ruleset![v.trim(), v.is_email(), message("Bad email")])
/// })
/// .unwrap();
/// assert_eq!(layer.group_count(), 1);
/// ```
pub fn validation<F, G>(declare: F) -> Result<ValidationLayer>
where
    F: FnOnce(&RuleLibrary, MessageFactory) -> G,
    G: Into<Vec<ValidationGroup>>,
{
    ValidationBuilder::new().groups(declare).build()
}
