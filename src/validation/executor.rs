use super::group::FieldSource;
use super::parser::RuleInvocation;
use crate::rules::RuleOutcome;

/// Identifies the field being validated when building failure messages
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub source: FieldSource,
    pub field: &'a str,
    /// Group-level message used for anonymous rules
    pub fallback: Option<&'a str>,
}

impl<'a> FieldContext<'a> {
    pub fn new(source: FieldSource, field: &'a str) -> Self {
        Self {
            source,
            field,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Option<&'a str>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Failure message for `invocation`.
    ///
    /// A custom message wins, then the derived message naming the rule. A
    /// rule with no name uses the group fallback, or the derived message
    /// without a rule suffix.
    pub fn message_for(&self, invocation: &RuleInvocation) -> String {
        if let Some(message) = invocation.message() {
            return message.to_string();
        }
        match (invocation.rule_name(), self.fallback) {
            (Some(name), _) => self.source.message(self.field, Some(name)),
            (None, Some(fallback)) => fallback.to_string(),
            (None, None) => self.source.message(self.field, None),
        }
    }
}

/// The first failing invocation of a field and its resolved message
#[derive(Debug, Clone)]
pub struct FieldFailure {
    pub invocation: RuleInvocation,
    pub message: String,
}

/// What happened when one field's invocations ran
#[derive(Debug, Clone)]
pub struct FieldOutcome {
    value: String,
    evaluated: Vec<RuleInvocation>,
    failure: Option<FieldFailure>,
}

impl FieldOutcome {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    /// The value after every sanitizer that ran
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Invocations that were called, in order
    pub fn evaluated(&self) -> &[RuleInvocation] {
        &self.evaluated
    }

    pub fn failure(&self) -> Option<&FieldFailure> {
        self.failure.as_ref()
    }

    pub fn into_failure(self) -> Option<FieldFailure> {
        self.failure
    }
}

/// Run `invocations` in order against one field value.
///
/// An absent value is treated as the empty string. A sanitizer's output
/// becomes the value for every later rule. Evaluation stops at the first
/// failing rule, so later rules for the field are never called.
pub fn execute(
    invocations: &[RuleInvocation],
    raw: Option<&str>,
    context: &FieldContext<'_>,
) -> FieldOutcome {
    let mut value = raw.unwrap_or_default().to_string();
    let mut evaluated = Vec::with_capacity(invocations.len());

    for invocation in invocations {
        evaluated.push(invocation.clone());
        match invocation.rule().call(&value, invocation.params()) {
            RuleOutcome::Pass => {}
            RuleOutcome::Sanitized(next) => value = next,
            RuleOutcome::Fail => {
                return FieldOutcome {
                    value,
                    evaluated,
                    failure: Some(FieldFailure {
                        invocation: invocation.clone(),
                        message: context.message_for(invocation),
                    }),
                };
            }
        }
    }

    FieldOutcome {
        value,
        evaluated,
        failure: None,
    }
}
