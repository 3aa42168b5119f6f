use super::descriptor::RuleDescriptor;
use crate::rules::Rule;
use serde::Serialize;
use serde_json::Value;

/// One rule call: the rule, its extra arguments and an optional custom message
#[derive(Debug, Clone, Serialize)]
pub struct RuleInvocation {
    rule: Rule,
    params: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl RuleInvocation {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            params: Vec::new(),
            message: None,
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn rule_name(&self) -> Option<&str> {
        self.rule.name()
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Why a descriptor could not be parsed, and where
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} (at {position})")]
pub struct DescriptorError {
    pub position: String,
    pub reason: String,
}

#[derive(Default)]
struct Accumulator {
    invocations: Vec<RuleInvocation>,
    declared_at: Vec<String>,
    path: Vec<usize>,
}

impl Accumulator {
    fn position(&self) -> String {
        if self.path.is_empty() {
            return "root".to_string();
        }
        self.path.iter().map(|i| format!("[{}]", i)).collect()
    }

    fn error(&self, reason: impl Into<String>) -> DescriptorError {
        DescriptorError {
            position: self.position(),
            reason: reason.into(),
        }
    }

    fn current(&mut self, what: &str) -> Result<&mut RuleInvocation, DescriptorError> {
        if self.invocations.is_empty() {
            return Err(self.error(format!("{} appears before any rule", what)));
        }
        let last = self.invocations.len() - 1;
        Ok(&mut self.invocations[last])
    }
}

/// Flatten a descriptor tree into invocations in traversal order.
///
/// A rule opens a new invocation. Arguments append to the open invocation and
/// a message sets its override. Arguments or messages before the first rule,
/// a second message for the same rule, and rules declared with fewer
/// arguments than they require are rejected.
pub fn parse(descriptor: &RuleDescriptor) -> Result<Vec<RuleInvocation>, DescriptorError> {
    let acc = walk(Accumulator::default(), descriptor)?;

    for (invocation, position) in acc.invocations.iter().zip(&acc.declared_at) {
        let required = invocation.rule.min_args();
        if invocation.params.len() < required {
            return Err(DescriptorError {
                position: position.clone(),
                reason: format!(
                    "rule {} takes at least {} argument(s), got {}",
                    invocation.rule_name().unwrap_or("<anonymous>"),
                    required,
                    invocation.params.len()
                ),
            });
        }
    }

    Ok(acc.invocations)
}

fn walk(mut acc: Accumulator, descriptor: &RuleDescriptor) -> Result<Accumulator, DescriptorError> {
    match descriptor {
        RuleDescriptor::Group(items) => {
            for (index, item) in items.iter().enumerate() {
                acc.path.push(index);
                acc = walk(acc, item)?;
                acc.path.pop();
            }
        }
        RuleDescriptor::Call(rule) => {
            let position = acc.position();
            acc.invocations.push(RuleInvocation::new(rule.clone()));
            acc.declared_at.push(position);
        }
        RuleDescriptor::Arg(value) => {
            acc.current("argument")?.params.push(value.clone());
        }
        RuleDescriptor::Msg(message) => {
            let position = acc.position();
            let current = acc.current("message")?;
            if current.message.is_some() {
                return Err(DescriptorError {
                    position,
                    reason: "rule already has a message".to_string(),
                });
            }
            current.message = Some(message.as_str().to_string());
        }
    }
    Ok(acc)
}
