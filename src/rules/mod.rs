//! The rule library: named predicates and sanitizers run against field values.
//!
//! A [`Rule`] is a pure function `(value, extra args) -> RuleOutcome`. Returning
//! [`RuleOutcome::Sanitized`] both passes the rule and replaces the value seen by
//! every later rule on the same field.
//!
//! # Example
//!
//! ```rust
//! use tideway_validator::rules::{Rule, RuleLibrary, RuleOutcome};
//!
//! let mut library = RuleLibrary::new();
//! library.register(Rule::new("is_even_length", |value: &str, _args: &[serde_json::Value]| {
//!     value.chars().count() % 2 == 0
//! }));
//!
//! let rule = library.rule("is_even_length").unwrap();
//! assert_eq!(rule.call("ab", &[]), RuleOutcome::Pass);
//! assert_eq!(library.trim().call(" ab ", &[]), RuleOutcome::Sanitized("ab".to_string()));
//! ```

pub mod builtin;
pub mod formats;

use crate::error::{Result, ValidatorError};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Result of running a single rule against a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The value satisfies the rule
    Pass,
    /// The value violates the rule
    Fail,
    /// The rule passed and produced a replacement value
    Sanitized(String),
}

impl RuleOutcome {
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl From<bool> for RuleOutcome {
    fn from(ok: bool) -> Self {
        if ok { Self::Pass } else { Self::Fail }
    }
}

impl From<String> for RuleOutcome {
    fn from(value: String) -> Self {
        Self::Sanitized(value)
    }
}

/// Signature shared by every rule function
pub type RuleFn = dyn Fn(&str, &[Value]) -> RuleOutcome + Send + Sync;

/// A named, clonable rule handle
#[derive(Clone)]
pub struct Rule {
    name: Option<Cow<'static, str>>,
    min_args: usize,
    func: Arc<RuleFn>,
}

impl Rule {
    /// Create a rule with an identifying name.
    ///
    /// The closure may return `bool`, `String` (a sanitized value) or a
    /// [`RuleOutcome`]. An empty name makes the rule anonymous.
    pub fn new<F, O>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&str, &[Value]) -> O + Send + Sync + 'static,
        O: Into<RuleOutcome>,
    {
        let name = name.into();
        Self {
            name: if name.is_empty() { None } else { Some(name) },
            min_args: 0,
            func: Arc::new(move |value, args| func(value, args).into()),
        }
    }

    /// Create a rule without a derivable name.
    ///
    /// Failures of anonymous rules fall back to the group message.
    pub fn anonymous<F, O>(func: F) -> Self
    where
        F: Fn(&str, &[Value]) -> O + Send + Sync + 'static,
        O: Into<RuleOutcome>,
    {
        Self::new("", func)
    }

    /// Require at least `count` extra arguments when the rule is declared
    pub fn with_min_args(mut self, count: usize) -> Self {
        self.min_args = count;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    /// Run the rule against a value
    pub fn call(&self, value: &str, args: &[Value]) -> RuleOutcome {
        (self.func)(value, args)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .finish_non_exhaustive()
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.name().serialize(serializer)
    }
}

/// Name → rule mapping handed to validation builders
///
/// `RuleLibrary::new()` comes with every built-in registered. Registering a
/// rule under a built-in's name replaces it, including for the typed
/// accessors such as [`RuleLibrary::is_email`].
#[derive(Clone, Debug)]
pub struct RuleLibrary {
    rules: HashMap<String, Rule>,
}

impl RuleLibrary {
    /// Library with every built-in rule registered
    pub fn new() -> Self {
        let mut library = Self::empty();
        for rule in builtin::all() {
            library.register(rule);
        }
        library
    }

    /// Library with nothing registered
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule under its name. Anonymous rules are ignored.
    pub fn register(&mut self, rule: Rule) -> &mut Self {
        if let Some(name) = rule.name() {
            self.rules.insert(name.to_string(), rule);
        } else {
            tracing::warn!("Ignoring anonymous rule passed to RuleLibrary::register");
        }
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.register(rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<Rule> {
        self.rules.get(name).cloned()
    }

    /// Look up a rule by name, failing if it is not registered
    pub fn rule(&self, name: &str) -> Result<Rule> {
        self.get(name)
            .ok_or_else(|| ValidatorError::unknown_rule(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn resolve(&self, name: &str, fallback: fn() -> Rule) -> Rule {
        self.get(name).unwrap_or_else(fallback)
    }

    pub fn required(&self) -> Rule {
        self.resolve("required", builtin::required)
    }

    pub fn is_email(&self) -> Rule {
        self.resolve("is_email", builtin::is_email)
    }

    pub fn is_url(&self) -> Rule {
        self.resolve("is_url", builtin::is_url)
    }

    pub fn is_ip(&self) -> Rule {
        self.resolve("is_ip", builtin::is_ip)
    }

    pub fn is_alpha(&self) -> Rule {
        self.resolve("is_alpha", builtin::is_alpha)
    }

    pub fn is_alphanumeric(&self) -> Rule {
        self.resolve("is_alphanumeric", builtin::is_alphanumeric)
    }

    pub fn is_numeric(&self) -> Rule {
        self.resolve("is_numeric", builtin::is_numeric)
    }

    pub fn is_int(&self) -> Rule {
        self.resolve("is_int", builtin::is_int)
    }

    pub fn is_float(&self) -> Rule {
        self.resolve("is_float", builtin::is_float)
    }

    pub fn is_boolean(&self) -> Rule {
        self.resolve("is_boolean", builtin::is_boolean)
    }

    pub fn is_empty(&self) -> Rule {
        self.resolve("is_empty", builtin::is_empty)
    }

    pub fn is_length(&self) -> Rule {
        self.resolve("is_length", builtin::is_length)
    }

    pub fn contains(&self) -> Rule {
        self.resolve("contains", builtin::contains)
    }

    pub fn equals(&self) -> Rule {
        self.resolve("equals", builtin::equals)
    }

    pub fn is_in(&self) -> Rule {
        self.resolve("is_in", builtin::is_in)
    }

    pub fn is_uuid(&self) -> Rule {
        self.resolve("is_uuid", builtin::is_uuid)
    }

    pub fn is_slug(&self) -> Rule {
        self.resolve("is_slug", builtin::is_slug)
    }

    pub fn is_phone(&self) -> Rule {
        self.resolve("is_phone", builtin::is_phone)
    }

    pub fn is_json(&self) -> Rule {
        self.resolve("is_json", builtin::is_json)
    }

    pub fn is_duration(&self) -> Rule {
        self.resolve("is_duration", builtin::is_duration)
    }

    pub fn trim(&self) -> Rule {
        self.resolve("trim", builtin::trim)
    }

    pub fn ltrim(&self) -> Rule {
        self.resolve("ltrim", builtin::ltrim)
    }

    pub fn rtrim(&self) -> Rule {
        self.resolve("rtrim", builtin::rtrim)
    }

    pub fn to_lower_case(&self) -> Rule {
        self.resolve("to_lower_case", builtin::to_lower_case)
    }

    pub fn to_upper_case(&self) -> Rule {
        self.resolve("to_upper_case", builtin::to_upper_case)
    }

    pub fn escape(&self) -> Rule {
        self.resolve("escape", builtin::escape)
    }
}

impl Default for RuleLibrary {
    fn default() -> Self {
        Self::new()
    }
}
