use crate::rules::Rule;
use serde_json::Value;

/// A user-supplied message that replaces the derived failure message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String);

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Wrap text as a custom failure message
pub fn message(text: impl Into<String>) -> Message {
    Message::new(text)
}

/// Message constructor handed to group builder closures
pub type MessageFactory = fn(&str) -> Message;

pub(crate) fn message_factory(text: &str) -> Message {
    Message::new(text)
}

/// Nested, heterogeneous rule declaration for a single field
///
/// A rule starts an invocation; arguments and a message that follow attach to
/// the most recent rule. Nesting is only grouping, so `[a, [b, 1]]` and
/// `[a, b, 1]` describe the same invocations.
#[derive(Debug, Clone)]
pub enum RuleDescriptor {
    Call(Rule),
    Arg(Value),
    Msg(Message),
    Group(Vec<RuleDescriptor>),
}

impl RuleDescriptor {
    pub fn group(items: impl IntoIterator<Item = impl Into<RuleDescriptor>>) -> Self {
        Self::Group(items.into_iter().map(Into::into).collect())
    }

    /// Number of rule invocations declared anywhere in the tree
    pub fn rule_count(&self) -> usize {
        match self {
            Self::Call(_) => 1,
            Self::Arg(_) | Self::Msg(_) => 0,
            Self::Group(items) => items.iter().map(Self::rule_count).sum(),
        }
    }
}

impl From<Rule> for RuleDescriptor {
    fn from(rule: Rule) -> Self {
        Self::Call(rule)
    }
}

impl From<Message> for RuleDescriptor {
    fn from(message: Message) -> Self {
        Self::Msg(message)
    }
}

impl From<Value> for RuleDescriptor {
    fn from(value: Value) -> Self {
        Self::Arg(value)
    }
}

impl From<Vec<RuleDescriptor>> for RuleDescriptor {
    fn from(items: Vec<RuleDescriptor>) -> Self {
        Self::Group(items)
    }
}

impl From<&str> for RuleDescriptor {
    fn from(value: &str) -> Self {
        Self::Arg(Value::from(value))
    }
}

impl From<String> for RuleDescriptor {
    fn from(value: String) -> Self {
        Self::Arg(Value::from(value))
    }
}

macro_rules! impl_arg_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RuleDescriptor {
                fn from(value: $ty) -> Self {
                    Self::Arg(Value::from(value))
                }
            }
        )*
    };
}

impl_arg_from!(bool, i32, i64, u32, u64, usize, f64);

/// Build a [`RuleDescriptor`] from a bracketed list.
///
/// Items are rules, messages or argument values. A nested `[...]` becomes a
/// nested group.
///
/// ```rust
/// use tideway_validator::{RuleLibrary, message, ruleset};
///
/// let v = RuleLibrary::new();
/// let rules = ruleset![
///     v.trim(),
///     [v.is_length(), 1, 16],
///     [v.contains(), "abc", message("must mention abc")],
/// ];
/// assert_eq!(rules.rule_count(), 3);
/// ```
#[macro_export]
macro_rules! ruleset {
    (@acc [$($out:expr),*]) => {
        $crate::validation::RuleDescriptor::Group(::std::vec![$($out),*])
    };
    (@acc [$($out:expr),*] [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $crate::ruleset!(@acc [$($out,)* $crate::ruleset!($($inner)*)] $($($rest)*)?)
    };
    (@acc [$($out:expr),*] $item:expr $(, $($rest:tt)*)?) => {
        $crate::ruleset!(
            @acc [$($out,)* $crate::validation::RuleDescriptor::from($item)] $($($rest)*)?
        )
    };
    ($($items:tt)*) => {
        $crate::ruleset!(@acc [] $($items)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleLibrary;
    use serde_json::json;

    #[test]
    fn test_macro_builds_nested_groups() {
        let v = RuleLibrary::new();
        let rules = crate::ruleset![v.is_alpha(), [v.contains(), "abc"], 5, true];

        let RuleDescriptor::Group(items) = rules else {
            panic!("expected a group");
        };
        assert_eq!(items.len(), 4);
        assert!(matches!(&items[0], RuleDescriptor::Call(r) if r.name() == Some("is_alpha")));
        assert!(matches!(&items[1], RuleDescriptor::Group(inner) if inner.len() == 2));
        assert!(matches!(&items[2], RuleDescriptor::Arg(v) if *v == json!(5)));
        assert!(matches!(&items[3], RuleDescriptor::Arg(Value::Bool(true))));
    }

    #[test]
    fn test_macro_accepts_trailing_comma_and_empty() {
        let v = RuleLibrary::new();
        let rules = crate::ruleset![v.required(),];
        assert_eq!(rules.rule_count(), 1);

        let empty = crate::ruleset![];
        assert_eq!(empty.rule_count(), 0);
    }

    #[test]
    fn test_messages_convert() {
        let descriptor: RuleDescriptor = message("nope").into();
        assert!(matches!(descriptor, RuleDescriptor::Msg(m) if m.as_str() == "nope"));
        assert_eq!(message_factory("x"), Message::new("x"));
    }

    #[test]
    fn test_group_from_iterator() {
        let v = RuleLibrary::new();
        let rules = RuleDescriptor::group(vec![v.trim(), v.is_email()]);
        assert_eq!(rules.rule_count(), 2);
    }
}
