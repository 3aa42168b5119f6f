//! Built-in predicates and sanitizers
//!
//! Predicates return [`RuleOutcome::Pass`]/[`RuleOutcome::Fail`]; sanitizers
//! always pass and return the transformed value. Extra arguments arrive as
//! JSON values, so `is_length` accepts either `[min, max]` positionally or a
//! `{"min": .., "max": ..}` record.

use super::{Rule, RuleOutcome, formats};
use serde_json::Value;
use validator::{ValidateContains, ValidateEmail, ValidateIp, ValidateLength, ValidateUrl};

/// Every built-in rule, in registration order
pub fn all() -> Vec<Rule> {
    vec![
        required(),
        is_email(),
        is_url(),
        is_ip(),
        is_alpha(),
        is_alphanumeric(),
        is_numeric(),
        is_int(),
        is_float(),
        is_boolean(),
        is_empty(),
        is_length(),
        contains(),
        equals(),
        is_in(),
        is_uuid(),
        is_slug(),
        is_phone(),
        is_json(),
        is_duration(),
        trim(),
        ltrim(),
        rtrim(),
        to_lower_case(),
        to_upper_case(),
        escape(),
    ]
}

/// Argument at `index` rendered as a string. Null counts as missing.
fn arg_string(args: &[Value], index: usize) -> Option<String> {
    match args.get(index)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| value.as_str()?.parse().ok())
}

fn as_i64(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_str()?.parse().ok())
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

pub fn required() -> Rule {
    Rule::new("required", |value: &str, _: &[Value]| !value.is_empty())
}

pub fn is_email() -> Rule {
    Rule::new("is_email", |value: &str, _: &[Value]| value.validate_email())
}

pub fn is_url() -> Rule {
    Rule::new("is_url", |value: &str, _: &[Value]| value.validate_url())
}

/// `is_ip` or `[is_ip, 4]` / `[is_ip, 6]` to pin the version
pub fn is_ip() -> Rule {
    Rule::new("is_ip", |value: &str, args: &[Value]| {
        match args.first().and_then(as_u64) {
            Some(4) => value.validate_ipv4(),
            Some(6) => value.validate_ipv6(),
            _ => value.validate_ip(),
        }
    })
}

pub fn is_alpha() -> Rule {
    Rule::new("is_alpha", |value: &str, _: &[Value]| {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
    })
}

pub fn is_alphanumeric() -> Rule {
    Rule::new("is_alphanumeric", |value: &str, _: &[Value]| {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Optional sign, optional integer part, optional fraction; at least one digit
pub fn is_numeric() -> Rule {
    Rule::new("is_numeric", |value: &str, _: &[Value]| {
        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        match unsigned.split_once('.') {
            Some((int, frac)) => is_digits(int) && !frac.is_empty() && is_digits(frac),
            None => !unsigned.is_empty() && is_digits(unsigned),
        }
    })
}

/// Integer, optionally bounded by a `{"min": .., "max": ..}` record
pub fn is_int() -> Rule {
    Rule::new("is_int", |value: &str, args: &[Value]| {
        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        if unsigned.is_empty() || !is_digits(unsigned) {
            return false;
        }
        let Some(Value::Object(bounds)) = args.first() else {
            return true;
        };
        let Ok(number) = value.parse::<i64>() else {
            return false;
        };
        let above_min = bounds.get("min").and_then(as_i64).is_none_or(|min| number >= min);
        let below_max = bounds.get("max").and_then(as_i64).is_none_or(|max| number <= max);
        above_min && below_max
    })
}

pub fn is_float() -> Rule {
    Rule::new("is_float", |value: &str, _: &[Value]| {
        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
            None => (unsigned, None),
        };
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let exponent_ok = exponent.is_none_or(|exp| {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && is_digits(digits)
        });
        !(int.is_empty() && frac.is_empty()) && is_digits(int) && is_digits(frac) && exponent_ok
    })
}

pub fn is_boolean() -> Rule {
    Rule::new("is_boolean", |value: &str, _: &[Value]| {
        matches!(value, "true" | "false" | "1" | "0")
    })
}

pub fn is_empty() -> Rule {
    Rule::new("is_empty", |value: &str, _: &[Value]| value.is_empty())
}

/// Character count within `[min, max]`; `max` may be omitted
pub fn is_length() -> Rule {
    Rule::new("is_length", |value: &str, args: &[Value]| {
        let (min, max) = match args.first() {
            Some(Value::Object(options)) => (
                options.get("min").and_then(as_u64).unwrap_or(0),
                options.get("max").and_then(as_u64),
            ),
            Some(min) => (as_u64(min).unwrap_or(0), args.get(1).and_then(as_u64)),
            None => (0, None),
        };
        value.validate_length(Some(min), max, None)
    })
}

pub fn contains() -> Rule {
    Rule::new("contains", |value: &str, args: &[Value]| {
        arg_string(args, 0).is_some_and(|seed| value.validate_contains(&seed))
    })
    .with_min_args(1)
}

pub fn equals() -> Rule {
    Rule::new("equals", |value: &str, args: &[Value]| {
        arg_string(args, 0).is_some_and(|other| value == other)
    })
    .with_min_args(1)
}

/// `[is_in, ["a", "b"]]` or `[is_in, "a", "b"]`
pub fn is_in() -> Rule {
    Rule::new("is_in", |value: &str, args: &[Value]| {
        let candidates = match args.first() {
            Some(Value::Array(items)) => items.as_slice(),
            _ => args,
        };
        (0..candidates.len()).any(|i| arg_string(candidates, i).as_deref() == Some(value))
    })
    .with_min_args(1)
}

pub fn is_uuid() -> Rule {
    Rule::new("is_uuid", |value: &str, _: &[Value]| formats::is_uuid(value))
}

pub fn is_slug() -> Rule {
    Rule::new("is_slug", |value: &str, _: &[Value]| formats::is_slug(value))
}

pub fn is_phone() -> Rule {
    Rule::new("is_phone", |value: &str, _: &[Value]| formats::is_phone(value))
}

pub fn is_json() -> Rule {
    Rule::new("is_json", |value: &str, _: &[Value]| formats::is_json(value))
}

pub fn is_duration() -> Rule {
    Rule::new("is_duration", |value: &str, _: &[Value]| formats::is_duration(value))
}

/// Strips whitespace, or the characters of the first argument when given
pub fn trim() -> Rule {
    Rule::new("trim", |value: &str, args: &[Value]| -> RuleOutcome {
        match arg_string(args, 0) {
            Some(chars) => value.trim_matches(|c: char| chars.contains(c)).to_string().into(),
            None => value.trim().to_string().into(),
        }
    })
}

pub fn ltrim() -> Rule {
    Rule::new("ltrim", |value: &str, args: &[Value]| -> RuleOutcome {
        match arg_string(args, 0) {
            Some(chars) => value.trim_start_matches(|c: char| chars.contains(c)).to_string().into(),
            None => value.trim_start().to_string().into(),
        }
    })
}

pub fn rtrim() -> Rule {
    Rule::new("rtrim", |value: &str, args: &[Value]| -> RuleOutcome {
        match arg_string(args, 0) {
            Some(chars) => value.trim_end_matches(|c: char| chars.contains(c)).to_string().into(),
            None => value.trim_end().to_string().into(),
        }
    })
}

pub fn to_lower_case() -> Rule {
    Rule::new("to_lower_case", |value: &str, _: &[Value]| value.to_lowercase())
}

pub fn to_upper_case() -> Rule {
    Rule::new("to_upper_case", |value: &str, _: &[Value]| value.to_uppercase())
}

/// HTML-escapes `& < > " ' / \` and backticks
pub fn escape() -> Rule {
    Rule::new("escape", |value: &str, _: &[Value]| {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                '/' => escaped.push_str("&#x2F;"),
                '\\' => escaped.push_str("&#x5C;"),
                '`' => escaped.push_str("&#96;"),
                other => escaped.push(other),
            }
        }
        escaped
    })
}
