//! Format checks for common API identifiers
//!
//! Plain predicates behind the `is_uuid`, `is_slug`, `is_phone`, `is_json`
//! and `is_duration` rules.

/// Any RFC 4122 UUID in hyphenated, simple, braced or URN form
pub fn is_uuid(value: &str) -> bool {
    uuid::Uuid::parse_str(value).is_ok()
}

/// Lowercase alphanumerics, hyphens and underscores; 1 to 100 characters
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 100
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// E.164 (`+` and up to 15 digits) or a bare 10-digit number.
///
/// Spaces, hyphens and parentheses are ignored.
pub fn is_phone(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    match cleaned.strip_prefix('+') {
        Some(digits) => {
            !digits.is_empty() && digits.len() <= 15 && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => cleaned.len() == 10 && cleaned.bytes().all(|b| b.is_ascii_digit()),
    }
}

pub fn is_json(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok()
}

/// A count followed by one of `s`, `m`, `h`, `d` (e.g. "30s", "2d")
pub fn is_duration(value: &str) -> bool {
    let Some(count) = value.strip_suffix(['s', 'm', 'h', 'd']) else {
        return false;
    };
    count.bytes().all(|b| b.is_ascii_digit()) && count.parse::<u64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!is_uuid("invalid-uuid"));
        assert!(!is_uuid(""));
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("my-slug"));
        assert!(is_slug("my_slug"));
        assert!(is_slug("my-slug-123"));
        assert!(!is_slug(""));
        assert!(!is_slug("My-Slug"));
        assert!(!is_slug("my slug"));
        assert!(!is_slug(&"a".repeat(101)));
    }

    #[test]
    fn test_is_phone() {
        assert!(is_phone("+1234567890"));
        assert!(is_phone("1234567890"));
        assert!(is_phone("(123) 456-7890"));
        assert!(is_phone("123-456-7890"));
        assert!(!is_phone("+"));
        assert!(!is_phone("invalid"));
        assert!(!is_phone(""));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"key": "value"}"#));
        assert!(is_json("[1, 2, 3]"));
        assert!(!is_json("invalid json"));
        assert!(!is_json("{invalid}"));
    }

    #[test]
    fn test_is_duration() {
        assert!(is_duration("30s"));
        assert!(is_duration("5m"));
        assert!(is_duration("1h"));
        assert!(is_duration("2d"));
        assert!(!is_duration(""));
        assert!(!is_duration("30"));
        assert!(!is_duration("s"));
        assert!(!is_duration("30x"));
        assert!(!is_duration("+3s"));
    }
}
