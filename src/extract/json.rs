//! JSON path lookups for `json` fields
//!
//! Supported syntax: an optional `$` root, `.key` members, `[n]` indices,
//! `['key']` / `["key"]` quoted members and `*` / `[*]` wildcards. A bare
//! leading member is allowed, so `post.author.email` and
//! `$.post.author.email` are the same path. Numeric members index arrays,
//! as in `items.0.name`.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
}

impl Segment {
    fn select<'a>(&self, value: &'a Value) -> Vec<&'a Value> {
        match (self, value) {
            (Self::Key(key), Value::Object(map)) => map.get(key).into_iter().collect(),
            (Self::Key(key), Value::Array(items)) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .into_iter()
                .collect(),
            (Self::Index(i), Value::Array(items)) => items.get(*i).into_iter().collect(),
            (Self::Index(i), Value::Object(map)) => map.get(&i.to_string()).into_iter().collect(),
            (Self::Wildcard, Value::Object(map)) => map.values().collect(),
            (Self::Wildcard, Value::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// A parsed JSON path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse a path expression, returning the reason on failure
    pub fn parse(path: &str) -> Result<Self, String> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err("path is empty".to_string());
        }

        let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let mut chars = rest.chars().peekable();
        let mut segments = Vec::new();
        let mut expect_name = !rest.is_empty() && !rest.starts_with(['.', '[']);

        loop {
            if expect_name {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                segments.push(match name.as_str() {
                    "" => return Err("empty member name".to_string()),
                    "*" => Segment::Wildcard,
                    _ => Segment::Key(name),
                });
                expect_name = false;
                continue;
            }

            match chars.next() {
                None => break,
                Some('.') => {
                    if chars.peek() == Some(&'.') {
                        return Err("recursive descent is not supported".to_string());
                    }
                    expect_name = true;
                }
                Some('[') => {
                    let segment = match chars.peek() {
                        Some(&quote) if quote == '\'' || quote == '"' => {
                            chars.next();
                            let mut key = String::new();
                            loop {
                                match chars.next() {
                                    Some(c) if c == quote => break,
                                    Some(c) => key.push(c),
                                    None => return Err("unterminated quoted member".to_string()),
                                }
                            }
                            Segment::Key(key)
                        }
                        _ => {
                            let mut inner = String::new();
                            while let Some(&c) = chars.peek() {
                                if c == ']' {
                                    break;
                                }
                                inner.push(c);
                                chars.next();
                            }
                            let inner = inner.trim();
                            if inner == "*" {
                                Segment::Wildcard
                            } else {
                                inner
                                    .parse::<usize>()
                                    .map(Segment::Index)
                                    .map_err(|_| format!("invalid index \"{}\"", inner))?
                            }
                        }
                    };
                    if chars.next() != Some(']') {
                        return Err("missing closing bracket".to_string());
                    }
                    segments.push(segment);
                }
                Some(c) => return Err(format!("unexpected character '{}'", c)),
            }
        }

        Ok(Self { segments })
    }

    /// First value matched by the path, in document order
    pub fn first<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = vec![root];
        for segment in &self.segments {
            current = current.into_iter().flat_map(|v| segment.select(v)).collect();
            if current.is_empty() {
                return None;
            }
        }
        current.into_iter().next()
    }
}

/// Text handed to rules for a JSON value
///
/// Strings are passed verbatim; everything else as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve `path` against `root` and stringify the first match
pub fn lookup(root: &Value, path: &str) -> Result<Option<String>, String> {
    Ok(JsonPath::parse(path)?.first(root).map(stringify))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "post": {
                "title": "Hello",
                "author": {"email": "ada@example.com", "age": 36},
                "tags": ["rust", "axum"],
                "draft": false,
                "editor": null
            },
            "items": [{"name": "first"}, {"name": "second"}]
        })
    }

    #[test]
    fn test_dotted_paths() {
        let doc = doc();
        assert_eq!(lookup(&doc, "post.author.email").unwrap().as_deref(), Some("ada@example.com"));
        assert_eq!(lookup(&doc, "$.post.title").unwrap().as_deref(), Some("Hello"));
        assert_eq!(lookup(&doc, "post.missing").unwrap(), None);
        assert_eq!(lookup(&doc, "post.title.length").unwrap(), None);
    }

    #[test]
    fn test_indices_and_quotes() {
        let doc = doc();
        assert_eq!(lookup(&doc, "items[1].name").unwrap().as_deref(), Some("second"));
        assert_eq!(lookup(&doc, "items.0.name").unwrap().as_deref(), Some("first"));
        assert_eq!(lookup(&doc, "$['post'][\"title\"]").unwrap().as_deref(), Some("Hello"));
        assert_eq!(lookup(&doc, "items[5]").unwrap(), None);
    }

    #[test]
    fn test_wildcards_take_first_match() {
        let doc = doc();
        assert_eq!(lookup(&doc, "items[*].name").unwrap().as_deref(), Some("first"));
        assert_eq!(lookup(&doc, "post.tags.*").unwrap().as_deref(), Some("rust"));
    }

    #[test]
    fn test_object_wildcard_follows_document_order() {
        let doc: Value = serde_json::from_str(r#"{"b": "1x", "a": "ok", "c": {"z": 1, "y": 2}}"#).unwrap();
        assert_eq!(lookup(&doc, "$.*").unwrap().as_deref(), Some("1x"));
        assert_eq!(lookup(&doc, "c.*").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_non_string_values() {
        let doc = doc();
        assert_eq!(lookup(&doc, "post.author.age").unwrap().as_deref(), Some("36"));
        assert_eq!(lookup(&doc, "post.draft").unwrap().as_deref(), Some("false"));
        assert_eq!(lookup(&doc, "post.editor").unwrap().as_deref(), Some("null"));
        assert_eq!(lookup(&doc, "post.tags").unwrap().as_deref(), Some(r#"["rust","axum"]"#));
        assert_eq!(lookup(&doc, "$").unwrap().map(|s| s.starts_with('{')), Some(true));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(JsonPath::parse("").is_err());
        assert!(JsonPath::parse("post..email").is_err());
        assert!(JsonPath::parse("post.").is_err());
        assert!(JsonPath::parse("items[one]").is_err());
        assert!(JsonPath::parse("items[0").is_err());
        assert!(JsonPath::parse("post['title").is_err());
        assert!(JsonPath::parse("$post").is_ok());
    }
}
