/// Get environment variable with TIDEWAY_ prefix, falling back to unprefixed version
///
/// Checks `TIDEWAY_{key}` first, then `{key}`.
///
/// # Examples
///
/// ```rust
/// use tideway_validator::utils::get_env_with_prefix;
///
/// // Checks TIDEWAY_VALIDATOR_MAX_BODY_SIZE first, then VALIDATOR_MAX_BODY_SIZE
/// let limit = get_env_with_prefix("VALIDATOR_MAX_BODY_SIZE");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("TIDEWAY_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_with_prefix() {
        unsafe {
            std::env::set_var("TIDEWAY_VALIDATOR_ENV_TEST", "prefixed_value");
        }
        assert_eq!(
            get_env_with_prefix("VALIDATOR_ENV_TEST"),
            Some("prefixed_value".to_string())
        );
        unsafe {
            std::env::remove_var("TIDEWAY_VALIDATOR_ENV_TEST");
        }

        unsafe {
            std::env::set_var("VALIDATOR_ENV_FALLBACK", "unprefixed_value");
        }
        assert_eq!(
            get_env_with_prefix("VALIDATOR_ENV_FALLBACK"),
            Some("unprefixed_value".to_string())
        );
        unsafe {
            std::env::remove_var("VALIDATOR_ENV_FALLBACK");
        }

        assert_eq!(get_env_with_prefix("VALIDATOR_ENV_MISSING"), None);
    }
}
