//! Environment variable parsing utilities
//!
//! Every service builds its `Config` from the process environment through
//! these helpers, so a malformed value falls back to the default instead of
//! panicking at startup.

use std::str::FromStr;

/// Parse an environment variable with a default fallback
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_with_default("GATEWAY_PORT", 8080);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a string variable, treating blank values as missing
pub fn env_string_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a string variable with a default fallback
pub fn env_string_or(key: &str, default: &str) -> String {
    env_string_optional(key).unwrap_or_else(|| default.to_string())
}

/// Split a comma-separated variable into trimmed, non-empty items
pub fn env_list(key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = env_string_optional(key)?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("GONEWS_NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);

        std::env::set_var("GONEWS_TEST_PORT", "8080");
        let result: u16 = parse_env_with_default("GONEWS_TEST_PORT", 3000);
        assert_eq!(result, 8080);

        std::env::set_var("GONEWS_TEST_PORT", "not-a-port");
        let result: u16 = parse_env_with_default("GONEWS_TEST_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("GONEWS_TEST_PORT");
    }

    #[test]
    #[serial]
    fn test_env_string_blank_is_missing() {
        std::env::set_var("GONEWS_TEST_HOST", "   ");
        assert_eq!(env_string_optional("GONEWS_TEST_HOST"), None);
        assert_eq!(env_string_or("GONEWS_TEST_HOST", "0.0.0.0"), "0.0.0.0");
        std::env::remove_var("GONEWS_TEST_HOST");
    }

    #[test]
    #[serial]
    fn test_env_list() {
        std::env::set_var("GONEWS_TEST_LIST", " spam, ,eggs ,");
        assert_eq!(
            env_list("GONEWS_TEST_LIST"),
            Some(vec!["spam".to_string(), "eggs".to_string()])
        );

        std::env::set_var("GONEWS_TEST_LIST", " , ");
        assert_eq!(env_list("GONEWS_TEST_LIST"), None);
        std::env::remove_var("GONEWS_TEST_LIST");
    }
}
