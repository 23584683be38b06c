//! Configuration sources and the key names the factory reads.
//!
//! The factory never touches `std::env` directly; it reads through a
//! [`ConfigSource`]. [`ProcessEnv`] is the production source, and any
//! `HashMap<String, String>` works as a source for tests or embedders.

use std::collections::HashMap;

/// Registration provider: reseller API key.
pub const OPENSRS_API_KEY: &str = "OPENSRS_API_KEY";
/// Registration provider: reseller username.
pub const OPENSRS_USERNAME: &str = "OPENSRS_USERNAME";
/// Registration provider: `test` or `live` (defaults to `test`).
pub const OPENSRS_ENVIRONMENT: &str = "OPENSRS_ENVIRONMENT";
/// Registration provider: optional base URL override.
pub const OPENSRS_ENDPOINT: &str = "OPENSRS_ENDPOINT";

/// Email hosting provider: admin user.
pub const OPENSRS_EMAIL_USER: &str = "OPENSRS_EMAIL_USER";
/// Email hosting provider: admin password.
pub const OPENSRS_EMAIL_PASSWORD: &str = "OPENSRS_EMAIL_PASSWORD";
/// Email hosting provider: cluster identifier (`a`, `b`, ...).
pub const OPENSRS_EMAIL_CLUSTER: &str = "OPENSRS_EMAIL_CLUSTER";
/// Email hosting provider: `test` or `live` (defaults to `test`).
pub const OPENSRS_EMAIL_ENVIRONMENT: &str = "OPENSRS_EMAIL_ENVIRONMENT";
/// Email hosting provider: optional base URL override.
pub const OPENSRS_EMAIL_ENDPOINT: &str = "OPENSRS_EMAIL_ENDPOINT";

/// Read-only key/value configuration.
///
/// Implementations must return the value as stored; callers decide how
/// absent or blank values are treated.
pub trait ConfigSource: Send + Sync {
    /// Look up a single key. `None` when the key is not set.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a key and drop whitespace-only values.
    fn get_non_blank(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

/// The process environment, read at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values are treated as unset.
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_source_returns_stored_value() {
        let map: HashMap<String, String> =
            [(OPENSRS_API_KEY.to_string(), " K ".to_string())].into();
        assert_eq!(ConfigSource::get(&map, OPENSRS_API_KEY).as_deref(), Some(" K "));
        assert_eq!(ConfigSource::get(&map, OPENSRS_USERNAME), None);
    }

    #[test]
    fn non_blank_filters_whitespace() {
        let map: HashMap<String, String> = [
            (OPENSRS_ENVIRONMENT.to_string(), "   ".to_string()),
            (OPENSRS_USERNAME.to_string(), "U".to_string()),
        ]
        .into();
        assert_eq!(map.get_non_blank(OPENSRS_ENVIRONMENT), None);
        assert_eq!(map.get_non_blank(OPENSRS_USERNAME).as_deref(), Some("U"));
    }

    #[test]
    fn process_env_misses_unset_key() {
        assert_eq!(
            ProcessEnv.get("HOSTDESK_TEST_KEY_THAT_IS_NEVER_SET_1f3c"),
            None
        );
    }
}
