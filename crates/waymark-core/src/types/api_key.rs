//! API key type.

use std::fmt;

/// The API key used for initial authentication.
///
/// # Security
///
/// The key value is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use waymark_core::ApiKey;
///
/// let key = ApiKey::new("sk-live-0123");
/// assert!(!key.is_blank());
/// ```
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns true if the key is empty or whitespace-only.
    ///
    /// Blank keys are a configuration error and must be rejected before
    /// any network call.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the key value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing the authentication request.
    /// Never log or display this value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

// Intentionally hide the key in Debug output
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_hides_value_in_debug() {
        let key = ApiKey::new("sk-live-supersecret");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn blank_detection() {
        assert!(ApiKey::new("").is_blank());
        assert!(ApiKey::new("   \t ").is_blank());
        assert!(!ApiKey::new("key").is_blank());
    }
}
