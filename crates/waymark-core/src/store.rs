//! Token persistence trait and in-memory implementation.

use std::sync::RwLock;

use crate::types::TokenSet;

/// Durable holder for the session's credential triple.
///
/// The store is synchronous and infallible from the SDK's point of view;
/// persistence failures are an embedder concern. Loads and saves move the
/// whole triple at once, so a concurrent reader can never observe a
/// half-written set.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token set, or `None` when unauthenticated.
    fn load(&self) -> Option<TokenSet>;

    /// Replace the stored token set.
    fn save(&self, tokens: &TokenSet);
}

// Shared handles delegate, so a caller can keep a view of the store it
// hands to the session.
impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn load(&self) -> Option<TokenSet> {
        (**self).load()
    }

    fn save(&self, tokens: &TokenSet) {
        (**self).save(tokens)
    }
}

/// An in-memory [`TokenStore`].
///
/// The default store when the embedding application does not need tokens
/// to outlive the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenSet>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<TokenSet> {
        self.tokens.read().unwrap().clone()
    }

    fn save(&self, tokens: &TokenSet) {
        *self.tokens.write().unwrap() = Some(tokens.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessToken, RefreshToken};

    #[test]
    fn empty_store_loads_none() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryTokenStore::new();
        store.save(&TokenSet::new(
            AccessToken::new("a"),
            RefreshToken::new("r"),
            "2024-05-01T00:00:00Z",
        ));

        let loaded = store.load().expect("tokens should be stored");
        assert_eq!(loaded.access_token().as_str(), "a");
        assert_eq!(loaded.refresh_token().as_str(), "r");
        assert_eq!(loaded.expires_at(), "2024-05-01T00:00:00Z");
    }

    #[test]
    fn save_replaces_whole_set() {
        let store = MemoryTokenStore::new();
        store.save(&TokenSet::new(
            AccessToken::new("a1"),
            RefreshToken::new("r1"),
            "t1",
        ));
        store.save(&TokenSet::new(
            AccessToken::new("a2"),
            RefreshToken::new("r2"),
            "t2",
        ));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token().as_str(), "a2");
        assert_eq!(loaded.refresh_token().as_str(), "r2");
    }
}
