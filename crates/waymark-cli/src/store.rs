//! File-backed token persistence for the CLI.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use waymark_core::{AccessToken, RefreshToken, TokenSet, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored token data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    expires_at: String,
    saved_at: chrono::DateTime<chrono::Utc>,
}

/// A [`TokenStore`] that persists the credential triple as a JSON file in
/// the platform data directory, with restrictive permissions.
///
/// The store contract is infallible; I/O problems are logged and treated
/// as "no tokens stored".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Open the store at the default platform location.
    pub fn open_default() -> Result<Self> {
        let dirs =
            ProjectDirs::from("", "", "waymark").context("Could not determine config directory")?;

        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        Ok(Self {
            path: data_dir.join("tokens.json"),
        })
    }

    #[cfg(test)]
    fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<TokenSet> {
        let json = fs::read_to_string(&self.path).ok()?;
        let stored: StoredTokens = match serde_json::from_str(&json) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable token file");
                return None;
            }
        };

        Some(TokenSet::new(
            AccessToken::new(stored.access_token),
            RefreshToken::new(stored.refresh_token),
            stored.expires_at,
        ))
    }

    fn save(&self, tokens: &TokenSet) {
        let stored = StoredTokens {
            access_token: tokens.access_token().as_str().to_string(),
            refresh_token: tokens.refresh_token().as_str().to_string(),
            expires_at: tokens.expires_at().to_string(),
            saved_at: chrono::Utc::now(),
        };

        let json = match serde_json::to_string_pretty(&stored) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize tokens");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, &json) {
            tracing::warn!(error = %e, "failed to persist tokens");
            return;
        }

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        if let Ok(metadata) = fs::metadata(&self.path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = fs::set_permissions(&self.path, perms) {
                tracing::warn!(error = %e, "failed to restrict token file permissions");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> TokenSet {
        TokenSet::new(
            AccessToken::new("access"),
            RefreshToken::new("refresh"),
            "2024-05-01T00:00:00Z",
        )
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("tokens.json"));

        store.save(&sample_set());
        let loaded = store.load().expect("tokens should persist");

        assert_eq!(loaded.access_token().as_str(), "access");
        assert_eq!(loaded.refresh_token().as_str(), "refresh");
        assert_eq!(loaded.expires_at(), "2024-05-01T00:00:00Z");
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("tokens.json"));
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("tokens.json"));

        store.save(&sample_set());

        let mode = fs::metadata(dir.path().join("tokens.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
