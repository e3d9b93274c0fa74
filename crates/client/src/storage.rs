//! Durable session storage.
//!
//! Persists the `user` and `token` entries under the configured state
//! directory so a session survives restarts. Both entries are written
//! together at login and cleared together at logout; a corrupt `user`
//! entry found at startup is discarded and the session starts logged out.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::User;

/// File holding the serialized [`User`].
const USER_FILE: &str = "user.json";
/// File holding the opaque session token.
const TOKEN_FILE: &str = "token";

/// Errors that can occur when persisting session state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The user record failed to serialize.
    #[error("failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the durable session entries.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Persist the user and token together.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created or either
    /// entry fails to write. Nothing is considered saved unless both are.
    pub fn save(&self, user: &User, token: &SecretString) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;

        let serialized = serde_json::to_string(user)?;
        std::fs::write(self.user_path(), serialized)?;
        std::fs::write(self.token_path(), token.expose_secret())?;

        debug!(user_id = %user.id, "session persisted");
        Ok(())
    }

    /// Load the persisted user, if any.
    ///
    /// A corrupt entry is removed and `None` is returned - the caller
    /// starts logged out rather than failing.
    #[must_use]
    pub fn load_user(&self) -> Option<User> {
        let path = self.user_path();
        let contents = read_if_exists(&path)?;

        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding corrupt persisted user");
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!(error = %e, "failed to remove corrupt user entry");
                }
                None
            }
        }
    }

    /// Load the persisted session token, if any.
    #[must_use]
    pub fn load_token(&self) -> Option<SecretString> {
        let contents = read_if_exists(&self.token_path())?;
        if contents.is_empty() {
            return None;
        }
        Some(SecretString::from(contents))
    }

    /// Remove both entries. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for filesystem failures other than the
    /// entries already being absent.
    pub fn clear(&self) -> Result<(), StorageError> {
        remove_if_exists(&self.user_path())?;
        remove_if_exists(&self.token_path())?;
        debug!("session storage cleared");
        Ok(())
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}

fn read_if_exists(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read session entry");
            None
        }
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StorageError::Io(e)),
    }
}
