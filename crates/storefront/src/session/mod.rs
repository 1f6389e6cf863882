//! Session storage.
//!
//! The client keeps exactly two values for the duration of a session: the
//! logged-in user's ID and display name. They live in a small key-value store
//! behind [`SessionStorage`]; [`Session`] gives them types.
//!
//! - [`MemoryStorage`] - gone when the process exits
//! - [`FileStorage`] - a JSON object on disk, shared by separate CLI runs

mod file;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use shopfront_core::UserId;

pub use file::FileStorage;

/// Session keys.
pub mod keys {
    /// Key for the logged-in user's ID.
    pub const USER_ID: &str = "userId";

    /// Key for the logged-in user's display name.
    pub const USERNAME: &str = "username";
}

/// Errors from session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session file is not a JSON object of strings.
    #[error("Corrupt session file at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A user ID is stored but is not a number.
    #[error("Invalid user ID. Please login again.")]
    InvalidUserId(String),
}

/// Key-value storage scoped to one client session.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// In-process storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }
}

/// The logged-in user, as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
}

/// Typed access to the session.
pub struct Session {
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap a storage backend.
    #[must_use]
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// A session that lives only as long as this process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// The logged-in user, if any.
    ///
    /// A missing `userId` means nobody is logged in. A missing `username`
    /// alongside a valid ID yields an empty display name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidUserId` if the stored ID is not a
    /// number, or a storage error.
    pub fn current_user(&self) -> Result<Option<CurrentUser>, SessionError> {
        let Some(raw_id) = self.storage.get(keys::USER_ID)? else {
            return Ok(None);
        };
        let user_id = raw_id
            .parse::<UserId>()
            .map_err(|_| SessionError::InvalidUserId(raw_id.clone()))?;
        let username = self.storage.get(keys::USERNAME)?.unwrap_or_default();

        Ok(Some(CurrentUser { user_id, username }))
    }

    /// Record a successful login or signup.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn store_user(&mut self, user: &CurrentUser) -> Result<(), SessionError> {
        self.storage
            .set(keys::USER_ID, &user.user_id.to_string())?;
        self.storage.set(keys::USERNAME, &user.username)
    }

    /// Forget the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.storage.remove(keys::USER_ID)?;
        self.storage.remove(keys::USERNAME)
    }

    /// Raw access to the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }
}
