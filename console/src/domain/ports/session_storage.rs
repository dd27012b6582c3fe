//! Driven port for persisting the session across restarts.
//!
//! Two records are persisted: the bearer token under `token` and the profile
//! under `user`. A session is only restorable when both are present.

use std::sync::{Mutex, PoisonError};

use super::define_port_error;
use crate::domain::{Credential, Profile};

/// Persisted session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    /// Bearer credential stored under `token`.
    pub credential: Credential,
    /// Profile stored under `user`.
    pub profile: Profile,
}

define_port_error! {
    /// Errors raised by session persistence.
    pub enum SessionStorageError {
        /// The backing store could not be read or written.
        Io { message: String } => "session storage failed: {message}",
        /// A stored record could not be decoded.
        Corrupt { message: String } => "session storage corrupt: {message}",
    }
}

/// Port for the `token` and `user` records.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage: Send + Sync {
    /// Load both records; `Ok(None)` when either is missing.
    fn load(&self) -> Result<Option<PersistedSession>, SessionStorageError>;

    /// Replace both records.
    fn save(&self, session: &PersistedSession) -> Result<(), SessionStorageError>;

    /// Remove both records. Removing absent records succeeds.
    fn clear(&self) -> Result<(), SessionStorageError>;
}

/// Process-local storage used by tests and embedders without a filesystem.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    record: Mutex<Option<PersistedSession>>,
}

impl InMemorySessionStorage {
    /// Storage pre-populated with `session`.
    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            record: Mutex::new(Some(session)),
        }
    }

    /// Whether a record is currently stored.
    pub fn is_empty(&self) -> bool {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> Result<Option<PersistedSession>, SessionStorageError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionStorageError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStorageError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
