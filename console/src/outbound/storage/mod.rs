//! File-backed session persistence.
//!
//! The session directory holds two files mirroring the browser console's
//! storage keys: `token` with the raw bearer token and `user` with the profile
//! as JSON. Writes go through a staging file and a rename so a crash never
//! leaves a half-written record behind.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PersistedSession, SessionStorage, SessionStorageError};
use crate::domain::{Credential, Profile};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user";

/// [`SessionStorage`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    root: PathBuf,
}

impl FileSessionStorage {
    /// Storage rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the session files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self) -> Result<Option<Dir>, SessionStorageError> {
        match Dir::open_ambient_dir(&self.root, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(&self.root, &error)),
        }
    }

    fn create(&self) -> Result<Dir, SessionStorageError> {
        Dir::create_ambient_dir_all(&self.root, ambient_authority())
            .map_err(|error| io_error(&self.root, &error))?;
        Dir::open_ambient_dir(&self.root, ambient_authority())
            .map_err(|error| io_error(&self.root, &error))
    }

    fn read(&self, dir: &Dir, name: &str) -> Result<Option<String>, SessionStorageError> {
        match dir.read_to_string(name) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(&self.root.join(name), &error)),
        }
    }

    fn write(&self, dir: &Dir, name: &str, contents: &[u8]) -> Result<(), SessionStorageError> {
        let staged = format!(".{name}.tmp-{}", Uuid::new_v4().simple());
        let result = dir
            .write(&staged, contents)
            .and_then(|()| dir.rename(&staged, dir, name));
        if let Err(error) = result {
            let _cleanup_result = dir.remove_file(&staged);
            return Err(io_error(&self.root.join(name), &error));
        }
        Ok(())
    }

    fn remove(&self, dir: &Dir, name: &str) -> Result<(), SessionStorageError> {
        match dir.remove_file(name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&self.root.join(name), &error)),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<PersistedSession>, SessionStorageError> {
        let Some(dir) = self.open()? else {
            return Ok(None);
        };
        let (Some(token), Some(user)) = (self.read(&dir, TOKEN_FILE)?, self.read(&dir, USER_FILE)?)
        else {
            debug!(root = %self.root.display(), "no persisted session");
            return Ok(None);
        };

        let credential = Credential::new(token.trim())
            .map_err(|error| SessionStorageError::corrupt(format!("{TOKEN_FILE}: {error}")))?;
        let profile: Profile = serde_json::from_str(&user)
            .map_err(|error| SessionStorageError::corrupt(format!("{USER_FILE}: {error}")))?;
        Ok(Some(PersistedSession {
            credential,
            profile,
        }))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), SessionStorageError> {
        let dir = self.create()?;
        let user = serde_json::to_vec(&session.profile)
            .map_err(|error| SessionStorageError::corrupt(format!("{USER_FILE}: {error}")))?;
        self.write(&dir, TOKEN_FILE, session.credential.expose().as_bytes())?;
        self.write(&dir, USER_FILE, &user)
    }

    fn clear(&self) -> Result<(), SessionStorageError> {
        let Some(dir) = self.open()? else {
            return Ok(());
        };
        let token = self.remove(&dir, TOKEN_FILE);
        let user = self.remove(&dir, USER_FILE);
        token.and(user)
    }
}

fn io_error(path: &Path, error: &io::Error) -> SessionStorageError {
    SessionStorageError::io(format!("{}: {error}", path.display()))
}
