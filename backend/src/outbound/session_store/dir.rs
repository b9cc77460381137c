//! Directory-backed session store: one file per key.
//!
//! Access goes through a capability [`Dir`], so keys can never name paths
//! outside the session directory.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

use crate::domain::ports::{SessionStore, SessionStoreError};

fn io_error(key: &str, error: &io::Error) -> SessionStoreError {
    SessionStoreError::io(format!("{key}: {error}"))
}

fn checked(key: &str) -> Result<&str, SessionStoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(key)
    } else {
        Err(SessionStoreError::invalid_key(key))
    }
}

/// Session values persisted as files under a directory.
#[derive(Debug)]
pub struct DirSessionStore {
    dir: Dir,
}

impl DirSessionStore {
    /// Open `path`, creating it when missing.
    ///
    /// # Errors
    /// Returns [`SessionStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|error| io_error(&label, &error))?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|error| io_error(&label, &error))?;
        Ok(Self { dir })
    }
}

impl SessionStore for DirSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        match self.dir.read_to_string(checked(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(io_error(key, &error)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.dir
            .write(checked(key)?, value.as_bytes())
            .map_err(|error| io_error(key, &error))
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionStoreError> {
        match self.dir.remove_file(checked(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(key, &error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{THEME_KEY, TOKEN_KEY};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    fn values_survive_reopening(temp_dir: TempDir) {
        let path = temp_dir.path().join("session");
        let mut store = DirSessionStore::open(&path).expect("open store");
        store.set(TOKEN_KEY, "abc").expect("set token");
        drop(store);

        let reopened = DirSessionStore::open(&path).expect("reopen store");
        assert_eq!(reopened.get(TOKEN_KEY).expect("get").as_deref(), Some("abc"));
        assert!(path.join(TOKEN_KEY).is_file());
    }

    #[rstest]
    fn missing_keys_read_as_absent(temp_dir: TempDir) {
        let mut store = DirSessionStore::open(temp_dir.path()).expect("open store");
        assert_eq!(store.get(THEME_KEY).expect("get"), None);
        store.remove(THEME_KEY).expect("removing an absent key");
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case(".hidden")]
    #[case("nested/key")]
    fn rejects_keys_that_are_not_plain_names(temp_dir: TempDir, #[case] key: &str) {
        let mut store = DirSessionStore::open(temp_dir.path()).expect("open store");
        let err = store.set(key, "x").expect_err("invalid key");
        assert_eq!(err, SessionStoreError::invalid_key(key));
    }
}
