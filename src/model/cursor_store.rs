//! Persists the playlist cursor so restarts resume where broadcasting left off

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

#[derive(Debug, Serialize, Deserialize)]
struct CursorState {
    playlist_index: i64,
}

/// Reads and writes `{ "playlist_index": <int> }` to a state file
#[derive(Clone, Debug)]
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the saved index, falling back to 0 when absent or unreadable.
    pub fn load(&self) -> usize {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No saved cursor, starting at 0");
                return 0;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read cursor state");
                return 0;
            }
        };

        match serde_json::from_str::<CursorState>(&content) {
            Ok(state) if state.playlist_index >= 0 => {
                tracing::info!(playlist_index = state.playlist_index, "Cursor state loaded");
                state.playlist_index as usize
            }
            Ok(state) => {
                tracing::warn!(playlist_index = state.playlist_index, "Negative saved cursor ignored");
                0
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt cursor state ignored");
                0
            }
        }
    }

    /// Overwrite the saved index. Failures are logged, never returned.
    pub fn save(&self, index: usize) {
        match self.try_save(index) {
            Ok(()) => {
                tracing::debug!(playlist_index = index, path = %self.path.display(), "Cursor state saved")
            }
            Err(e) => {
                tracing::error!(playlist_index = index, error = %e, "Failed to save cursor state")
            }
        }
    }

    pub fn try_save(&self, index: usize) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = CursorState {
            playlist_index: index as i64,
        };
        fs::write(&self.path, serde_json::to_string(&state)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> CursorStore {
        CursorStore::new(dir.path().join("state.json"))
    }

    #[test]
    fn absent_state_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), 0);
    }

    #[test]
    fn corrupt_state_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), 0);

        fs::write(store.path(), r#"{"playlist_index": "seven"}"#).unwrap();
        assert_eq!(store.load(), 0);

        fs::write(store.path(), r#"{"playlist_index": -4}"#).unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(12);
        store.save(3);
        store.save(3);

        assert_eq!(store.load(), 3);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"playlist_index":3}"#);
    }

    #[test]
    fn extra_keys_in_state_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"playlist_index": 5, "other": true}"#).unwrap();
        assert_eq!(store.load(), 5);
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("nested/state.json"));
        store.save(1);
        assert_eq!(store.load(), 1);
    }

    #[test]
    fn failed_save_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let store = CursorStore::new(dir.path());
        store.save(2);
        assert!(store.try_save(2).is_err());
    }
}
