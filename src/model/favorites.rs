//! Append-only favorites log

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// Newline-delimited list of favorited links, in append order
#[derive(Clone, Debug)]
pub struct FavoritesLog {
    path: PathBuf,
}

impl FavoritesLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a link. Failures are logged, never returned.
    pub fn append(&self, link: &str) {
        match self.try_append(link) {
            Ok(()) => tracing::info!(link, "Added to favorites"),
            Err(e) => tracing::error!(link, error = %e, "Failed to append favorite"),
        }
    }

    pub fn try_append(&self, link: &str) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", link)?;
        Ok(())
    }

    /// All favorites in append order; empty when the log does not exist.
    pub fn list(&self) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read favorites");
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = fs::write(&self.path, "") {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to clear favorites");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_keep_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("favorites.txt"));
        log.append("https://a");
        log.append("https://b");
        log.append("https://a");
        assert_eq!(log.list(), vec!["https://a", "https://b", "https://a"]);
    }

    #[test]
    fn missing_log_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("favorites.txt"));
        assert!(log.list().is_empty());
    }

    #[test]
    fn clear_empties_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("favorites.txt"));
        log.append("https://a");
        log.clear();
        assert!(log.list().is_empty());
    }

    #[test]
    fn append_into_missing_directory_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let log = FavoritesLog::new(dir.path().join("missing/favorites.txt"));
        log.append("https://a");
        assert!(log.try_append("https://a").is_err());
        assert!(log.list().is_empty());
    }
}
