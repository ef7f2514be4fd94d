//! Loads the ordered playlist from a newline-delimited link file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::{LinkEntry, PlaylistCollection};

const COMMENT_MARKER: char = '#';

/// Reads playlist entries from a flat text source
#[derive(Clone, Debug)]
pub struct LinkStore {
    path: PathBuf,
}

impl LinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. Absence or read failure yields an empty collection.
    pub fn load(&self) -> PlaylistCollection {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let collection = parse_playlist(&content);
                tracing::info!(
                    path = %self.path.display(),
                    entries = collection.len(),
                    "Playlist loaded"
                );
                collection
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Playlist file not found; create it with one Spotify link per line"
                );
                PlaylistCollection::default()
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read playlist file");
                PlaylistCollection::default()
            }
        }
    }
}

/// Parse playlist text. Blank lines are skipped; `#` lines open a new section.
pub fn parse_playlist(content: &str) -> PlaylistCollection {
    let mut section: Option<String> = None;
    let mut entries = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix(COMMENT_MARKER) {
            let header = header.trim_start_matches(COMMENT_MARKER).trim();
            section = (!header.is_empty()).then(|| header.to_string());
            continue;
        }
        entries.push(LinkEntry::with_section(line, section.clone()));
    }

    PlaylistCollection::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines_and_comments() {
        let text = "\n# CHILL\nhttps://a\n\n   https://b  \n#\nhttps://c\n";
        let collection = parse_playlist(text);
        let links: Vec<&str> = collection.iter().map(|e| e.link.as_str()).collect();
        assert_eq!(links, vec!["https://a", "https://b", "https://c"]);
    }

    #[test]
    fn entries_carry_their_section_label() {
        let text = "https://x\n# ROCK CLASSICS\nhttps://a\n## jazz\nhttps://b\n#\nhttps://c";
        let collection = parse_playlist(text);
        let sections: Vec<Option<&str>> = collection
            .iter()
            .map(|e| e.section.as_deref())
            .collect();
        assert_eq!(
            sections,
            vec![None, Some("ROCK CLASSICS"), Some("jazz"), None]
        );
    }

    #[test]
    fn duplicates_are_kept_in_file_order() {
        let collection = parse_playlist("a\nb\na\n");
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.get(2).map(|e| e.link.as_str()), Some("a"));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LinkStore::new(dir.path().join("absent.txt"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.txt");
        fs::write(&path, "# MIX\nhttps://open.spotify.com/track/1\n").unwrap();

        let store = LinkStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        let collection = store.load();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().section.as_deref(), Some("MIX"));
    }
}
