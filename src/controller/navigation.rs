//! Cursor navigation over the playlist

use rand::seq::SliceRandom;

use crate::error::PlaybackError;
use crate::model::{LinkEntry, PlaylistCollection};

use super::PlaybackController;

fn non_empty_len(playlist: &PlaylistCollection) -> Result<usize, PlaybackError> {
    match playlist.len() {
        0 => Err(PlaybackError::Empty),
        len => Ok(len),
    }
}

impl PlaybackController {
    /// Return the entry under the cursor, then move the cursor forward.
    pub async fn current_and_advance(&self) -> Result<LinkEntry, PlaybackError> {
        let mut cursor = self.cursor.lock().await;
        let playlist = self.snapshot().await;
        let len = non_empty_len(&playlist)?;

        let index = *cursor % len;
        let entry = playlist.entries()[index].clone();
        let next = (index + 1) % len;

        *cursor = next;
        self.cursor_store.save(next);
        tracing::info!(link = %entry.link, index, next, "Playlist advanced");
        Ok(entry)
    }

    /// Move the cursor back one entry and return the entry there.
    pub async fn current_and_rewind(&self) -> Result<LinkEntry, PlaybackError> {
        let mut cursor = self.cursor.lock().await;
        let playlist = self.snapshot().await;
        let len = non_empty_len(&playlist)?;

        let index = (*cursor % len + len - 1) % len;
        let entry = playlist.entries()[index].clone();

        *cursor = index;
        self.cursor_store.save(index);
        tracing::info!(link = %entry.link, index, "Playlist rewound");
        Ok(entry)
    }

    /// Point the cursor at a 1-based position and return that entry.
    pub async fn jump_to(&self, position: i64) -> Result<LinkEntry, PlaybackError> {
        let mut cursor = self.cursor.lock().await;
        let playlist = self.snapshot().await;
        let len = non_empty_len(&playlist)?;

        if position < 1 || position as u64 > len as u64 {
            return Err(PlaybackError::OutOfRange { position, len });
        }

        let index = (position - 1) as usize;
        let entry = playlist.entries()[index].clone();

        *cursor = index;
        self.cursor_store.save(index);
        tracing::info!(link = %entry.link, position, "Playlist jumped");
        Ok(entry)
    }

    /// Look up an entry by 1-based index (all-digit query) or by
    /// case-insensitive substring. Does not move the cursor.
    pub async fn find_by_index_or_substring(&self, query: &str) -> Result<LinkEntry, PlaybackError> {
        let playlist = self.snapshot().await;
        let len = non_empty_len(&playlist)?;

        if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit()) {
            let position = query.parse::<i64>().unwrap_or(i64::MAX);
            return match position {
                p if p >= 1 && p as u64 <= len as u64 => Ok(playlist.entries()[(p - 1) as usize].clone()),
                p => Err(PlaybackError::OutOfRange { position: p, len }),
            };
        }

        let needle = query.to_lowercase();
        playlist
            .iter()
            .find(|e| e.link.to_lowercase().contains(&needle))
            .cloned()
            .ok_or_else(|| PlaybackError::NotFound(query.to_string()))
    }

    /// Entry under the cursor, without moving it.
    pub async fn peek(&self) -> Result<LinkEntry, PlaybackError> {
        let cursor = self.cursor.lock().await;
        let playlist = self.snapshot().await;
        let len = non_empty_len(&playlist)?;
        Ok(playlist.entries()[*cursor % len].clone())
    }

    /// A uniformly random entry. Does not move the cursor.
    pub async fn random(&self) -> Result<LinkEntry, PlaybackError> {
        let playlist = self.snapshot().await;
        playlist
            .entries()
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(PlaybackError::Empty)
    }

    /// Every case-insensitive substring match with its 1-based position.
    pub async fn search(&self, query: &str) -> Vec<(usize, LinkEntry)> {
        let needle = query.to_lowercase();
        self.snapshot()
            .await
            .iter()
            .enumerate()
            .filter(|(_, e)| e.link.to_lowercase().contains(&needle))
            .map(|(i, e)| (i + 1, e.clone()))
            .collect()
    }

    /// Reload the playlist file and swap the collection in whole.
    ///
    /// The cursor is left as is; a stale cursor against a shorter playlist
    /// is reduced modulo the new length on its next use.
    pub async fn reload(&self) -> usize {
        let playlist = self.links.load();
        let len = playlist.len();
        *self.playlist.write().await = std::sync::Arc::new(playlist);
        self.check_min_size(len);
        tracing::info!(path = %self.links.path().display(), entries = len, "Playlist reloaded");
        len
    }
}
