//! Controller module - Playlist navigation and the surfaces that drive it
//!
//! - `navigation`: Cursor operations (advance, rewind, jump, find, reload)
//! - `present`: Resolve + render + fallback composition for a link
//! - `scheduler`: Periodic broadcast task
//! - `commands`: Command parsing and dispatch

mod navigation;
mod present;
mod scheduler;
mod commands;

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::model::{CursorStore, LinkStore, PlaylistCollection, RenderTemplate, TemplateStore};

pub use present::{present, Presentation};
pub use scheduler::{Scheduler, SchedulerHandle, TickOutcome, DEFAULT_INTERVAL};
pub use commands::{Command, CommandSurface};

/// Owns the playlist cursor and the current playlist/template snapshots.
///
/// Every cursor mutation runs under the `cursor` lock through to its
/// persistence step, so concurrent commands and scheduler ticks are
/// serialized and never overwrite each other's result.
pub struct PlaybackController {
    links: LinkStore,
    cursor_store: CursorStore,
    templates: TemplateStore,
    cursor: Mutex<usize>,
    playlist: RwLock<Arc<PlaylistCollection>>,
    template: RwLock<Arc<RenderTemplate>>,
    min_playlist_size: usize,
}

impl PlaybackController {
    /// Load playlist, template and persisted cursor.
    ///
    /// The cursor is normalized against the loaded playlist and written back
    /// when the playlist is non-empty.
    pub fn new(links: LinkStore, cursor_store: CursorStore, templates: TemplateStore) -> Self {
        let playlist = links.load();
        let template = templates.load();
        let mut cursor = cursor_store.load();

        if !playlist.is_empty() {
            cursor %= playlist.len();
            cursor_store.save(cursor);
        }
        tracing::info!(entries = playlist.len(), cursor, "Playback controller ready");

        Self {
            links,
            cursor_store,
            templates,
            cursor: Mutex::new(cursor),
            playlist: RwLock::new(Arc::new(playlist)),
            template: RwLock::new(Arc::new(template)),
            min_playlist_size: 0,
        }
    }

    /// Warn on load/reload when the playlist holds fewer entries than this
    pub fn with_min_playlist_size(mut self, min_playlist_size: usize) -> Self {
        self.min_playlist_size = min_playlist_size;
        let len = self.playlist.get_mut().len();
        self.check_min_size(len);
        self
    }

    pub async fn snapshot(&self) -> Arc<PlaylistCollection> {
        self.playlist.read().await.clone()
    }

    pub async fn template(&self) -> Arc<RenderTemplate> {
        self.template.read().await.clone()
    }

    /// Current raw cursor value (not reduced modulo the playlist length)
    pub async fn position(&self) -> usize {
        *self.cursor.lock().await
    }

    /// Re-read the template file and swap it in whole.
    pub async fn reload_template(&self) -> Arc<RenderTemplate> {
        let template = Arc::new(self.templates.load());
        *self.template.write().await = template.clone();
        tracing::info!(path = %self.templates.path().display(), "Embed template reloaded");
        template
    }

    fn check_min_size(&self, len: usize) {
        if len < self.min_playlist_size {
            tracing::warn!(
                entries = len,
                min_playlist_size = self.min_playlist_size,
                "Playlist is below the minimum size"
            );
        }
    }
}
