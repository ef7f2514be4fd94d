//! Model module - Playlist data, persisted state and metadata providers
//!
//! - `types`: Core type definitions (entries, collections, metadata, payloads)
//! - `link_store`: Playlist file loading
//! - `cursor_store`: Persisted playlist position
//! - `favorites`: Append-only favorites log
//! - `template`: Embed layout template
//! - `resolver`: Provider chain producing metadata records
//! - `oembed`: Primary (unauthenticated) provider
//! - `spotify_client`: Secondary (authenticated) provider

mod types;
mod link_store;
mod cursor_store;
mod favorites;
mod template;
mod resolver;
mod oembed;
mod spotify_client;

pub use types::{DisplayPayload, EmbedField, LinkEntry, MetadataRecord, PlaylistCollection};

pub use link_store::{parse_playlist, LinkStore};
pub use cursor_store::CursorStore;
pub use favorites::FavoritesLog;
pub use template::{RenderTemplate, TemplateField, TemplateStore, DEFAULT_COLOR};

pub use resolver::{
    extract_track_id, CatalogProvider, CatalogTrack, EmbedProvider, EmbedResponse,
    MetadataResolver, DEFAULT_RESOLVE_TIMEOUT, UNKNOWN_ARTIST,
};
pub use oembed::{OEmbedClient, OEMBED_ENDPOINT};
pub use spotify_client::SpotifyClient;
