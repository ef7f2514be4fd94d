//! Metadata resolution over the provider chain.
//!
//! The primary embed provider is required: without its response there is
//! nothing to render. The authenticated catalog provider is optional and only
//! enriches title and artist names; its failures are absorbed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ProviderError;
use crate::log_provider_result;
use super::types::MetadataRecord;

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);
pub const UNKNOWN_ARTIST: &str = "unknown";
pub const UNTITLED: &str = "Untitled track";

/// Response from the primary embed provider
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmbedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub raw: serde_json::Value,
}

impl EmbedResponse {
    pub fn from_json(raw: serde_json::Value) -> Self {
        let text = |key: &str| {
            raw.get(key)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            title: text("title"),
            author_name: text("author_name"),
            thumbnail_url: text("thumbnail_url"),
            raw,
        }
    }
}

/// Track details from the authenticated catalog provider
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub artwork_url: Option<String>,
}

/// Unauthenticated, embed-style metadata provider
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    async fn fetch(&self, link: &str) -> Result<EmbedResponse, ProviderError>;
}

/// Authenticated catalog provider keyed by content identifier
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn track(&self, track_id: &str) -> Result<CatalogTrack, ProviderError>;
}

/// Resolves a link to a [`MetadataRecord`] using the provider chain
#[derive(Clone)]
pub struct MetadataResolver {
    primary: Arc<dyn EmbedProvider>,
    secondary: Option<Arc<dyn CatalogProvider>>,
    timeout: Duration,
}

impl MetadataResolver {
    pub fn new(primary: Arc<dyn EmbedProvider>, secondary: Option<Arc<dyn CatalogProvider>>) -> Self {
        Self {
            primary,
            secondary,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_catalog(&self) -> bool {
        self.secondary.is_some()
    }

    /// Resolve a link. `None` means the primary provider failed or timed out.
    ///
    /// Both provider calls share one deadline. A catalog call cut off by the
    /// deadline degrades to embed-only fields.
    pub async fn resolve(&self, link: &str) -> Option<MetadataRecord> {
        let deadline = Instant::now() + self.timeout;
        let track_id = extract_track_id(link);

        let result = match tokio::time::timeout_at(deadline, self.primary.fetch(link)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };
        log_provider_result!("embed", result);
        let embed = match result {
            Ok(embed) => embed,
            Err(e) => {
                tracing::warn!(link, error = %e, "Primary metadata provider unavailable");
                return None;
            }
        };

        // Only a recognizable track id is worth a catalog round trip
        let catalog = match (&track_id, &self.secondary) {
            (Some(id), Some(secondary)) => {
                let result = match tokio::time::timeout_at(deadline, secondary.track(id)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout),
                };
                log_provider_result!("catalog", result);
                match result {
                    Ok(track) => Some(track),
                    Err(e) => {
                        tracing::debug!(link, track_id = %id, error = %e, "Catalog lookup failed, using embed fields only");
                        None
                    }
                }
            }
            _ => None,
        };

        Some(merge(embed, catalog))
    }
}

/// Combine provider responses; catalog fields win when both are present.
pub fn merge(embed: EmbedResponse, catalog: Option<CatalogTrack>) -> MetadataRecord {
    let (catalog_title, catalog_artist, catalog_art) = match catalog {
        Some(track) => {
            let artist = (!track.artists.is_empty()).then(|| track.artists.join(", "));
            let title = (!track.name.is_empty()).then_some(track.name);
            (title, artist, track.artwork_url)
        }
        None => (None, None, None),
    };

    MetadataRecord {
        title: catalog_title
            .or(embed.title)
            .unwrap_or_else(|| UNTITLED.to_string()),
        artist: catalog_artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        thumbnail_url: catalog_art.or(embed.thumbnail_url),
        raw: embed.raw,
    }
}

/// Extract the track id from an `open.spotify.com/.../track/<id>` link.
pub fn extract_track_id(link: &str) -> Option<String> {
    let (_, path) = link.split_once("spotify.com/")?;
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == "track")?;
    let id = segments.next()?;
    id.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then(|| id.to_string())
}
