//! Authenticated Spotify Web API lookups, the optional secondary provider

use std::sync::Arc;

use async_trait::async_trait;
use rspotify::{
    model::TrackId,
    prelude::*,
    ClientCredsSpotify, Credentials,
};
use tokio::sync::OnceCell;

use crate::error::ProviderError;
use super::resolver::{CatalogProvider, CatalogTrack};

/// Spotify catalog client using the client-credentials flow
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<ClientCredsSpotify>,
    token_ready: Arc<OnceCell<()>>,
}

impl SpotifyClient {
    /// Build a client when both credentials are present and non-empty.
    pub fn from_credentials(client_id: Option<&str>, client_secret: Option<&str>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Self::new(Credentials::new(id, secret)))
            }
            _ => None,
        }
    }

    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: Arc::new(ClientCredsSpotify::new(credentials)),
            token_ready: Arc::new(OnceCell::new()),
        }
    }

    async fn ensure_token(&self) -> Result<(), ProviderError> {
        self.token_ready
            .get_or_try_init(|| async {
                tracing::debug!("API: request_token");
                self.client
                    .request_token()
                    .await
                    .map_err(|e| ProviderError::Catalog(e.to_string()))?;
                tracing::info!("Spotify client-credentials token acquired");
                Ok::<(), ProviderError>(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for SpotifyClient {
    async fn track(&self, track_id: &str) -> Result<CatalogTrack, ProviderError> {
        let id = TrackId::from_id(track_id)
            .map_err(|e| ProviderError::InvalidId(format!("{}: {}", track_id, e)))?;

        self.ensure_token().await?;

        tracing::debug!(track_id, "API: track");
        let track = self
            .client
            .track(id, None)
            .await
            .map_err(|e| ProviderError::Catalog(e.to_string()))?;

        Ok(CatalogTrack {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            artwork_url: track.album.images.into_iter().next().map(|i| i.url),
        })
    }
}
