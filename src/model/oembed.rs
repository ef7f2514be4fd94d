//! Spotify oEmbed client, the primary metadata provider

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use super::resolver::{EmbedProvider, EmbedResponse, DEFAULT_RESOLVE_TIMEOUT};

pub const OEMBED_ENDPOINT: &str = "https://open.spotify.com/oembed";

/// Unauthenticated oEmbed lookups against open.spotify.com
#[derive(Clone, Debug)]
pub struct OEmbedClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OEmbedClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_RESOLVE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: OEMBED_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl EmbedProvider for OEmbedClient {
    async fn fetch(&self, link: &str) -> Result<EmbedResponse, ProviderError> {
        tracing::debug!(link, "API: oembed");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", link)])
            .send()
            .await
            .map_err(|e| if e.is_timeout() { ProviderError::Timeout } else { e.into() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let raw: serde_json::Value = response.json().await?;
        Ok(EmbedResponse::from_json(raw))
    }
}
