//! Delivery contract towards the chat platform

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::model::DisplayPayload;

/// Numeric identifier of the target chat channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interactive actions attached to a broadcast
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionTag {
    Listen,
    Next,
    Previous,
    Favorite,
    ShowPlaylist,
    Stats,
}

impl ActionTag {
    pub const ALL: [ActionTag; 6] = [
        ActionTag::Listen,
        ActionTag::Next,
        ActionTag::Previous,
        ActionTag::Favorite,
        ActionTag::ShowPlaylist,
        ActionTag::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Listen => "listen",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Favorite => "favorite",
            Self::ShowPlaylist => "playlist",
            Self::Stats => "stats",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Listen => "🎵 Listen on Spotify",
            Self::Next => "⏭️ Next",
            Self::Previous => "⏮️ Previous",
            Self::Favorite => "❤️ Favorite",
            Self::ShowPlaylist => "📋 View playlist",
            Self::Stats => "📊 Stats",
        }
    }
}

/// A button carrying its action and link; holds no behavior of its own
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionButton {
    pub tag: ActionTag,
    pub link: String,
}

impl ActionButton {
    pub fn new(tag: ActionTag, link: impl Into<String>) -> Self {
        Self {
            tag,
            link: link.into(),
        }
    }

    /// Full action row for a broadcast of `link`
    pub fn row_for(link: &str) -> Vec<Self> {
        ActionTag::ALL.into_iter().map(|tag| Self::new(tag, link)).collect()
    }

    /// Encoded as `"<tag>|<link>"`
    pub fn custom_id(&self) -> String {
        format!("{}|{}", self.tag.as_str(), self.link)
    }

    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        let (tag, link) = custom_id.split_once('|')?;
        Some(Self::new(ActionTag::parse(tag)?, link))
    }
}

/// A message ready for delivery
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: String,
    pub embed: Option<DisplayPayload>,
    pub actions: Vec<ActionButton>,
    /// Visible only to the user who triggered it
    pub ephemeral: bool,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
            ..Self::default()
        }
    }

    pub fn embed(content: impl Into<String>, embed: DisplayPayload, actions: Vec<ActionButton>) -> Self {
        Self {
            content: content.into(),
            embed: Some(embed),
            actions,
            ephemeral: false,
        }
    }
}

/// Sink that delivers messages to a chat channel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, channel: ChannelId, message: OutgoingMessage) -> Result<()>;
}

/// Posts messages to a Discord webhook
#[derive(Clone, Debug)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DeliverySink for WebhookSink {
    async fn deliver(&self, channel: ChannelId, message: OutgoingMessage) -> Result<()> {
        if !message.actions.is_empty() {
            tracing::debug!(
                actions = message.actions.len(),
                "Webhook messages cannot carry buttons, dropping actions"
            );
        }

        let body = webhook_body(&message);
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("Webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Webhook returned status {}", status);
        }
        tracing::debug!(%channel, "Message delivered via webhook");
        Ok(())
    }
}

/// Discord webhook execute body for a message
pub fn webhook_body(message: &OutgoingMessage) -> Value {
    let mut body = json!({ "content": message.content });
    if let Some(embed) = &message.embed {
        body["embeds"] = json!([embed_json(embed)]);
    }
    body
}

fn embed_json(embed: &DisplayPayload) -> Value {
    let mut value = json!({
        "title": embed.title,
        "url": embed.url,
        "description": embed.description,
        "color": embed.color,
        "fields": embed.fields,
    });
    if let Some(url) = &embed.thumbnail {
        value["thumbnail"] = json!({ "url": url });
    }
    if let Some(url) = &embed.image {
        value["image"] = json!({ "url": url });
    }
    if let Some(text) = &embed.footer {
        value["footer"] = json!({ "text": text });
    }
    value
}

/// Writes messages to the log; used when no webhook is configured
#[derive(Clone, Debug, Default)]
pub struct LogSink;

#[async_trait]
impl DeliverySink for LogSink {
    async fn deliver(&self, channel: ChannelId, message: OutgoingMessage) -> Result<()> {
        match &message.embed {
            Some(embed) => tracing::info!(
                %channel,
                content = %message.content,
                title = %embed.title,
                description = %embed.description,
                url = %embed.url,
                "Broadcast"
            ),
            None => tracing::info!(%channel, content = %message.content, "Broadcast"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmbedField;

    #[test]
    fn custom_ids_map_back_to_actions() {
        let link = "https://open.spotify.com/track/abc?si=x|y";
        for button in ActionButton::row_for(link) {
            let parsed = ActionButton::from_custom_id(&button.custom_id()).unwrap();
            assert_eq!(parsed, button);
        }
        assert_eq!(ActionButton::from_custom_id("unknown|x"), None);
        assert_eq!(ActionButton::from_custom_id("next"), None);
    }

    #[test]
    fn webhook_body_includes_embed_parts() {
        let embed = DisplayPayload {
            title: "T".to_string(),
            url: "https://l".to_string(),
            description: "D".to_string(),
            color: 0x1DB954,
            thumbnail: Some("https://img".to_string()),
            image: None,
            footer: Some("F".to_string()),
            fields: vec![EmbedField::new("n", "v", true)],
        };
        let body = webhook_body(&OutgoingMessage::embed("hi", embed, Vec::new()));

        assert_eq!(body["content"], "hi");
        assert_eq!(body["embeds"][0]["color"], 0x1DB954);
        assert_eq!(body["embeds"][0]["thumbnail"]["url"], "https://img");
        assert_eq!(body["embeds"][0]["footer"]["text"], "F");
        assert_eq!(body["embeds"][0]["fields"][0]["inline"], true);
        assert!(body["embeds"][0].get("image").is_none());
    }

    #[test]
    fn plain_text_body_has_no_embeds() {
        let body = webhook_body(&OutgoingMessage::text("https://l"));
        assert!(body.get("embeds").is_none());
    }
}
