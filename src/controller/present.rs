//! Composition of a chat message for one playlist link

use crate::delivery::{ActionButton, OutgoingMessage};
use crate::model::{MetadataResolver, RenderTemplate};
use crate::view;

/// How a link should be introduced, with and without an embed
pub struct Presentation<'a> {
    /// Content shown above the embed
    pub headline: &'a str,
    /// Prefix placed before the bare link when metadata is unavailable
    pub fallback_prefix: &'a str,
    pub with_actions: bool,
}

/// Resolve metadata and render an embed for `link`.
///
/// When the primary provider fails the result is the plain link text with
/// no embed.
pub async fn present(
    resolver: &MetadataResolver,
    template: &RenderTemplate,
    link: &str,
    presentation: &Presentation<'_>,
) -> OutgoingMessage {
    match resolver.resolve(link).await {
        Some(metadata) => {
            let embed = view::render(&metadata, link, template);
            let actions = if presentation.with_actions {
                ActionButton::row_for(link)
            } else {
                Vec::new()
            };
            OutgoingMessage::embed(presentation.headline, embed, actions)
        }
        None => OutgoingMessage::text(join_words(presentation.fallback_prefix, link)),
    }
}

fn join_words(prefix: &str, link: &str) -> String {
    if prefix.is_empty() {
        link.to_string()
    } else {
        format!("{} {}", prefix, link)
    }
}
