//! Core type definitions shared across the model, view and controller

use std::sync::Arc;

use serde::Serialize;

/// A single link from the playlist source, with the section it was listed under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkEntry {
    pub link: String,
    pub section: Option<String>,
}

impl LinkEntry {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            section: None,
        }
    }

    pub fn with_section(link: impl Into<String>, section: Option<String>) -> Self {
        Self {
            link: link.into(),
            section,
        }
    }
}

/// Ordered, immutable set of playlist entries in file order.
///
/// Replaced wholesale on reload; never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistCollection {
    entries: Arc<[LinkEntry]>,
}

impl PlaylistCollection {
    pub fn new(entries: Vec<LinkEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn from_links<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(links.into_iter().map(LinkEntry::new).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LinkEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }
}

/// Render-ready metadata for one link, resolved fresh on every request
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataRecord {
    pub title: String,
    pub artist: String,
    pub thumbnail_url: Option<String>,
    /// Raw primary-provider payload, available to template placeholders
    pub raw: serde_json::Value,
}

/// A name/value field shown in a display payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Structured display payload produced by the renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub footer: Option<String>,
    pub fields: Vec<EmbedField>,
}
