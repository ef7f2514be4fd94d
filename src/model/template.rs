//! Embed layout template, loaded from JSON and swapped whole on reload

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_COLOR: &str = "#1DB954";

/// Extra field appended to every rendered embed
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Formatting rules mapping a metadata record to a display payload.
///
/// Missing keys take their defaults and unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderTemplate {
    pub title_format: String,
    pub description_format: String,
    pub color: String,
    pub footer: String,
    pub show_thumbnail: bool,
    pub additional_fields: Vec<TemplateField>,
}

impl Default for RenderTemplate {
    fn default() -> Self {
        Self {
            title_format: "{title}".to_string(),
            description_format: "{author}".to_string(),
            color: DEFAULT_COLOR.to_string(),
            footer: "Sent by MusicBot".to_string(),
            show_thumbnail: true,
            additional_fields: Vec::new(),
        }
    }
}

/// Loads [`RenderTemplate`] from a JSON file
#[derive(Clone, Debug)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the template; a missing or invalid file yields the default layout.
    pub fn load(&self) -> RenderTemplate {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Embed template not found, using default");
                return RenderTemplate::default();
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read embed template, using default");
                return RenderTemplate::default();
            }
        };

        match serde_json::from_str::<RenderTemplate>(&content) {
            Ok(template) => {
                tracing::info!(path = %self.path.display(), "Embed template loaded");
                template
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Invalid embed template, using default");
                RenderTemplate::default()
            }
        }
    }
}
