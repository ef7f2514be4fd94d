//! Renders metadata records into embed payloads.
//!
//! Rendering is pure: identical inputs always produce identical payloads.

use crate::model::{DisplayPayload, EmbedField, MetadataRecord, RenderTemplate};

pub const FALLBACK_COLOR: u32 = 0x1DB954;
pub const PLATFORM_URL: &str = "https://open.spotify.com";

pub fn render(metadata: &MetadataRecord, link: &str, template: &RenderTemplate) -> DisplayPayload {
    let fill = |pattern: &str| format_pattern(pattern, metadata, link);

    let thumbnail = if template.show_thumbnail {
        metadata.thumbnail_url.clone()
    } else {
        None
    };

    let mut fields: Vec<EmbedField> = template
        .additional_fields
        .iter()
        .map(|f| EmbedField::new(fill(&f.name), fill(&f.value), f.inline))
        .collect();
    fields.extend(fixed_fields(link));

    DisplayPayload {
        title: fill(&template.title_format),
        url: link.to_string(),
        description: fill(&template.description_format),
        color: parse_color(&template.color),
        image: thumbnail.clone(),
        thumbnail,
        footer: (!template.footer.is_empty()).then(|| template.footer.clone()),
        fields,
    }
}

fn fixed_fields(link: &str) -> [EmbedField; 3] {
    [
        EmbedField::new("🎧 Platform", format!("[Listen on Spotify]({})", PLATFORM_URL), true),
        EmbedField::new("📌 Direct link", format!("[Click here]({})", link), true),
        EmbedField::new("⭐ Status", "▶️ Now playing", true),
    ]
}

/// Parse `#RRGGBB` (or `RRGGBB`, `0xRRGGBB`); anything else yields the fallback.
pub fn parse_color(color: &str) -> u32 {
    let hex = color.trim().trim_start_matches('#');
    let hex = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);

    // from_str_radix alone would accept a leading sign
    if hex.is_empty() || hex.len() > 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return FALLBACK_COLOR;
    }
    u32::from_str_radix(hex, 16).unwrap_or(FALLBACK_COLOR)
}

/// Substitute `{title}`, `{author}` and `{link}` in a pattern.
///
/// Other `{key}` placeholders are looked up in the raw provider payload and
/// left untouched when absent. `{{` and `}}` produce literal braces.
pub fn format_pattern(pattern: &str, metadata: &MetadataRecord, link: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        match tail[1..].find('}') {
            Some(end) => {
                let key = &tail[1..=end];
                match lookup(key, metadata, link) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&tail[..end + 2]),
                }
                rest = &tail[end + 2..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(key: &str, metadata: &MetadataRecord, link: &str) -> Option<String> {
    match key {
        "title" => Some(metadata.title.clone()),
        "author" => Some(metadata.artist.clone()),
        "link" => Some(link.to_string()),
        other => match metadata.raw.get(other)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        },
    }
}
