//! View module - turning model data into chat output
//!
//! - `embed`: Metadata record + template → display payload
//! - `listing`: Plain-text replies (playlist, search, favorites, stats)

pub mod embed;
pub mod listing;

pub use embed::{format_pattern, parse_color, render, FALLBACK_COLOR};
