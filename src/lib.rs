//! Broadcasts a rotating playlist of Spotify links into a chat channel.
//!
//! - `model`: Playlist, cursor, favorites and template persistence plus
//!   metadata providers
//! - `view`: Embed rendering and plain-text listings
//! - `controller`: Playback navigation, scheduled broadcasts and commands
//! - `delivery`: Outgoing message shape and delivery sinks

pub mod config;
pub mod controller;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod model;
pub mod view;
