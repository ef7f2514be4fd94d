//! Command parsing and dispatch.
//!
//! A command maps onto exactly one controller/resolver/renderer sequence.
//! Button presses arrive as `"<tag>|<link>"` custom ids and map onto the same
//! commands, so no per-message state is kept.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::delivery::{ActionButton, ActionTag, OutgoingMessage};
use crate::error::{CommandParseError, PlaybackError};
use crate::model::{FavoritesLog, LinkEntry, MetadataResolver};
use crate::view::listing::{self, Stats};

use super::present::{present, Presentation};
use super::scheduler::DEFAULT_INTERVAL;
use super::{PlaybackController, Scheduler};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Next entry, or the entry matching a position/substring
    Play(Option<String>),
    /// Details for the current entry, or the one matching a query
    Info(Option<String>),
    Goto(i64),
    Back,
    Next,
    Search(String),
    Random,
    Refresh,
    ReloadLayout,
    Favorites,
    ClearFavorites,
    Favorite(String),
    Listen(String),
    Playlist,
    Stats,
    Help,
}

impl Command {
    /// Parse a text command; a leading `!` or `/` is optional.
    pub fn parse(input: &str) -> Result<Self, CommandParseError> {
        let input = input.trim();
        // Chat-style prefixes are optional
        let input = input
            .strip_prefix('!')
            .or_else(|| input.strip_prefix('/'))
            .unwrap_or(input);

        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };
        if name.is_empty() {
            return Err(CommandParseError::Empty);
        }
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name.to_lowercase().as_str() {
            "play" => Self::Play(argument),
            "info" => Self::Info(argument),
            "goto" => {
                let position = required(argument, "goto", "a position")?;
                let number = position
                    .parse::<i64>()
                    .map_err(|_| CommandParseError::InvalidNumber(position.clone()))?;
                Self::Goto(number)
            }
            "back" => Self::Back,
            "next" => Self::Next,
            "search" => Self::Search(required(argument, "search", "some text to look for")?),
            "random" => Self::Random,
            "refresh" => Self::Refresh,
            "reloadlayout" => Self::ReloadLayout,
            "favorites" => Self::Favorites,
            "clearfavs" => Self::ClearFavorites,
            "favorite" => Self::Favorite(required(argument, "favorite", "a link")?),
            "listen" => Self::Listen(required(argument, "listen", "a link")?),
            "playlist" => Self::Playlist,
            "stats" => Self::Stats,
            "help" => Self::Help,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }

    /// Map a button custom id back to the command it triggers
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        let button = ActionButton::from_custom_id(custom_id)?;
        Some(match button.tag {
            ActionTag::Listen => Self::Listen(button.link),
            ActionTag::Next => Self::Next,
            ActionTag::Previous => Self::Back,
            ActionTag::Favorite => Self::Favorite(button.link),
            ActionTag::ShowPlaylist => Self::Playlist,
            ActionTag::Stats => Self::Stats,
        })
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn required(
    argument: Option<String>,
    command: &'static str,
    what: &'static str,
) -> Result<String, CommandParseError> {
    argument.ok_or(CommandParseError::MissingArgument {
        command,
        argument: what,
    })
}

/// Entry point for user commands and button presses
pub struct CommandSurface {
    controller: Arc<PlaybackController>,
    resolver: Arc<MetadataResolver>,
    favorites: FavoritesLog,
    scheduler: Option<Scheduler>,
    interval_minutes: u64,
    started_at: DateTime<Utc>,
}

impl CommandSurface {
    pub fn new(
        controller: Arc<PlaybackController>,
        resolver: Arc<MetadataResolver>,
        favorites: FavoritesLog,
    ) -> Self {
        Self {
            controller,
            resolver,
            favorites,
            scheduler: None,
            interval_minutes: DEFAULT_INTERVAL.as_secs() / 60,
            started_at: Utc::now(),
        }
    }

    /// Report this scheduler's interval and state in stats
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.interval_minutes = scheduler.interval().as_secs() / 60;
        self.scheduler = Some(scheduler);
        self
    }

    /// Parse and dispatch a line of text
    pub async fn handle_text(&self, input: &str) -> OutgoingMessage {
        match Command::parse(input) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                tracing::debug!(input, error = %e, "Rejected command");
                OutgoingMessage::ephemeral(e.user_message())
            }
        }
    }

    /// Run one command. Playback failures become a short ephemeral reply.
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(&self, command: Command) -> OutgoingMessage {
        match self.run(command).await {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "Command failed");
                OutgoingMessage::ephemeral(e.user_message())
            }
        }
    }

    async fn run(&self, command: Command) -> Result<OutgoingMessage, PlaybackError> {
        let message = match command {
            // Moves the shared cursor, same as a scheduled tick
            Command::Play(None) | Command::Next => {
                let entry = self.controller.current_and_advance().await?;
                self.announce(&entry, "", "").await
            }
            Command::Play(Some(query)) => {
                let entry = self.controller.find_by_index_or_substring(&query).await?;
                self.announce(&entry, "", "").await
            }
            // Read-only lookup, no actions attached
            Command::Info(query) => {
                let entry = match query {
                    Some(query) => self.controller.find_by_index_or_substring(&query).await?,
                    None => self.controller.peek().await?,
                };
                let template = self.controller.template().await;
                let presentation = Presentation {
                    headline: "",
                    fallback_prefix: "❌ Could not fetch details for:",
                    with_actions: false,
                };
                present(&self.resolver, &template, &entry.link, &presentation).await
            }
            Command::Goto(position) => {
                let entry = self.controller.jump_to(position).await?;
                let headline = format!("⏭️ **Jumping to track #{}:**", position);
                self.announce(&entry, &headline, "⏭️ Jumping to:").await
            }
            Command::Back => {
                let entry = self.controller.current_and_rewind().await?;
                self.announce(&entry, "⏮️ **Going back to the previous track:**", "⏮️ Going back to:")
                    .await
            }
            Command::Random => {
                let entry = self.controller.random().await?;
                self.announce(&entry, "🎲 **Random track:**", "🎲").await
            }
            Command::Search(query) => {
                let matches = self.controller.search(&query).await;
                OutgoingMessage::ephemeral(listing::search_results(&query, &matches))
            }
            Command::Refresh => {
                let len = self.controller.reload().await;
                OutgoingMessage::text(format!("✅ Playlist reloaded. {} entries loaded.", len))
            }
            Command::ReloadLayout => {
                self.controller.reload_template().await;
                OutgoingMessage::text("✅ Embed layout reloaded.")
            }
            Command::Favorites => OutgoingMessage::text(listing::favorites_listing(&self.favorites.list())),
            Command::ClearFavorites => {
                self.favorites.clear();
                OutgoingMessage::text("✅ All favorites deleted!")
            }
            Command::Favorite(link) => {
                self.favorites.append(&link);
                let file = self
                    .favorites
                    .path()
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                OutgoingMessage::ephemeral(format!("✅ **Added to favorites!**\n💾 Saved to `{}`", file))
            }
            Command::Listen(link) => {
                OutgoingMessage::ephemeral(format!("🎧 [Click to listen on Spotify]({})", link))
            }
            Command::Playlist => {
                let playlist = self.controller.snapshot().await;
                if playlist.is_empty() {
                    return Err(PlaybackError::Empty);
                }
                OutgoingMessage::ephemeral(listing::playlist_overview(&playlist))
            }
            Command::Stats => OutgoingMessage::ephemeral(self.stats().await),
            Command::Help => OutgoingMessage::ephemeral(listing::help()),
        };
        Ok(message)
    }

    async fn announce(&self, entry: &LinkEntry, headline: &str, fallback_prefix: &str) -> OutgoingMessage {
        let template = self.controller.template().await;
        let presentation = Presentation {
            headline,
            fallback_prefix,
            with_actions: true,
        };
        present(&self.resolver, &template, &entry.link, &presentation).await
    }

    async fn stats(&self) -> String {
        let scheduler_running = match &self.scheduler {
            Some(scheduler) => scheduler.is_running().await,
            None => false,
        };
        let stats = Stats {
            playlist_len: self.controller.snapshot().await.len(),
            favorites: self.favorites.list().len(),
            interval_minutes: self.interval_minutes,
            scheduler_running,
            started_at: self.started_at,
        };
        listing::stats(&stats, Utc::now())
    }
}
