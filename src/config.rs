//! Startup configuration from flags and environment

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "playlist-broadcaster")]
#[command(about = "Broadcasts a rotating Spotify playlist into a chat channel", long_about = None)]
pub struct BotConfig {
    /// Channel that receives scheduled broadcasts
    #[arg(long, env = "DISCORD_CHANNEL_ID")]
    pub channel_id: u64,

    /// Webhook to post to; messages are only logged when unset
    #[arg(long, env = "DISCORD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    #[arg(long, env = "PLAYLIST_FILE", default_value = "playlist.txt")]
    pub playlist_file: PathBuf,

    #[arg(long, env = "STATE_FILE", default_value = "state.json")]
    pub state_file: PathBuf,

    #[arg(long, env = "FAVORITES_FILE", default_value = "favorites.txt")]
    pub favorites_file: PathBuf,

    #[arg(long, env = "EMBED_TEMPLATE_FILE", default_value = "embed_template.json")]
    pub template_file: PathBuf,

    /// Minutes between scheduled broadcasts
    #[arg(
        long,
        env = "SCHEDULE_INTERVAL_MINUTES",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_minutes: u64,

    /// Warn when the playlist holds fewer entries than this
    #[arg(long, env = "MIN_PLAYLIST_SIZE", default_value_t = 200)]
    pub min_playlist_size: usize,

    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub spotify_client_id: Option<String>,

    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,

    /// Upper bound for one metadata resolution, in seconds
    #[arg(long, env = "METADATA_TIMEOUT_SECS", default_value_t = 10)]
    pub metadata_timeout_secs: u64,

    /// Prefix placed in front of scheduled broadcasts
    #[arg(long, env = "ANNOUNCE_MENTION", default_value = "@everyone")]
    pub announce_mention: String,

    #[arg(long, env = "LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,
}

impl BotConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }
}
