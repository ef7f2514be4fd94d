use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use playlist_broadcaster::config::BotConfig;
use playlist_broadcaster::controller::{CommandSurface, PlaybackController, Scheduler};
use playlist_broadcaster::delivery::{ChannelId, DeliverySink, LogSink, WebhookSink};
use playlist_broadcaster::logging;
use playlist_broadcaster::model::{
    CatalogProvider, CursorStore, FavoritesLog, LinkStore, MetadataResolver, OEmbedClient, SpotifyClient,
    TemplateStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BotConfig::parse();

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== Playlist Broadcaster Starting ===");

    // Step 1: Load playlist, template and saved cursor
    let controller = Arc::new(
        PlaybackController::new(
            LinkStore::new(&config.playlist_file),
            CursorStore::new(&config.state_file),
            TemplateStore::new(&config.template_file),
        )
        .with_min_playlist_size(config.min_playlist_size),
    );

    // Step 2: Metadata providers and delivery sink
    let resolver = Arc::new(build_resolver(&config)?);
    let sink = build_sink(&config)?;
    let channel = ChannelId(config.channel_id);

    // Step 3: Scheduled broadcasts and the command surface share one controller
    let scheduler = Scheduler::new(controller.clone(), resolver.clone(), sink.clone(), channel)
        .with_interval(config.interval())
        .with_mention(config.announce_mention.clone());

    let surface = CommandSurface::new(
        controller.clone(),
        resolver.clone(),
        FavoritesLog::new(&config.favorites_file),
    )
    .with_scheduler(scheduler.clone());

    scheduler.start().await;

    // Step 4: Console commands until Ctrl-C
    let res = run_console(&surface, sink.as_ref(), channel).await;

    scheduler.stop().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Console error");
    }

    tracing::info!("Playlist Broadcaster shutting down");
    Ok(())
}

fn build_resolver(config: &BotConfig) -> Result<MetadataResolver> {
    let primary = OEmbedClient::with_timeout(config.metadata_timeout())
        .context("Failed to create oEmbed client")?;

    let secondary = SpotifyClient::from_credentials(
        config.spotify_client_id.as_deref(),
        config.spotify_client_secret.as_deref(),
    )
    .map(|client| Arc::new(client) as Arc<dyn CatalogProvider>);

    let resolver = MetadataResolver::new(Arc::new(primary), secondary).with_timeout(config.metadata_timeout());
    if resolver.has_catalog() {
        tracing::info!("Spotify catalog lookups enabled");
    } else {
        tracing::info!("Spotify credentials not set, using oEmbed metadata only");
    }
    Ok(resolver)
}

fn build_sink(config: &BotConfig) -> Result<Arc<dyn DeliverySink>> {
    match &config.webhook_url {
        Some(url) if !url.trim().is_empty() => {
            tracing::info!("Delivering broadcasts via webhook");
            Ok(Arc::new(WebhookSink::new(url.trim())?))
        }
        _ => {
            tracing::warn!("No webhook configured, broadcasts are only logged");
            Ok(Arc::new(LogSink))
        }
    }
}

/// Read commands from stdin until Ctrl-C.
///
/// Ephemeral replies are printed; everything else goes to the channel. A
/// closed stdin (running detached) leaves the scheduler running.
async fn run_console(surface: &CommandSurface, sink: &dyn DeliverySink, channel: ChannelId) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received");
                break;
            }
            line = lines.next_line() => line.context("Failed to read stdin")?,
        };

        let Some(line) = line else {
            tracing::info!("stdin closed, broadcasting until Ctrl-C");
            tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = surface.handle_text(&line).await;
        if reply.ephemeral {
            println!("{}", reply.content);
        } else if let Err(e) = sink.deliver(channel, reply).await {
            tracing::error!(error = ?e, "Failed to deliver command reply");
        }
    }

    Ok(())
}
