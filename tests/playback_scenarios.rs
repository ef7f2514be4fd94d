//! End-to-end scenarios through the public library API

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use playlist_broadcaster::controller::{Command, CommandSurface, PlaybackController, Scheduler, TickOutcome};
use playlist_broadcaster::delivery::{ChannelId, DeliverySink, OutgoingMessage};
use playlist_broadcaster::error::ProviderError;
use playlist_broadcaster::model::{
    CatalogProvider, CatalogTrack, CursorStore, EmbedProvider, EmbedResponse, FavoritesLog, LinkStore,
    MetadataResolver, TemplateStore,
};

struct StaticEmbed;

#[async_trait]
impl EmbedProvider for StaticEmbed {
    async fn fetch(&self, link: &str) -> Result<EmbedResponse, ProviderError> {
        Ok(EmbedResponse::from_json(serde_json::json!({
            "title": format!("oEmbed {}", link),
            "thumbnail_url": "https://i.scdn.co/image/small",
        })))
    }
}

struct StaticCatalog;

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn track(&self, track_id: &str) -> Result<CatalogTrack, ProviderError> {
        Ok(CatalogTrack {
            name: format!("Song {}", track_id),
            artists: vec!["Ana".to_string(), "Bia".to_string()],
            artwork_url: Some("https://i.scdn.co/image/large".to_string()),
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<OutgoingMessage>>,
}

#[async_trait]
impl DeliverySink for RecordingSink {
    async fn deliver(&self, _channel: ChannelId, message: OutgoingMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

fn controller(dir: &Path) -> Arc<PlaybackController> {
    Arc::new(PlaybackController::new(
        LinkStore::new(dir.join("playlist.txt")),
        CursorStore::new(dir.join("state.json")),
        TemplateStore::new(dir.join("embed_template.json")),
    ))
}

fn write_playlist(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("playlist.txt"), content).unwrap();
}

#[tokio::test]
async fn cursor_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    write_playlist(&dir, "https://a\nhttps://b\nhttps://c\n");

    let first = controller(dir.path());
    assert_eq!(first.current_and_advance().await.unwrap().link, "https://a");
    assert_eq!(first.current_and_advance().await.unwrap().link, "https://b");
    drop(first);

    let restarted = controller(dir.path());
    assert_eq!(restarted.current_and_advance().await.unwrap().link, "https://c");
    assert_eq!(restarted.current_and_advance().await.unwrap().link, "https://a");
}

#[tokio::test]
async fn scheduled_broadcast_uses_catalog_metadata_and_template() {
    let dir = tempfile::tempdir().unwrap();
    write_playlist(
        &dir,
        "# Chill\nhttps://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=x\n",
    );
    fs::write(
        dir.path().join("embed_template.json"),
        r##"{"title_format": "🎵 {title}", "description_format": "by {author}", "color": "#FF0000", "footer": ""}"##,
    )
    .unwrap();

    let resolver = Arc::new(MetadataResolver::new(Arc::new(StaticEmbed), Some(Arc::new(StaticCatalog))));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = Scheduler::new(controller(dir.path()), resolver, sink.clone(), ChannelId(99))
        .with_mention("@here");

    let outcome = scheduler.run_tick().await.unwrap();
    assert!(matches!(outcome, TickOutcome::Broadcast { embedded: true, .. }));

    let messages = sink.messages.lock().unwrap();
    let message = &messages[0];
    assert_eq!(message.content, "@here 🎉 **New track just dropped!** 🎵");
    let embed = message.embed.as_ref().unwrap();
    assert_eq!(embed.title, "🎵 Song 4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(embed.description, "by Ana, Bia");
    assert_eq!(embed.color, 0xFF0000);
    assert_eq!(embed.thumbnail.as_deref(), Some("https://i.scdn.co/image/large"));
    assert_eq!(embed.footer, None);
    assert_eq!(embed.fields.len(), 3);
}

#[tokio::test]
async fn buttons_drive_the_same_cursor_as_the_scheduler() {
    let dir = tempfile::tempdir().unwrap();
    write_playlist(&dir, "https://a\nhttps://b\nhttps://c\n");

    let controller = controller(dir.path());
    let resolver = Arc::new(MetadataResolver::new(Arc::new(StaticEmbed), None));
    let sink = Arc::new(RecordingSink::default());
    let scheduler = Scheduler::new(controller.clone(), resolver.clone(), sink.clone(), ChannelId(1));
    let surface = CommandSurface::new(controller.clone(), resolver, FavoritesLog::new(dir.path().join("favorites.txt")));

    scheduler.run_tick().await.unwrap();
    let broadcast = sink.messages.lock().unwrap()[0].clone();
    let next_button = broadcast
        .actions
        .iter()
        .find(|a| a.custom_id().starts_with("next|"))
        .unwrap();

    let reply = surface
        .dispatch(Command::from_custom_id(&next_button.custom_id()).unwrap())
        .await;
    assert_eq!(reply.embed.unwrap().url, "https://b");

    let favorite = broadcast
        .actions
        .iter()
        .find(|a| a.custom_id().starts_with("favorite|"))
        .unwrap();
    surface
        .dispatch(Command::from_custom_id(&favorite.custom_id()).unwrap())
        .await;
    assert_eq!(
        FavoritesLog::new(dir.path().join("favorites.txt")).list(),
        vec!["https://a".to_string()]
    );

    assert_eq!(CursorStore::new(dir.path().join("state.json")).load(), 2);
}

#[tokio::test]
async fn shrinking_reload_keeps_cursor_in_range() {
    let dir = tempfile::tempdir().unwrap();
    write_playlist(&dir, "https://a\nhttps://b\nhttps://c\nhttps://d\n");

    let controller = controller(dir.path());
    controller.jump_to(4).await.unwrap();

    write_playlist(&dir, "https://a\nhttps://b\n");
    assert_eq!(controller.reload().await, 2);
    // 3 mod 2
    assert_eq!(controller.current_and_advance().await.unwrap().link, "https://b");
}
