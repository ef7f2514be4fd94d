//! Periodic broadcast of the next playlist entry

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::delivery::{ChannelId, DeliverySink, OutgoingMessage};
use crate::error::PlaybackError;
use crate::model::MetadataResolver;
use crate::view::listing::EMPTY_PLAYLIST_BROADCAST;

use super::present::{present, Presentation};
use super::PlaybackController;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);
pub const MIN_INTERVAL: Duration = Duration::from_secs(60);

/// What a single tick did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Broadcast { link: String, embedded: bool },
    EmptyPlaylist,
}

/// Handle for a running broadcast loop
pub struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

/// Fires a broadcast on a fixed interval
#[derive(Clone)]
pub struct Scheduler {
    controller: Arc<PlaybackController>,
    resolver: Arc<MetadataResolver>,
    sink: Arc<dyn DeliverySink>,
    channel: ChannelId,
    interval: Duration,
    mention: String,
    running: Arc<Mutex<Option<SchedulerHandle>>>,
}

impl Scheduler {
    pub fn new(
        controller: Arc<PlaybackController>,
        resolver: Arc<MetadataResolver>,
        sink: Arc<dyn DeliverySink>,
        channel: ChannelId,
    ) -> Self {
        Self {
            controller,
            resolver,
            sink,
            channel,
            interval: DEFAULT_INTERVAL,
            mention: "@everyone".to_string(),
            running: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn with_mention(mut self, mention: impl Into<String>) -> Self {
        self.mention = mention.into();
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn is_running(&self) -> bool {
        matches!(&*self.running.lock().await, Some(handle) if !handle.task.is_finished())
    }

    /// Start the loop. Returns false when it was already running.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if let Some(handle) = running.as_ref() {
            if !handle.task.is_finished() {
                tracing::debug!("Scheduler already running");
                return false;
            }
        }

        // Channel used by stop() to end the loop
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let scheduler = self.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            // First tick fires immediately; late ticks are dropped, not bursted
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::debug!("Scheduler shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        // Tick failures are logged only, the loop keeps going
                        match scheduler.run_tick().await {
                            Ok(TickOutcome::Broadcast { link, embedded }) => {
                                tracing::info!(link = %link, embedded, "Scheduled broadcast sent")
                            }
                            Ok(TickOutcome::EmptyPlaylist) => {
                                tracing::warn!("Scheduled broadcast skipped: playlist is empty")
                            }
                            Err(e) => tracing::error!(error = ?e, "Scheduled broadcast failed"),
                        }
                    }
                }
            }
        });

        *running = Some(SchedulerHandle { shutdown_tx, task });
        tracing::info!(
            channel = %self.channel,
            interval_secs = period.as_secs(),
            "Scheduler started"
        );
        true
    }

    /// Stop the loop and wait for an in-flight tick to finish.
    pub async fn stop(&self) {
        let handle = self.running.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.shutdown_tx.send(()).await;
            if let Err(e) = handle.task.await {
                tracing::warn!(error = %e, "Scheduler task ended abnormally");
            }
            tracing::info!("Scheduler stopped");
        }
    }

    /// One broadcast: advance the cursor (persisted first), resolve, render, deliver.
    pub async fn run_tick(&self) -> Result<TickOutcome> {
        // Cursor is advanced and persisted before anything is delivered
        let entry = match self.controller.current_and_advance().await {
            Ok(entry) => entry,
            Err(PlaybackError::Empty) => {
                self.sink
                    .deliver(self.channel, OutgoingMessage::text(EMPTY_PLAYLIST_BROADCAST))
                    .await
                    .context("Failed to deliver empty-playlist notice")?;
                return Ok(TickOutcome::EmptyPlaylist);
            }
            Err(e) => return Err(e.into()),
        };

        let template = self.controller.template().await;
        let headline = format!("{} 🎉 **New track just dropped!** 🎵", self.mention);
        let fallback_prefix = format!("{} 🎉", self.mention);
        let presentation = Presentation {
            headline: headline.trim_start(),
            fallback_prefix: fallback_prefix.trim_start(),
            with_actions: true,
        };

        // Falls back to the plain link when metadata is unavailable
        let message = present(&self.resolver, &template, &entry.link, &presentation).await;
        let embedded = message.embed.is_some();

        self.sink
            .deliver(self.channel, message)
            .await
            .with_context(|| format!("Failed to deliver {}", entry.link))?;

        Ok(TickOutcome::Broadcast {
            link: entry.link,
            embedded,
        })
    }
}
