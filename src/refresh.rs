//! Background feed refresh
//!
//! Runs fetch → normalize → cache cycles on a fixed interval in a single tokio
//! task and sends the resulting snapshots to the UI over a channel. Cycles run
//! one after another, so the cache slot only ever has one writer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cache::{CacheEntry, CacheManager};
use crate::data::{normalize, NormalizedResponse, OrderRecord};
use crate::feed::{FeedClient, FeedError};

/// What the driver should show after a refresh cycle
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Fresh data from the feed
    Live(NormalizedResponse),
    /// The feed failed; this is the last good snapshot
    Cached { entry: CacheEntry, reason: String },
    /// The feed failed and no usable snapshot exists
    Unavailable { reason: String },
}

impl Snapshot {
    /// Orders to display
    pub fn records(&self) -> &[OrderRecord] {
        match self {
            Snapshot::Live(response) => &response.records,
            Snapshot::Cached { entry, .. } => &entry.records,
            Snapshot::Unavailable { .. } => &[],
        }
    }

    /// When the displayed data was produced
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Snapshot::Live(response) => Some(response.fetched_at),
            Snapshot::Cached { entry, .. } => Some(entry.written_at),
            Snapshot::Unavailable { .. } => None,
        }
    }

    /// Short origin label for the status line
    pub fn origin(&self) -> &'static str {
        match self {
            Snapshot::Live(response) if response.success => "live",
            Snapshot::Live(_) => "live (feed reported failure)",
            Snapshot::Cached { .. } => "cache",
            Snapshot::Unavailable { .. } => "unavailable",
        }
    }

    /// Why the feed could not be used, if it could not
    pub fn error(&self) -> Option<&str> {
        match self {
            Snapshot::Live(_) => None,
            Snapshot::Cached { reason, .. } | Snapshot::Unavailable { reason } => Some(reason.as_str()),
        }
    }
}

/// Turns one fetch outcome into a snapshot, updating or consulting the cache.
///
/// A successful response with at least one order replaces the cached
/// snapshot. A failed fetch falls back to the cache.
pub fn run_cycle(fetched: Result<Value, FeedError>, cache: &CacheManager) -> Snapshot {
    match fetched {
        Ok(raw) => {
            let response = normalize(&raw);
            if response.is_cacheable() {
                cache.store(&response.records);
            }
            info!(
                records = response.records.len(),
                success = response.success,
                source = %response.source,
                "Loaded orders from feed"
            );
            Snapshot::Live(response)
        }
        Err(e) => {
            let reason = e.to_string();
            warn!(error = %reason, "Feed fetch failed, trying cache");
            match cache.load() {
                Some(entry) => {
                    info!(records = entry.records.len(), "Loaded orders from cache");
                    Snapshot::Cached { entry, reason }
                }
                None => Snapshot::Unavailable { reason },
            }
        }
    }
}

/// Messages sent from background refresh to main app
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// Refresh started
    RefreshStarted,
    /// Refresh completed with this snapshot
    Completed(Snapshot),
}

/// Configuration for the refresh loop
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between polls
    pub interval: Duration,
    /// Whether auto-refresh is enabled; manual requests still work when off
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            enabled: true,
        }
    }
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Channel for manual refresh requests
    request_tx: mpsc::Sender<()>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the refresh task
    ///
    /// The first cycle runs immediately when auto-refresh is enabled.
    pub fn spawn(config: RefreshConfig, client: FeedClient, cache: CacheManager) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (request_tx, mut request_rx) = mpsc::channel::<()>(4);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick(), if config.enabled => {}
                    request = request_rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                        interval.reset();
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }

                if msg_tx.send(RefreshMessage::RefreshStarted).await.is_err() {
                    break;
                }
                let snapshot = run_cycle(client.fetch().await, &cache);
                if msg_tx.send(RefreshMessage::Completed(snapshot)).await.is_err() {
                    break;
                }
            }
        });

        Self {
            receiver: msg_rx,
            request_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh; ignored if one is already queued
    pub fn request_refresh(&self) {
        let _ = self.request_tx.try_send(());
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending refresh messages without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
