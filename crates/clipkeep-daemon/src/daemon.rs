//! Core daemon orchestration.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clipkeep_clipboard::ClipboardProvider;
use clipkeep_enrich::{EnrichmentOutcome, EnrichmentPipeline, Fetcher};
use clipkeep_store::{AssetCache, HistoryFile, HistoryStore};
use clipkeep_types::{AssetRef, ClipboardItem, ItemId};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::DaemonError;
use crate::setup;
use crate::watcher::PasteboardWatcher;

/// Events processed by the daemon's main loop.
#[derive(Debug)]
pub enum DaemonEvent {
    /// Insert an externally built item (UI-driven insert).
    Insert(ClipboardItem),
    /// Write an item's content back to the pasteboard.
    Copy(ItemId),
    /// Remove one item.
    Remove(ItemId),
    /// Drop the whole history.
    Clear,
    /// Shutdown signal.
    Shutdown,
}

/// The core clipkeep daemon.
///
/// Owns the history store exclusively; its `run` loop is the one logical
/// writer, so insert, update, remove, and clear never interleave. Enrichment
/// tasks run concurrently but only ever report back over a channel into this
/// loop. Readers get complete copy-on-read snapshots through a watch
/// channel, which doubles as the mutation notification signal.
pub struct Daemon {
    config: Config,
    store: HistoryStore,
    watcher: PasteboardWatcher,
    pipeline: EnrichmentPipeline,
    event_tx: mpsc::Sender<DaemonEvent>,
    event_rx: mpsc::Receiver<DaemonEvent>,
    outcome_rx: mpsc::Receiver<EnrichmentOutcome>,
    snapshot_tx: watch::Sender<Vec<ClipboardItem>>,
}

impl Daemon {
    /// Create a daemon instance, reading the persisted history from
    /// `data_dir` once.
    #[must_use]
    pub fn new(
        config: Config,
        clipboard: Box<dyn ClipboardProvider>,
        fetcher: Arc<dyn Fetcher>,
        data_dir: &Path,
    ) -> Self {
        let assets = AssetCache::new(setup::assets_dir(data_dir));
        let file = HistoryFile::new(setup::history_path(data_dir));
        let store = HistoryStore::open(assets.clone(), file, config.history.max_items);

        let (event_tx, event_rx) = mpsc::channel(256);
        let (outcome_tx, outcome_rx) = mpsc::channel(256);

        let pipeline = EnrichmentPipeline::new(
            fetcher,
            Duration::from_secs(config.enrichment.page_timeout_secs),
            Duration::from_secs(config.enrichment.image_timeout_secs),
            outcome_tx,
        );
        let watcher = PasteboardWatcher::new(clipboard, assets, config.enrichment.enabled);
        let (snapshot_tx, _) = watch::channel(store.snapshot());

        Self {
            config,
            store,
            watcher,
            pipeline,
            event_tx,
            event_rx,
            outcome_rx,
            snapshot_tx,
        }
    }

    /// Get a clone of the event sender for feeding events into the daemon.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::Sender<DaemonEvent> {
        self.event_tx.clone()
    }

    /// Subscribe to history snapshots. The receiver is notified after every
    /// successful mutation and always observes a complete list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ClipboardItem>> {
        self.snapshot_tx.subscribe()
    }

    /// Get a handle to the blob cache for resolving asset refs from
    /// snapshots (images and preview thumbnails).
    ///
    /// Like `event_sender()` and `subscribe()`, this is taken before `run`
    /// and stays usable while the loop owns the daemon.
    #[must_use]
    pub fn assets(&self) -> AssetCache {
        self.store.assets().clone()
    }

    /// Run the daemon event loop until a shutdown event arrives.
    pub async fn run(&mut self) -> Result<(), DaemonError> {
        let mut poll = tokio::time::interval(Duration::from_millis(
            self.config.history.poll_interval_ms,
        ));
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            max_items = self.config.history.max_items,
            poll_interval_ms = self.config.history.poll_interval_ms,
            "daemon running"
        );

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    match self.watcher.poll().await {
                        Ok(Some(item)) => self.handle_captured(item),
                        Ok(None) => {}
                        // Never fatal: skip this tick, retry on the next.
                        Err(e) => debug!(error = %e, "pasteboard read failed"),
                    }
                }
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_enriched(outcome);
                }
                event = self.event_rx.recv() => {
                    match event {
                        Some(DaemonEvent::Insert(item)) => self.handle_captured(item),
                        Some(DaemonEvent::Copy(id)) => self.handle_copy(id).await,
                        Some(DaemonEvent::Remove(id)) => {
                            if self.store.remove(id) {
                                self.publish();
                            }
                        }
                        Some(DaemonEvent::Clear) => {
                            self.store.clear();
                            self.publish();
                        }
                        Some(DaemonEvent::Shutdown) | None => {
                            info!("shutting down");
                            break;
                        }
                    }
                }
            }
        }

        // State is persisted per-mutation; nothing left to flush.
        info!("daemon stopped");
        Ok(())
    }

    fn handle_captured(&mut self, item: ClipboardItem) {
        let id = item.id;
        let schedule = item.enrichment_pending.then(|| item.content.clone());

        self.store.insert(item);

        if let Some(url) = schedule {
            self.pipeline.schedule(id, url);
        }
        self.publish();
    }

    fn handle_enriched(&mut self, outcome: EnrichmentOutcome) {
        // Race-safety: the item may have been evicted while the fetch ran.
        // Dropping the result here (before the preview blob is written)
        // leaves neither a resurrected item nor an orphaned file.
        if self.store.find(outcome.id).is_none() {
            debug!(id = %outcome.id, "dropping enrichment result for evicted item");
            return;
        }

        let preview_asset = outcome.preview_image.and_then(|bytes| {
            let asset = AssetRef::preview(outcome.id);
            match self.store.assets().store(&asset, &bytes) {
                Ok(()) => Some(asset),
                Err(e) => {
                    warn!(id = %outcome.id, error = %e, "failed to cache preview");
                    None
                }
            }
        });

        let title = outcome.title;
        let description = outcome.description;
        self.store.update(outcome.id, |item| {
            item.title = title;
            item.description = description;
            item.preview_asset = preview_asset;
            item.enrichment_pending = false;
        });
        self.publish();
    }

    async fn handle_copy(&mut self, id: ItemId) {
        let Some(item) = self.store.find(id).cloned() else {
            debug!(id = %id, "copy requested for unknown item");
            return;
        };
        if let Err(e) = self.watcher.copy_item(&item).await {
            warn!(id = %id, error = %e, "failed to copy item to pasteboard");
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.store.snapshot());
    }
}
