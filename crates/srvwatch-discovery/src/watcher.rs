//! SRV watcher
//!
//! A [`Watcher`] owns one background refresh task. Every refresh interval the
//! task resolves the target and replaces the snapshot pair in a single write
//! critical section. Consumers call [`Watcher::next_batch`] to diff the
//! settled pair; failed refreshes leave the pair alone and are queued so the
//! next call reports them exactly once.

use srvwatch_core::{
    ChangeRecord, DiscoveryError, DiscoveryResult, Endpoint, Snapshot, WatcherConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::diff::diff;
use crate::dns::{HickoryNameService, NameService};

/// The two most recent successful resolutions
#[derive(Debug, Default)]
struct Snapshots {
    previous: Snapshot,
    current: Snapshot,
}

/// Watches the SRV records of a target and reports membership changes
pub struct Watcher {
    target: String,
    snapshots: Arc<RwLock<Snapshots>>,
    errors: Mutex<mpsc::Receiver<DiscoveryError>>,
    cancel: CancellationToken,
}

impl Watcher {
    /// Create a watcher for `target` using the default configuration and the
    /// system resolver.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_config(target, WatcherConfig::default())
    }

    /// Create a watcher with an explicit configuration
    pub fn with_config(target: impl Into<String>, config: WatcherConfig) -> Self {
        Self::with_name_service(target, config, Arc::new(HickoryNameService::new()))
    }

    /// Create a watcher that resolves through `name_service`
    pub fn with_name_service(
        target: impl Into<String>,
        config: WatcherConfig,
        name_service: Arc<dyn NameService>,
    ) -> Self {
        let target = target.into();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(service = %target, error = %e, "Invalid watcher config, using defaults");
                WatcherConfig::default()
            }
        };

        let (error_tx, error_rx) = mpsc::channel(config.error_queue_capacity);
        let snapshots = Arc::new(RwLock::new(Snapshots::default()));
        let cancel = CancellationToken::new();

        let task = RefreshTask {
            target: target.clone(),
            interval: config.refresh_interval(),
            name_service,
            snapshots: snapshots.clone(),
            errors: error_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());

        info!(
            service = %target,
            refresh_interval_ms = config.refresh_interval_ms,
            error_queue_capacity = config.error_queue_capacity,
            "Watcher started"
        );

        Self {
            target,
            snapshots,
            errors: Mutex::new(error_rx),
            cancel,
        }
    }

    /// Get the name this watcher resolves
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get the next batch of changes.
    ///
    /// Returns a queued refresh error if there is one, consuming it.
    /// Otherwise diffs the previous snapshot against the current one. Does
    /// not wait for a refresh; an empty batch means nothing changed.
    pub async fn next_batch(&self) -> DiscoveryResult<Vec<ChangeRecord>> {
        if let Ok(err) = self.errors.lock().await.try_recv() {
            return Err(err);
        }

        let snapshots = self.snapshots.read().await;
        let records = diff(&snapshots.previous, &snapshots.current);

        if !records.is_empty() {
            debug!(service = %self.target, changes = records.len(), "Computed change batch");
        }

        Ok(records)
    }

    /// Get a copy of the latest resolved snapshot
    pub async fn current_snapshot(&self) -> Snapshot {
        self.snapshots.read().await.current.clone()
    }

    /// Get the endpoints of the latest resolved snapshot, sorted by host
    pub async fn endpoints(&self) -> Vec<Endpoint> {
        let snapshots = self.snapshots.read().await;
        let mut endpoints: Vec<Endpoint> = snapshots
            .current
            .iter()
            .map(|(host, port)| Endpoint::new(host.clone(), *port))
            .collect();
        endpoints.sort_by(|a, b| a.host.cmp(&b.host));
        endpoints
    }

    /// Stop the refresh task.
    ///
    /// Never blocks and may be called any number of times. The task exits
    /// after its current iteration; an iteration already past its stop check
    /// may still apply its snapshot.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            info!(service = %self.target, "Stopping watcher");
        }
        self.cancel.cancel();
    }

    /// Check whether [`stop`](Self::stop) has been called
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// State moved into the background task
struct RefreshTask {
    target: String,
    interval: Duration,
    name_service: Arc<dyn NameService>,
    snapshots: Arc<RwLock<Snapshots>>,
    errors: mpsc::Sender<DiscoveryError>,
    cancel: CancellationToken,
}

impl RefreshTask {
    async fn run(self) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            let resolved = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                resolved = resolve_snapshot(self.name_service.as_ref(), &self.target) => resolved,
            };

            match resolved {
                Ok(snapshot) => {
                    if !self.replace(snapshot).await {
                        break;
                    }
                }
                Err(e) => {
                    warn!(service = %self.target, error = %e, "Refresh failed");
                    // Blocks while the queue is full
                    let delivered = tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => false,
                        sent = self.errors.send(e) => sent.is_ok(),
                    };
                    if !delivered {
                        break;
                    }
                }
            }
        }

        debug!(service = %self.target, "Refresh task exited");
    }

    /// Swap in a new snapshot. Returns false if the watcher was stopped.
    async fn replace(&self, snapshot: Snapshot) -> bool {
        let mut guard = self.snapshots.write().await;
        if self.cancel.is_cancelled() {
            return false;
        }

        let snapshots = &mut *guard;
        snapshots.previous = std::mem::replace(&mut snapshots.current, snapshot);

        debug!(
            service = %self.target,
            endpoints = snapshots.current.len(),
            "Snapshot refreshed"
        );
        true
    }
}

/// Resolve `target` into a host → port snapshot.
///
/// The i-th address is paired with the i-th service record. A count mismatch
/// between the two lookups is reported as a resolution failure.
pub(crate) async fn resolve_snapshot(
    name_service: &dyn NameService,
    target: &str,
) -> DiscoveryResult<Snapshot> {
    let records = name_service.lookup_srv(target).await?;
    let addrs = name_service.lookup_host(target).await?;

    if records.len() != addrs.len() {
        return Err(DiscoveryError::resolution(
            target,
            format!(
                "{} service records but {} addresses",
                records.len(),
                addrs.len()
            ),
        ));
    }

    Ok(addrs
        .iter()
        .zip(records.iter())
        .map(|(addr, record)| (addr.to_string(), record.port))
        .collect())
}
