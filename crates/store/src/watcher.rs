//! Snapshot lifecycle: the initial fetch and the background refresh loop.
//!
//! The snapshot cell is a `tokio::sync::watch` channel carrying an
//! `Arc<ConfigSnapshot>`. The refresh task is the only writer; readers
//! grab the current `Arc` and keep it for the length of a request, so a
//! concurrent refresh can never show them half-updated settings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use switchboard_config::{ConfigSnapshot, ConnectionInfo};
use switchboard_core::StoreError;

use crate::source::SettingsSource;

/// Read side of the snapshot cell. Cheap to clone, safe to read from any
/// task.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    rx: watch::Receiver<Arc<ConfigSnapshot>>,
}

impl SnapshotHandle {
    /// The current snapshot. Holding the returned `Arc` pins the view for
    /// as long as the caller needs it.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.rx.borrow().clone()
    }

    /// Wait until a newer snapshot than the last seen one is published.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// A handle pinned to a fixed snapshot, with no refresh behind it.
    pub fn pinned(snapshot: ConfigSnapshot) -> Self {
        let (_tx, rx) = watch::channel(Arc::new(snapshot));
        Self { rx }
    }
}

/// A bootstrapped settings store.
#[derive(Debug)]
pub struct Store {
    /// Upstream connection details from the initial document. Fixed for
    /// the process lifetime.
    pub connection: ConnectionInfo,

    /// Live snapshot handle.
    pub snapshots: SnapshotHandle,
}

/// Fetch the initial settings document and start the refresh loop.
///
/// Startup is strict: a failed fetch, an unparseable document, or a
/// missing connection section refuses to come up. The refresh loop exits
/// when `cancel` fires.
pub async fn bootstrap(
    source: Box<dyn SettingsSource>,
    poll_interval: Duration,
    cancel: CancellationToken,
) -> Result<Store, StoreError> {
    let document = source.fetch().await?;

    let connection = document.connection.clone().ok_or_else(|| {
        StoreError::Invalid("settings document has no connection section".into())
    })?;

    if document.profiles.is_empty() {
        warn!(source = %source.describe(), "Settings document has no completion profiles");
    }

    info!(
        source = %source.describe(),
        profiles = document.profiles.len(),
        flags = document.flags.len(),
        "Loaded initial settings"
    );

    let snapshot = Arc::new(ConfigSnapshot::from_document(document));
    let (tx, rx) = watch::channel(snapshot);

    tokio::spawn(refresh_loop(
        source,
        connection.clone(),
        poll_interval,
        tx,
        cancel,
    ));

    Ok(Store {
        connection,
        snapshots: SnapshotHandle { rx },
    })
}

/// Re-fetch on a timer and publish snapshots when content changes.
///
/// A failed fetch keeps the last-known-good snapshot. Connection changes
/// are reported but never applied live.
async fn refresh_loop(
    source: Box<dyn SettingsSource>,
    startup_connection: ConnectionInfo,
    poll_interval: Duration,
    tx: watch::Sender<Arc<ConfigSnapshot>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Settings refresh loop stopping");
                return;
            }
            _ = tokio::time::sleep(poll_interval) => {}
        }

        let document = match source.fetch().await {
            Ok(doc) => doc,
            Err(e) => {
                warn!(
                    source = %source.describe(),
                    error = %e,
                    "Settings refresh failed, keeping last-known-good snapshot"
                );
                continue;
            }
        };

        match &document.connection {
            Some(connection) if *connection != startup_connection => {
                warn!("Upstream connection settings changed, restart required to apply them");
            }
            None => {
                warn!("Settings document lost its connection section, keeping startup values");
            }
            _ => {}
        }

        if tx.borrow().same_content(&document) {
            debug!("Settings unchanged");
            continue;
        }

        let snapshot = Arc::new(ConfigSnapshot::from_document(document));
        info!(
            profiles = snapshot.profiles.len(),
            flags = snapshot.flags.len(),
            "Applied updated settings"
        );

        if tx.send(snapshot).is_err() {
            // Every handle is gone, nobody left to serve
            return;
        }
    }
}
