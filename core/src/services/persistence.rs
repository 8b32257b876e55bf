//! Background slot writer
//!
//! Owns every write to storage. Snapshots are queued by the store and
//! drained by a single tokio task in the order they were scheduled; a
//! backlog collapses to its newest snapshot, so an older snapshot can never
//! land after a newer one. Failures are logged and the next snapshot
//! rewrites all slots.

use crate::config::{SLOT_PROGRESS_ENTRIES, SLOT_ROUTINES, SLOT_USER_PROFILE, SLOT_WISHLIST};
use crate::error::Result;
use crate::models::AppSnapshot;
use crate::storage::{codec, KeyValueStorage};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WriteCommand {
    Save(Box<AppSnapshot>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task
pub struct PersistenceWriter {
    tx: Mutex<Option<mpsc::UnboundedSender<WriteCommand>>>,
    handle: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl PersistenceWriter {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    pub fn start(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(storage, rx));

        Self {
            tx: Mutex::new(Some(tx)),
            handle: tokio::sync::Mutex::new(Some(handle)),
        }
    }

    /// Queue a full snapshot for writing. Never blocks.
    ///
    /// Returns false if the writer has been shut down.
    pub fn schedule(&self, snapshot: AppSnapshot) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);

        match &*tx {
            Some(tx) => tx.send(WriteCommand::Save(Box::new(snapshot))).is_ok(),
            None => false,
        }
    }

    /// Wait until every snapshot scheduled before this call has been written
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();

        let sent = {
            let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
            match &*tx {
                Some(tx) => tx.send(WriteCommand::Flush(ack_tx)).is_ok(),
                None => false,
            }
        };

        if sent {
            // A dropped ack means the task is gone; nothing left to wait for
            let _ = ack_rx.await;
        }
    }

    /// Write out everything queued, then stop the task
    pub async fn shutdown(&self) {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(tx);

        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("Slot writer task ended abnormally: {}", e);
            }
        }
    }
}

async fn run_writer(
    storage: Arc<dyn KeyValueStorage>,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    tracing::info!("Slot writer started");

    while let Some(command) = rx.recv().await {
        let mut latest = None;
        let mut acks = Vec::new();

        match command {
            WriteCommand::Save(snapshot) => latest = Some(snapshot),
            WriteCommand::Flush(ack) => acks.push(ack),
        }

        // Anything already queued is older than the newest queued snapshot,
        // and every snapshot is complete, so only the newest needs writing.
        while let Ok(command) = rx.try_recv() {
            match command {
                WriteCommand::Save(snapshot) => latest = Some(snapshot),
                WriteCommand::Flush(ack) => acks.push(ack),
            }
        }

        if let Some(snapshot) = latest {
            let failed = write_snapshot(storage.as_ref(), &snapshot).await;
            if failed > 0 {
                tracing::error!("Saving state failed for {} slot(s)", failed);
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }

    tracing::info!("Slot writer stopped");
}

/// Write all four slots. Returns how many failed.
pub async fn write_snapshot(storage: &dyn KeyValueStorage, snapshot: &AppSnapshot) -> usize {
    let slots = [
        (SLOT_USER_PROFILE, codec::encode(&snapshot.user_profile)),
        (SLOT_ROUTINES, codec::encode(&snapshot.routines)),
        (SLOT_PROGRESS_ENTRIES, codec::encode(&snapshot.progress_entries)),
        (SLOT_WISHLIST, codec::encode(&snapshot.wishlist)),
    ];

    let mut failed = 0;
    for (key, encoded) in slots {
        if let Err(e) = write_slot(storage, key, encoded).await {
            tracing::error!("Error saving slot {}: {}", key, e);
            failed += 1;
        }
    }

    if failed == 0 {
        tracing::debug!(
            "Saved state: {} routines, {} progress entries, {} wishlist items",
            snapshot.routines.len(),
            snapshot.progress_entries.len(),
            snapshot.wishlist.len()
        );
    }

    failed
}

async fn write_slot(storage: &dyn KeyValueStorage, key: &str, encoded: Result<String>) -> Result<()> {
    let text = encoded?;
    storage.set(key, &text).await
}
