//! Append-only message log mirrored to local storage.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use super::model::Message;
use crate::error::{ChatError, Result};
use crate::storage::{KeyValueStore, MESSAGES_KEY};

/// Ordered, append-only log of exchanged messages.
///
/// `MessageStore` is responsible for:
/// - Restoring the persisted log on mount (corrupt data restores as empty)
/// - Appending messages and persisting the full log before returning
/// - Clearing both the in-memory log and its persisted copy
/// - Publishing snapshots to UI subscribers after every mutation
///
/// The in-memory log and the persisted copy agree after every successful
/// mutation; a failed write rolls the in-memory change back.
pub struct MessageStore {
    /// Persistent mirror of the log
    storage: Arc<dyn KeyValueStore>,
    /// In-memory log; the lock also serializes mutations with their writes
    log: Mutex<Vec<Message>>,
    /// Latest published snapshot
    snapshots: watch::Sender<Vec<Message>>,
}

impl MessageStore {
    /// Creates an empty store backed by `storage`. Call [`MessageStore::restore`]
    /// to load a previously persisted log.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            storage,
            log: Mutex::new(Vec::new()),
            snapshots,
        }
    }

    /// Loads the persisted log into memory and returns it.
    ///
    /// Missing, unreadable, or malformed data yields an empty log.
    pub async fn restore(&self) -> Vec<Message> {
        let mut log = self.log.lock().await;

        let restored = match self.load().await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!(error = %err, "Discarding persisted message log");
                Vec::new()
            }
        };

        tracing::debug!(len = restored.len(), "Restored message log");
        *log = restored.clone();
        self.snapshots.send_replace(restored.clone());
        restored
    }

    /// Appends a message and persists the whole log.
    ///
    /// A timestamp earlier than the current last entry is raised to that
    /// entry's timestamp so the log stays chronologically non-decreasing.
    ///
    /// # Returns
    ///
    /// The snapshot including the new message, once it is durable.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails; the message is then not
    /// part of the log.
    pub async fn append(&self, mut message: Message) -> Result<Vec<Message>> {
        let mut log = self.log.lock().await;

        if let Some(last) = log.last()
            && message.timestamp < last.timestamp
        {
            message.timestamp = last.timestamp;
        }

        log.push(message);
        if let Err(err) = self.persist(&log).await {
            log.pop();
            tracing::error!(error = %err, "Failed to persist message log");
            return Err(err);
        }

        let snapshot = log.clone();
        self.snapshots.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Empties the log and removes its persisted copy.
    pub async fn clear(&self) -> Result<()> {
        let mut log = self.log.lock().await;

        self.storage.remove(MESSAGES_KEY).await?;
        log.clear();
        self.snapshots.send_replace(Vec::new());

        tracing::debug!("Cleared message log");
        Ok(())
    }

    /// Returns the most recently published snapshot without waiting for
    /// in-flight mutations.
    pub fn snapshot(&self) -> Vec<Message> {
        self.snapshots.borrow().clone()
    }

    /// Number of messages in the latest snapshot.
    pub fn len(&self) -> usize {
        self.snapshots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to snapshots published after each mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Message>> {
        self.snapshots.subscribe()
    }

    async fn load(&self) -> Result<Vec<Message>> {
        let raw = match self.storage.get(MESSAGES_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };

        serde_json::from_str(&raw).map_err(|e| ChatError::corrupt(MESSAGES_KEY, e.to_string()))
    }

    async fn persist(&self, log: &[Message]) -> Result<()> {
        let raw = serde_json::to_string(log)?;
        self.storage.set(MESSAGES_KEY, &raw).await
    }
}
