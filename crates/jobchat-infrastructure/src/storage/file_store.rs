//! File-backed key/value store.
//!
//! All keys live in one JSON object file (`widget_state.json`), so clearing the
//! chat or appending a message is a single atomic file replacement.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use jobchat_core::error::{ChatError, Result};
use jobchat_core::storage::KeyValueStore;

use super::atomic_json::AtomicJsonFile;

type StateMap = BTreeMap<String, String>;

/// Durable string map stored as a JSON object on disk.
///
/// File I/O runs on the blocking pool; every write is fsynced and renamed
/// into place before the returned future resolves.
#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicJsonFile<StateMap>>,
}

impl FileKeyValueStore {
    pub const STATE_FILENAME: &'static str = "widget_state.json";

    /// Creates a store persisting to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    /// Creates a store persisting to `{dir}/widget_state.json`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir.into().join(Self::STATE_FILENAME))
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn run_blocking<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicJsonFile<StateMap>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| ChatError::internal(format!("Failed to join storage task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            let state = file.load()?.unwrap_or_default();
            Ok(state.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |file| {
            file.update(StateMap::new(), |state| {
                state.insert(key, value);
            })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            if !file.path().exists() {
                return Ok(());
            }
            file.update(StateMap::new(), |state| {
                state.remove(&key);
            })?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobchat_core::storage::{MESSAGES_KEY, SESSION_ID_KEY};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());

        assert_eq!(store.get(SESSION_ID_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());

        store.set(SESSION_ID_KEY, "s1").await.unwrap();
        store.set(MESSAGES_KEY, "[]").await.unwrap();
        assert_eq!(store.get(SESSION_ID_KEY).await.unwrap().as_deref(), Some("s1"));

        store.remove(SESSION_ID_KEY).await.unwrap();
        assert_eq!(store.get(SESSION_ID_KEY).await.unwrap(), None);
        assert_eq!(store.get(MESSAGES_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_values_survive_a_new_handle() {
        let temp_dir = TempDir::new().unwrap();
        FileKeyValueStore::in_dir(temp_dir.path())
            .set(SESSION_ID_KEY, "s1")
            .await
            .unwrap();

        let reopened = FileKeyValueStore::in_dir(temp_dir.path());
        assert_eq!(
            reopened.get(SESSION_ID_KEY).await.unwrap().as_deref(),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_remove_without_file_does_not_create_it() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());

        store.remove(MESSAGES_KEY).await.unwrap();

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.get(SESSION_ID_KEY).await.is_err());

        // Writes recover the file.
        store.set(SESSION_ID_KEY, "s2").await.unwrap();
        assert_eq!(store.get(SESSION_ID_KEY).await.unwrap().as_deref(), Some("s2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sets_from_cloned_handles_keep_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::in_dir(temp_dir.path());
        let keys = [SESSION_ID_KEY, MESSAGES_KEY, "other"];

        for round in 0..100 {
            let writes: Vec<_> = keys
                .iter()
                .map(|key| {
                    let handle = store.clone();
                    let key = key.to_string();
                    let value = format!("{key}-{round}");
                    tokio::spawn(async move { handle.set(&key, &value).await })
                })
                .collect();
            for write in writes {
                write.await.unwrap().unwrap();
            }

            for key in keys {
                assert_eq!(
                    store.get(key).await.unwrap(),
                    Some(format!("{key}-{round}")),
                    "key {key} lost in round {round}"
                );
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_separate_stores_on_one_dir_do_not_lose_writes() {
        let temp_dir = TempDir::new().unwrap();

        let writes: Vec<_> = (0..16)
            .map(|writer| {
                let store = FileKeyValueStore::in_dir(temp_dir.path());
                tokio::spawn(async move { store.set(&format!("key-{writer}"), "v").await })
            })
            .collect();
        for write in writes {
            write.await.unwrap().unwrap();
        }

        let store = FileKeyValueStore::in_dir(temp_dir.path());
        for writer in 0..16 {
            assert_eq!(
                store.get(&format!("key-{writer}")).await.unwrap().as_deref(),
                Some("v")
            );
        }
    }
}
