//! Atomic JSON file operations.
//!
//! Provides a thin layer for safe concurrent access to small JSON state files.

use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur during atomic JSON operations.
#[derive(Debug)]
pub enum AtomicJsonError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicJsonError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicJsonError::JsonError(e) => write!(f, "JSON error: {}", e),
            AtomicJsonError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicJsonError {}

impl From<std::io::Error> for AtomicJsonError {
    fn from(e: std::io::Error) -> Self {
        AtomicJsonError::IoError(e)
    }
}

impl From<serde_json::Error> for AtomicJsonError {
    fn from(e: serde_json::Error) -> Self {
        AtomicJsonError::JsonError(e)
    }
}

impl From<AtomicJsonError> for jobchat_core::ChatError {
    fn from(e: AtomicJsonError) -> Self {
        match e {
            AtomicJsonError::JsonError(err) => err.into(),
            other => jobchat_core::ChatError::storage(other.to_string()),
        }
    }
}

/// A handle to a JSON file that is replaced atomically on every write.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: File locking prevents concurrent read-modify-write cycles
/// - **Durability**: Explicit fsync before rename
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the JSON file and deserializes it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the JSON file atomically.
    ///
    /// Every write goes through its own uniquely named temp file in the target
    /// directory, so concurrent writers never share a staging path.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        let parent = self.parent_dir();
        fs::create_dir_all(&parent)?;

        let json = serde_json::to_string_pretty(data)?;

        let mut tmp_file = NamedTempFile::new_in(&parent)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.as_file().sync_all()?;

        tmp_file
            .persist(&self.path)
            .map_err(|e| AtomicJsonError::IoError(e.error))?;

        Ok(())
    }

    /// Performs a locked read-modify-write cycle.
    ///
    /// Content that fails to parse is replaced by `default_value` rather than
    /// blocking every later write.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicJsonError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.lock_path(), &self.parent_dir())?;

        let mut data = match self.load() {
            Ok(Some(data)) => data,
            Ok(None) => default_value,
            Err(AtomicJsonError::JsonError(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Replacing unparsable state file");
                default_value
            }
            Err(e) => return Err(e),
        };

        f(&mut data);

        self.save(&data)
    }

    /// Sibling lock file, e.g. `widget_state.lock`. It is never deleted: a
    /// waiter must lock the same inode the holder locked.
    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Exclusive advisory lock, released when the handle closes.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(lock_path: &Path, parent: &Path) -> Result<Self, AtomicJsonError> {
        fs::create_dir_all(parent)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        file.lock_exclusive().map_err(|e| {
            AtomicJsonError::LockError(format!(
                "Failed to lock {}: {}",
                lock_path.display(),
                e
            ))
        })?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
