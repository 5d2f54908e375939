//! Storage layer for atomic file operations and key/value stores.

mod atomic_json;
mod file_store;
mod memory_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
