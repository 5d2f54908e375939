//! Local key/value storage seam.
//!
//! The widget persists two string values: the session id and the serialized
//! message log. Any durable string map (a file, browser-style local storage,
//! an in-memory map for tests) can back it.

use async_trait::async_trait;

use crate::error::Result;

/// Storage key of the current session id (stored as the raw id string).
pub const SESSION_ID_KEY: &str = "chatbotSessionId";

/// Storage key of the message log (stored as a JSON array of messages).
pub const MESSAGES_KEY: &str = "chatbotMessages";

/// An abstract durable string map.
///
/// # Implementation Notes
///
/// Implementations must have finished the durable write by the time `set`
/// or `remove` resolves. Removing a missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: Storage could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a value.
    async fn remove(&self, key: &str) -> Result<()>;
}
