//! Conversation messages and the persisted message log.

mod model;
mod store;

pub use model::{Message, Sender};
pub use store::MessageStore;
