//! Conversation session management.

mod manager;

pub use manager::{ClientIdentity, SessionManager};
