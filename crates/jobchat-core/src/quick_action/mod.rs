//! Quick Action domain models.
//!
//! Quick Actions are the canned prompt buttons displayed above the chat
//! input. Each one sends a fixed question instead of free text.

mod model;

pub use model::{QuickAction, resolve_prompt};
