//! Domain layer of the jobchat assistant widget.
//!
//! Holds the widget's models, its error type, the storage and backend seams,
//! and the two stateful leaves that sit directly on those seams:
//! [`SessionManager`] and [`MessageStore`].

pub mod backend;
pub mod config;
pub mod error;
pub mod message;
pub mod presentation;
pub mod quick_action;
pub mod session;
pub mod storage;

// Re-export common types
pub use config::WidgetConfig;
pub use error::ChatError;
pub use message::{Message, MessageStore, Sender};
pub use presentation::{PresentationEvent, PresentationState};
pub use quick_action::QuickAction;
pub use session::{ClientIdentity, SessionManager};
