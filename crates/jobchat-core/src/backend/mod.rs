//! Chatbot backend seam.
//!
//! The widget talks to two endpoints: one that starts a conversation session
//! and one that answers a user message within it.

mod dto;

pub use dto::{PostMessageRequest, PostMessageResponse, StartSessionRequest, StartSessionResponse};

use async_trait::async_trait;

use crate::error::Result;

/// An abstract chatbot backend.
///
/// Implementations report transport failures as errors and pass the decoded
/// body through otherwise; interpreting `success: false` is left to callers.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Calls `POST /chatbot/start`.
    async fn start_session(&self, request: &StartSessionRequest) -> Result<StartSessionResponse>;

    /// Calls `POST /chatbot/message`.
    async fn post_message(&self, request: &PostMessageRequest) -> Result<PostMessageResponse>;
}
