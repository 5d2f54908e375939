//! Wire types of the chatbot REST endpoints.

use serde::{Deserialize, Serialize};

use crate::message::Sender;

/// Body of `POST /chatbot/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub guest_name: String,
    pub platform: String,
    pub user_agent: String,
}

/// Response of `POST /chatbot/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of `POST /chatbot/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub session_id: String,
    pub message: String,
    pub sender: Sender,
}

impl PostMessageRequest {
    /// Builds the request for a user-authored message.
    pub fn from_user(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            message: message.into(),
            sender: Sender::User,
        }
    }
}

/// Response of `POST /chatbot/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_response: Option<String>,
    /// Error description sent along with `success: false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
