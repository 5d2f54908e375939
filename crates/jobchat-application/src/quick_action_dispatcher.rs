//! Quick-action chips routed through the request pipeline.

use std::sync::Arc;

use tokio::task::JoinHandle;

use jobchat_core::QuickAction;
use jobchat_core::error::Result;
use jobchat_core::quick_action::resolve_prompt;

use crate::request_pipeline::{RequestPipeline, SendOutcome};

/// Turns a tapped suggestion chip into a regular send.
pub struct QuickActionDispatcher {
    pipeline: Arc<RequestPipeline>,
}

impl QuickActionDispatcher {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Labels to render as chips, in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        QuickAction::all().iter().map(|action| action.label()).collect()
    }

    /// Sends the prompt behind `label`; unknown labels are sent verbatim.
    pub async fn dispatch(&self, label: &str) -> Result<Option<JoinHandle<SendOutcome>>> {
        let prompt = resolve_prompt(label);
        tracing::debug!(%label, %prompt, "Dispatching quick action");
        self.pipeline.spawn_send(&prompt).await
    }

    pub async fn dispatch_and_wait(&self, label: &str) -> Result<Option<SendOutcome>> {
        self.pipeline.send(&resolve_prompt(label)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request_pipeline::ResponsePacing;
    use async_trait::async_trait;
    use jobchat_core::backend::{
        ChatBackend, PostMessageRequest, PostMessageResponse, StartSessionRequest,
        StartSessionResponse,
    };
    use jobchat_core::{ClientIdentity, MessageStore, SessionManager};
    use jobchat_infrastructure::MemoryKeyValueStore;
    use std::sync::Mutex;

    /// Echoes every message back so tests can see what was posted.
    #[derive(Default)]
    struct EchoBackend {
        posted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn start_session(&self, _request: &StartSessionRequest) -> Result<StartSessionResponse> {
            Ok(StartSessionResponse {
                success: true,
                session_id: Some("qa-session".to_string()),
            })
        }

        async fn post_message(&self, request: &PostMessageRequest) -> Result<PostMessageResponse> {
            self.posted.lock().unwrap().push(request.message.clone());
            Ok(PostMessageResponse {
                success: true,
                bot_response: Some(format!("echo: {}", request.message)),
                message: None,
            })
        }
    }

    fn dispatcher() -> (QuickActionDispatcher, Arc<MessageStore>, Arc<EchoBackend>) {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let backend = Arc::new(EchoBackend::default());
        let sessions = Arc::new(SessionManager::new(
            storage.clone(),
            backend.clone(),
            ClientIdentity {
                guest_name: "Guest User".to_string(),
                platform: "web".to_string(),
                user_agent: "jobchat-test".to_string(),
            },
        ));
        let messages = Arc::new(MessageStore::new(storage));
        let pipeline = Arc::new(RequestPipeline::new(
            sessions,
            messages.clone(),
            backend.clone(),
            ResponsePacing::immediate(),
        ));
        (QuickActionDispatcher::new(pipeline), messages, backend)
    }

    #[tokio::test]
    async fn test_known_label_sends_mapped_prompt() {
        let (dispatcher, messages, backend) = dispatcher();

        dispatcher.dispatch_and_wait("Find Jobs").await.unwrap();

        assert_eq!(
            backend.posted.lock().unwrap().clone(),
            vec!["How can I search for jobs?".to_string()]
        );
        let log = messages.snapshot();
        assert_eq!(log[0].text, "How can I search for jobs?");
        assert_eq!(log[1].text, "echo: How can I search for jobs?");
    }

    #[tokio::test]
    async fn test_unknown_label_is_sent_verbatim() {
        let (dispatcher, _messages, backend) = dispatcher();

        let handle = dispatcher.dispatch("Salary insights").await.unwrap().unwrap();
        handle.await.unwrap();

        assert_eq!(
            backend.posted.lock().unwrap().clone(),
            vec!["Salary insights".to_string()]
        );
    }

    #[tokio::test]
    async fn test_labels_follow_catalog() {
        let (dispatcher, _, _) = dispatcher();
        let labels = dispatcher.labels();

        assert_eq!(labels.len(), QuickAction::all().len());
        assert_eq!(labels[0], QuickAction::FindJobs.label());
    }
}
