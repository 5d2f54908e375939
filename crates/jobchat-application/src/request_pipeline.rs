//! One send/receive cycle of the assistant.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use jobchat_core::backend::{ChatBackend, PostMessageRequest};
use jobchat_core::error::{ChatError, Result};
use jobchat_core::{Message, MessageStore, SessionManager, WidgetConfig};

/// Bot reply shown whenever a message could not be delivered or answered.
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting right now. \
Please try again in a moment, visit our Help Center for answers to common questions, \
or refresh the page if the problem persists.";

/// Cosmetic delays applied before replies are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePacing {
    pub typing_delay_min: Duration,
    pub typing_delay_max: Duration,
    pub fallback_delay: Duration,
}

impl ResponsePacing {
    /// No artificial delays.
    pub fn immediate() -> Self {
        Self {
            typing_delay_min: Duration::ZERO,
            typing_delay_max: Duration::ZERO,
            fallback_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        let (typing_delay_min, typing_delay_max) = config.typing_delay_range();
        Self {
            typing_delay_min,
            typing_delay_max,
            fallback_delay: config.fallback_delay(),
        }
    }

    /// Picks a typing delay uniformly from the configured range.
    pub fn typing_delay(&self) -> Duration {
        let min = self.typing_delay_min.as_millis() as u64;
        let max = self.typing_delay_max.as_millis() as u64;
        if max <= min {
            return self.typing_delay_min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

impl Default for ResponsePacing {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}

/// Observable pipeline state for the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStatus {
    /// Sends whose reply (or fallback) point has not been reached yet.
    pub pending_replies: usize,
    /// Failure of the most recent send, until the next send or a dismissal.
    pub last_error: Option<ChatError>,
}

impl PipelineStatus {
    pub fn is_typing(&self) -> bool {
        self.pending_replies > 0
    }
}

/// How a send ended. Either way exactly one bot message was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Replied { reply: Message },
    FellBack { error: ChatError, reply: Message },
}

impl SendOutcome {
    pub fn reply(&self) -> &Message {
        match self {
            SendOutcome::Replied { reply } | SendOutcome::FellBack { reply, .. } => reply,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SendOutcome::FellBack { .. })
    }
}

/// A send whose user message is already in the log and whose reply is owed.
#[derive(Debug)]
#[must_use = "a pending send owes a bot reply; pass it to RequestPipeline::complete"]
pub struct PendingSend {
    text: String,
}

impl PendingSend {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Orchestrates optimistic append, session acquisition, the backend call,
/// the typing delay, and the fallback reply.
pub struct RequestPipeline {
    sessions: Arc<SessionManager>,
    messages: Arc<MessageStore>,
    backend: Arc<dyn ChatBackend>,
    pacing: ResponsePacing,
    status: watch::Sender<PipelineStatus>,
}

impl RequestPipeline {
    pub fn new(
        sessions: Arc<SessionManager>,
        messages: Arc<MessageStore>,
        backend: Arc<dyn ChatBackend>,
        pacing: ResponsePacing,
    ) -> Self {
        let (status, _) = watch::channel(PipelineStatus::default());
        Self {
            sessions,
            messages,
            backend,
            pacing,
            status,
        }
    }

    /// Runs a full cycle and waits for the reply.
    ///
    /// # Returns
    ///
    /// - `Ok(None)`: blank input, nothing happened
    /// - `Ok(Some(outcome))`: the user message and one bot message were appended
    ///
    /// # Errors
    ///
    /// Only when the user message itself could not be persisted.
    pub async fn send(&self, user_text: &str) -> Result<Option<SendOutcome>> {
        match self.begin(user_text).await? {
            Some(pending) => Ok(Some(self.complete(pending).await)),
            None => Ok(None),
        }
    }

    /// Appends the user message, then finishes the cycle on a spawned task.
    ///
    /// The user message is in the log when this returns, so replies of
    /// earlier sends can never land before it.
    pub async fn spawn_send(
        self: &Arc<Self>,
        user_text: &str,
    ) -> Result<Option<JoinHandle<SendOutcome>>> {
        let Some(pending) = self.begin(user_text).await? else {
            return Ok(None);
        };

        let pipeline = Arc::clone(self);
        Ok(Some(tokio::spawn(async move {
            pipeline.complete(pending).await
        })))
    }

    /// Optimistic half of a send: validates input, appends the user message
    /// and raises the typing indicator.
    pub async fn begin(&self, user_text: &str) -> Result<Option<PendingSend>> {
        if user_text.trim().is_empty() {
            tracing::debug!("Ignoring blank message");
            return Ok(None);
        }

        self.messages.append(Message::user(user_text)).await?;
        self.status.send_modify(|status| {
            status.pending_replies += 1;
            status.last_error = None;
        });

        Ok(Some(PendingSend {
            text: user_text.to_string(),
        }))
    }

    /// Network half of a send. Always appends exactly one bot message.
    pub async fn complete(&self, pending: PendingSend) -> SendOutcome {
        match self.exchange(&pending.text).await {
            Ok(reply_text) => {
                tokio::time::sleep(self.pacing.typing_delay()).await;

                let reply = Message::bot(reply_text);
                self.append_reply(&reply).await;
                self.status.send_modify(|status| {
                    status.pending_replies = status.pending_replies.saturating_sub(1);
                });

                SendOutcome::Replied { reply }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Falling back to canned reply");
                self.status.send_modify(|status| {
                    status.pending_replies = status.pending_replies.saturating_sub(1);
                    status.last_error = Some(error.clone());
                });

                tokio::time::sleep(self.pacing.fallback_delay).await;

                let reply = Message::bot(FALLBACK_REPLY);
                self.append_reply(&reply).await;

                SendOutcome::FellBack { error, reply }
            }
        }
    }

    pub fn status(&self) -> PipelineStatus {
        self.status.borrow().clone()
    }

    pub fn is_typing(&self) -> bool {
        self.status.borrow().is_typing()
    }

    pub fn last_error(&self) -> Option<ChatError> {
        self.status.borrow().last_error.clone()
    }

    /// Hides the error banner.
    pub fn dismiss_error(&self) {
        self.status.send_if_modified(|status| status.last_error.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.status.subscribe()
    }

    pub fn pacing(&self) -> ResponsePacing {
        self.pacing
    }

    async fn exchange(&self, text: &str) -> Result<String> {
        let session_id = self.sessions.ensure_session().await?;

        let response = self
            .backend
            .post_message(&PostMessageRequest::from_user(session_id, text))
            .await
            .map_err(|e| match e {
                ChatError::MessagePostFailed(_) => e,
                other => ChatError::message_post(other.to_string()),
            })?;

        if !response.success {
            return Err(ChatError::message_post(response.message.unwrap_or_else(
                || "backend reported an unsuccessful reply".to_string(),
            )));
        }

        response
            .bot_response
            .filter(|reply| !reply.trim().is_empty())
            .ok_or_else(|| ChatError::message_post("backend returned no reply"))
    }

    async fn append_reply(&self, reply: &Message) {
        if let Err(err) = self.messages.append(reply.clone()).await {
            tracing::error!(error = %err, "Failed to record bot reply");
        }
    }
}
