//! ChatWidget - the facade a host UI binds to.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use jobchat_core::backend::ChatBackend;
use jobchat_core::error::Result;
use jobchat_core::storage::KeyValueStore;
use jobchat_core::{
    ChatError, Message, MessageStore, PresentationState, SessionManager, WidgetConfig,
};
use jobchat_infrastructure::{ConfigService, FileKeyValueStore, JobchatPaths};
use jobchat_interaction::HttpChatBackend;

use crate::presentation::{PresentationController, PulseAnimator};
use crate::quick_action_dispatcher::QuickActionDispatcher;
use crate::request_pipeline::{PipelineStatus, RequestPipeline, ResponsePacing, SendOutcome};
use crate::telemetry::init_tracing;

/// Everything a host needs to render one frame of the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub presentation: PresentationState,
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub last_error: Option<ChatError>,
    /// Current launcher scale, meaningful while the panel is closed.
    pub pulse_scale: f32,
    pub quick_actions: Vec<&'static str>,
}

/// The assistant widget: session, transcript, send pipeline, and panel state.
///
/// Construct inside a tokio runtime; the launcher pulse runs as a task.
pub struct ChatWidget {
    config: WidgetConfig,
    sessions: Arc<SessionManager>,
    messages: Arc<MessageStore>,
    pipeline: Arc<RequestPipeline>,
    quick_actions: QuickActionDispatcher,
    presentation: PresentationController,
}

impl ChatWidget {
    /// Wires the widget over explicit storage and backend implementations.
    pub fn new(
        config: WidgetConfig,
        storage: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Result<Self> {
        config.validate()?;

        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&storage),
            Arc::clone(&backend),
            config.identity(),
        ));
        let messages = Arc::new(MessageStore::new(storage));
        let pipeline = Arc::new(RequestPipeline::new(
            Arc::clone(&sessions),
            Arc::clone(&messages),
            backend,
            ResponsePacing::from_config(&config),
        ));
        let quick_actions = QuickActionDispatcher::new(Arc::clone(&pipeline));
        let presentation = PresentationController::new(PulseAnimator::spawn(
            config.pulse_phase(),
            config.pulse_frame(),
        )?);

        Ok(Self {
            config,
            sessions,
            messages,
            pipeline,
            quick_actions,
            presentation,
        })
    }

    /// Host entry point: loads `config.toml` plus environment overrides, then
    /// wires the widget with [`ChatWidget::from_config`].
    pub fn load() -> anyhow::Result<Self> {
        let config = ConfigService::new()
            .load()
            .context("Failed to load widget configuration")?;
        Self::from_config(config)
    }

    /// Production wiring: file-backed state and the HTTP backend.
    ///
    /// Installs a tracing subscriber using `log_filter` unless the host
    /// already installed one.
    pub fn from_config(config: WidgetConfig) -> anyhow::Result<Self> {
        if let Err(err) = init_tracing(&config.log_filter) {
            tracing::debug!(error = %err, "Keeping the existing tracing subscriber");
        }

        let storage_dir = JobchatPaths::storage_dir(&config)
            .context("Failed to resolve widget storage directory")?;
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::in_dir(storage_dir));
        let backend: Arc<dyn ChatBackend> = Arc::new(
            HttpChatBackend::from_config(&config).context("Failed to create HTTP backend")?,
        );

        Self::new(config, storage, backend).context("Invalid widget configuration")
    }

    /// Restores the persisted session id and transcript.
    pub async fn mount(&self) -> WidgetView {
        let session = self.sessions.restore().await;
        let restored = self.messages.restore().await;
        tracing::info!(
            has_session = session.is_some(),
            messages = restored.len(),
            "Chat widget mounted"
        );
        self.view()
    }

    /// Sends user input. Returns once the user message is in the transcript;
    /// the handle resolves when the reply (or fallback) has been appended.
    pub async fn submit(&self, text: &str) -> Result<Option<JoinHandle<SendOutcome>>> {
        self.pipeline.spawn_send(text).await
    }

    /// Sends user input and waits for the reply.
    pub async fn send(&self, text: &str) -> Result<Option<SendOutcome>> {
        self.pipeline.send(text).await
    }

    pub async fn quick_action(&self, label: &str) -> Result<Option<JoinHandle<SendOutcome>>> {
        self.quick_actions.dispatch(label).await
    }

    pub fn open(&self) -> PresentationState {
        self.presentation.open()
    }

    pub fn minimize(&self) -> PresentationState {
        self.presentation.minimize()
    }

    pub fn expand(&self) -> PresentationState {
        self.presentation.expand()
    }

    pub fn dismiss(&self) -> PresentationState {
        self.presentation.dismiss()
    }

    pub fn toggle(&self) -> PresentationState {
        self.presentation.toggle()
    }

    /// Forgets the session and empties the transcript. The next send starts a
    /// new session. Idempotent.
    pub async fn clear_chat(&self) -> Result<()> {
        self.sessions.clear_session().await?;
        self.messages.clear().await?;
        self.pipeline.dismiss_error();
        tracing::info!("Chat cleared");
        Ok(())
    }

    pub fn dismiss_error(&self) {
        self.pipeline.dismiss_error();
    }

    pub fn view(&self) -> WidgetView {
        let status = self.pipeline.status();
        WidgetView {
            presentation: self.presentation.state(),
            messages: self.messages.snapshot(),
            is_typing: status.is_typing(),
            last_error: status.last_error,
            pulse_scale: self.presentation.pulse_scale(),
            quick_actions: self.quick_actions.labels(),
        }
    }

    pub fn subscribe_messages(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<PipelineStatus> {
        self.pipeline.subscribe()
    }

    pub fn subscribe_presentation(&self) -> watch::Receiver<PresentationState> {
        self.presentation.subscribe()
    }

    pub async fn session_id(&self) -> Option<String> {
        self.sessions.get_session().await
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Stops background work. In-flight sends still finish.
    pub fn shutdown(&self) {
        self.presentation.shutdown();
        tracing::debug!("Chat widget shut down");
    }
}
