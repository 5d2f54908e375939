use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::backend::{ChatBackend, StartSessionRequest};
use crate::error::{ChatError, Result};
use crate::storage::{KeyValueStore, SESSION_ID_KEY};

/// How the widget introduces itself when starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Display name shown to support staff for anonymous visitors.
    pub guest_name: String,
    /// Host platform tag (e.g. "web").
    pub platform: String,
    /// Client identifier string.
    pub user_agent: String,
}

impl ClientIdentity {
    fn to_request(&self) -> StartSessionRequest {
        StartSessionRequest {
            guest_name: self.guest_name.clone(),
            platform: self.platform.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Owns the backend-issued conversation session id.
///
/// `SessionManager` is responsible for:
/// - Restoring the persisted session id on mount
/// - Creating a session lazily on the first send
/// - Persisting a newly created id
/// - Forgetting the id when the chat is cleared
///
/// Session creation is single-flight: concurrent callers of
/// [`SessionManager::ensure_session`] wait for one backend call and share
/// its result.
pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
    backend: Arc<dyn ChatBackend>,
    identity: ClientIdentity,
    session_id: RwLock<Option<String>>,
    /// Held for the duration of a session-start call
    creation: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager without a session. Call [`SessionManager::restore`]
    /// to pick up a previously persisted id.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        backend: Arc<dyn ChatBackend>,
        identity: ClientIdentity,
    ) -> Self {
        Self {
            storage,
            backend,
            identity,
            session_id: RwLock::new(None),
            creation: Mutex::new(()),
        }
    }

    /// Loads the persisted session id, if any.
    ///
    /// Unreadable storage or a blank value restores as "no session".
    pub async fn restore(&self) -> Option<String> {
        let restored = match self.storage.get(SESSION_ID_KEY).await {
            Ok(value) => value
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding persisted session id");
                None
            }
        };

        *self.session_id.write().await = restored.clone();
        restored
    }

    /// Returns the current session id without side effects.
    pub async fn get_session(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Returns the current session id, starting a new session if there is none.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::SessionCreationFailed` when the backend is
    /// unreachable, reports failure, or answers without an id.
    pub async fn ensure_session(&self) -> Result<String> {
        if let Some(id) = self.get_session().await {
            return Ok(id);
        }

        let _creation = self.creation.lock().await;

        // Another caller may have created the session while we waited.
        if let Some(id) = self.get_session().await {
            return Ok(id);
        }

        let response = self
            .backend
            .start_session(&self.identity.to_request())
            .await
            .map_err(|e| ChatError::session_creation(e.to_string()))?;

        if !response.success {
            return Err(ChatError::session_creation(
                "backend reported an unsuccessful session start",
            ));
        }

        let id = response
            .session_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ChatError::session_creation("backend returned no session id"))?;

        if let Err(err) = self.storage.set(SESSION_ID_KEY, &id).await {
            // The backend session exists; keep using it for this process.
            tracing::error!(session_id = %id, error = %err, "Failed to persist session id");
        }

        tracing::info!(session_id = %id, "Started chatbot session");
        *self.session_id.write().await = Some(id.clone());
        Ok(id)
    }

    /// Removes the persisted id and forgets the current session.
    ///
    /// Waits for an in-flight session start to finish, then clears it too:
    /// the caller of that start still receives its id, but the session is not
    /// kept once the clear returns.
    pub async fn clear_session(&self) -> Result<()> {
        let _creation = self.creation.lock().await;
        let mut session_id = self.session_id.write().await;

        self.storage.remove(SESSION_ID_KEY).await?;
        if let Some(previous) = session_id.take() {
            tracing::info!(session_id = %previous, "Cleared chatbot session");
        }

        Ok(())
    }
}
