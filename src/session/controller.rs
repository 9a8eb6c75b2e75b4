//! Session controller
//!
//! Decides when a chat is created, when turns are appended, and when the
//! current chat is written into the history file. All state lives in a
//! [`SessionState`] owned by the caller.

use super::state::{EditDraft, SessionState};
use crate::error::{NexusError, Result};
use crate::providers::Provider;
use crate::storage::{self, derive_title, ChatRecord, JsonStore, Turn};

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Text returned by the provider
    pub reply: String,
    /// True when this exchange set the chat title
    pub title_changed: bool,
    /// True when the history file was rewritten
    pub saved: bool,
}

enum Generation {
    Ready(Box<dyn Provider>),
    Unavailable(String),
}

/// Drives one chat session against a history file and a provider
///
/// # Examples
///
/// ```no_run
/// use nexus::session::SessionController;
/// use nexus::storage::JsonStore;
///
/// # async fn example(provider: Box<dyn nexus::providers::Provider>) -> nexus::error::Result<()> {
/// let store = JsonStore::new_with_path("chat_history.json")?;
/// let controller = SessionController::new(store, provider);
/// let mut state = controller.start();
///
/// let outcome = controller.submit(&mut state, "What is 2+2?").await?;
/// println!("{}", outcome.reply);
/// # Ok(())
/// # }
/// ```
pub struct SessionController {
    store: JsonStore,
    generation: Generation,
}

impl SessionController {
    /// Create a controller with a working provider
    pub fn new(store: JsonStore, provider: Box<dyn Provider>) -> Self {
        Self {
            store,
            generation: Generation::Ready(provider),
        }
    }

    /// Create a controller whose provider could not be initialized
    ///
    /// History operations work normally; every submission is rejected
    /// with `reason`.
    pub fn without_provider(store: JsonStore, reason: impl Into<String>) -> Self {
        Self {
            store,
            generation: Generation::Unavailable(reason.into()),
        }
    }

    /// Create a controller from the outcome of provider initialization
    ///
    /// A failed initialization is logged and leaves generation unavailable
    /// for the rest of the session.
    pub fn from_provider_result(store: JsonStore, provider: Result<Box<dyn Provider>>) -> Self {
        match provider {
            Ok(provider) => Self::new(store, provider),
            Err(e) => {
                tracing::warn!("Generation unavailable: {}", e);
                Self::without_provider(store, e.to_string())
            }
        }
    }

    /// True when submissions can reach a provider
    pub fn generation_available(&self) -> bool {
        matches!(self.generation, Generation::Ready(_))
    }

    /// Why generation is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.generation {
            Generation::Ready(_) => None,
            Generation::Unavailable(reason) => Some(reason),
        }
    }

    /// Model name of the provider, if available
    pub fn model_name(&self) -> Option<String> {
        match &self.generation {
            Generation::Ready(provider) => Some(provider.model_name()),
            Generation::Unavailable(_) => None,
        }
    }

    /// The backing store
    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Load the history and open a fresh chat
    pub fn start(&self) -> SessionState {
        let records = self.store.load_all();
        tracing::info!("Session started with {} stored chats", records.len());
        SessionState::new(records)
    }

    /// Open a new, empty chat and leave any edit
    pub fn new_chat(&self, state: &mut SessionState) {
        state.current = ChatRecord::new();
        state.editing = None;
        tracing::debug!(id = %state.current.id, "Started new chat");
    }

    /// Send a question and record the exchange
    ///
    /// On success the current chat gains a user turn and a model turn. The
    /// first exchange titles the chat. The chat is then written to the
    /// history unless an identical copy is already stored.
    ///
    /// # Errors
    ///
    /// - [`NexusError::EmptyPrompt`] for empty or whitespace-only input
    /// - [`NexusError::EditInProgress`] while a chat is being edited
    /// - [`NexusError::GenerationUnavailable`] when no provider is configured
    /// - [`NexusError::Generation`] when the provider call fails
    ///
    /// None of the above touch the state. A [`NexusError::StorageWrite`]
    /// is returned after the turns were appended; the exchange stays in
    /// memory and is written by the next successful save.
    pub async fn submit(&self, state: &mut SessionState, question: &str) -> Result<SubmitOutcome> {
        if question.trim().is_empty() {
            return Err(NexusError::EmptyPrompt.into());
        }

        if state.editing.is_some() {
            return Err(NexusError::EditInProgress.into());
        }

        let provider = match &self.generation {
            Generation::Ready(provider) => provider,
            Generation::Unavailable(reason) => {
                return Err(NexusError::GenerationUnavailable(reason.clone()).into());
            }
        };

        let reply = provider.generate(question).await.map_err(|e| {
            tracing::warn!(chat = %state.current.id, "Generation failed: {}", e);
            match e.downcast::<NexusError>() {
                Ok(NexusError::Generation(msg)) => NexusError::Generation(msg),
                Ok(other) => NexusError::Generation(other.to_string()),
                Err(other) => NexusError::Generation(other.to_string()),
            }
        })?;

        state.current.messages.push(Turn::user(question));
        state.current.messages.push(Turn::model(reply.clone()));

        let title_changed = state.current.messages.len() == 2;
        if title_changed {
            state.current.title = derive_title(question);
            tracing::debug!(title = %state.current.title, "Titled chat");
        }

        let saved = self.commit_current(state)?;

        Ok(SubmitOutcome {
            reply,
            title_changed,
            saved,
        })
    }

    /// Replace the current chat with a copy of a stored one
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::ChatNotFound`] if no stored chat matches `id`
    pub fn select(&self, state: &mut SessionState, id: &str) -> Result<()> {
        let record = storage::find(&state.records, id)
            .ok_or_else(|| NexusError::ChatNotFound(id.to_string()))?;

        state.current = record.clone();
        state.editing = None;
        tracing::debug!(id = %state.current.id, "Selected chat");
        Ok(())
    }

    /// Start editing a stored chat
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::ChatNotFound`] if no stored chat matches `id`
    pub fn edit(&self, state: &mut SessionState, id: &str) -> Result<()> {
        let record = storage::find(&state.records, id)
            .ok_or_else(|| NexusError::ChatNotFound(id.to_string()))?;

        state.editing = Some(EditDraft::from_record(record));
        tracing::debug!(id = %record.id, "Editing chat");
        Ok(())
    }

    /// Write the edit draft over its stored chat and leave edit mode
    ///
    /// If the chat on screen is the edited one and matches its stored copy,
    /// it is refreshed too. A chat on screen with unsaved turns is left as
    /// is, so a later save writes those turns over the edit.
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::NotEditing`] without a draft,
    /// [`NexusError::ChatNotFound`] if the target vanished from history, or
    /// [`NexusError::StorageWrite`]; on a write failure the draft is kept
    /// so the save can be retried.
    pub fn save_edit(&self, state: &mut SessionState) -> Result<()> {
        let draft = state.editing.as_ref().ok_or(NexusError::NotEditing)?;
        let index = state
            .records
            .iter()
            .position(|r| r.id == draft.target_id())
            .ok_or_else(|| NexusError::ChatNotFound(draft.target_id().to_string()))?;

        let updated = draft.clone().into_record();
        let current_in_sync = state.current == state.records[index];
        let mut records = state.records.clone();
        records[index] = updated.clone();
        self.store.persist_all(&records)?;

        state.records = records;
        state.editing = None;
        if current_in_sync {
            state.current = updated;
        } else if state.current.id == updated.id {
            tracing::warn!(id = %updated.id, "Current chat has unsaved turns; not refreshed from edit");
        }
        tracing::info!(id = %state.records[index].id, "Saved chat edits");
        Ok(())
    }

    /// Drop the edit draft without saving
    ///
    /// Returns `false` if nothing was being edited.
    pub fn cancel_edit(&self, state: &mut SessionState) -> bool {
        state.editing.take().is_some()
    }

    /// Store the current chat unless an identical copy is already stored
    ///
    /// Returns `true` when the history file was rewritten. Empty chats are
    /// never stored.
    pub fn save(&self, state: &mut SessionState) -> Result<bool> {
        if state.current.is_empty() {
            return Ok(false);
        }
        self.commit_current(state)
    }

    fn commit_current(&self, state: &mut SessionState) -> Result<bool> {
        if storage::contains(&state.records, &state.current) {
            return Ok(false);
        }

        let mut records = state.records.clone();
        let appended = storage::upsert(&mut records, state.current.clone());
        self.store.persist_all(&records)?;
        state.records = records;

        tracing::debug!(
            id = %state.current.id,
            appended,
            "Stored current chat"
        );
        Ok(true)
    }
}
