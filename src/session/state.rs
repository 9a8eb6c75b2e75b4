//! Session state owned by a single interactive user
//!
//! `SessionState` holds everything that lives for one session: the loaded
//! history, the chat currently on screen, and the staging copy of a chat
//! being edited. It is created by [`super::SessionController::start`] and
//! passed by `&mut` into every controller operation.

use crate::error::{NexusError, Result};
use crate::storage::{ChatRecord, Role, Turn};
use std::fmt;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The current chat has no turns yet
    Fresh,
    /// The current chat has at least one turn
    Active,
    /// A stored chat is being rewritten in a staging copy
    Editing,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => write!(f, "FRESH"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Editing => write!(f, "EDITING"),
        }
    }
}

/// Staging copy of a stored chat under edit
///
/// Changes stay here until saved; cancelling drops the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    target_id: String,
    title: String,
    messages: Vec<Turn>,
}

impl EditDraft {
    pub(crate) fn from_record(record: &ChatRecord) -> Self {
        Self {
            target_id: record.id.clone(),
            title: record.title.clone(),
            messages: record.messages.clone(),
        }
    }

    /// Id of the stored chat this draft will overwrite
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Staged title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Staged turns
    pub fn messages(&self) -> &[Turn] {
        &self.messages
    }

    /// Replace the staged title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Change the speaker of the turn at `index` (0-based)
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::TurnOutOfRange`] if there is no such turn
    pub fn set_role(&mut self, index: usize, role: Role) -> Result<()> {
        self.turn_mut(index)?.role = role;
        Ok(())
    }

    /// Replace the text of the turn at `index` (0-based)
    ///
    /// # Errors
    ///
    /// Returns [`NexusError::TurnOutOfRange`] if there is no such turn
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<()> {
        self.turn_mut(index)?.content = content.into();
        Ok(())
    }

    fn turn_mut(&mut self, index: usize) -> Result<&mut Turn> {
        let len = self.messages.len();
        self.messages.get_mut(index).ok_or_else(|| {
            NexusError::TurnOutOfRange {
                index: index + 1,
                len,
            }
            .into()
        })
    }

    pub(crate) fn into_record(self) -> ChatRecord {
        ChatRecord {
            id: self.target_id,
            title: self.title,
            messages: self.messages,
        }
    }
}

/// Everything one interactive session owns
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) records: Vec<ChatRecord>,
    pub(crate) current: ChatRecord,
    pub(crate) editing: Option<EditDraft>,
}

impl SessionState {
    /// Build a state around already-loaded history with a fresh current chat
    pub fn new(records: Vec<ChatRecord>) -> Self {
        Self {
            records,
            current: ChatRecord::new(),
            editing: None,
        }
    }

    /// Derived phase of the session
    pub fn phase(&self) -> SessionPhase {
        if self.editing.is_some() {
            SessionPhase::Editing
        } else if self.current.is_empty() {
            SessionPhase::Fresh
        } else {
            SessionPhase::Active
        }
    }

    /// Stored chats in storage order
    pub fn records(&self) -> &[ChatRecord] {
        &self.records
    }

    /// Stored chats, most recent first
    pub fn history(&self) -> impl Iterator<Item = &ChatRecord> {
        self.records.iter().rev()
    }

    /// The chat on screen
    pub fn current(&self) -> &ChatRecord {
        &self.current
    }

    /// Mutable access to the chat on screen
    ///
    /// Changes are not stored until the next exchange or explicit save.
    pub fn current_mut(&mut self) -> &mut ChatRecord {
        &mut self.current
    }

    /// The edit draft, if a chat is being edited
    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    /// Mutable access to the edit draft
    pub fn editing_mut(&mut self) -> Option<&mut EditDraft> {
        self.editing.as_mut()
    }
}
