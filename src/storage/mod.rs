use crate::error::{NexusError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{derive_title, new_chat_id, ChatRecord, Role, Turn, PLACEHOLDER_TITLE};

/// Environment variable that overrides the history file location
pub const HISTORY_FILE_ENV: &str = "NEXUS_HISTORY_FILE";

const HISTORY_FILE_NAME: &str = "chat_history.json";

/// JSON file backend for chat history
///
/// The whole history is one JSON array. Every write replaces the file, so
/// the last writer wins and concurrent processes will race.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a store at the default location
    ///
    /// Honors `NEXUS_HISTORY_FILE`, otherwise uses the platform data
    /// directory.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var(HISTORY_FILE_ENV) {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "nexus", "nexus")
            .ok_or_else(|| NexusError::StorageWrite("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join(HISTORY_FILE_NAME))
    }

    /// Create a store backed by the given file
    ///
    /// Missing parent directories are created; the file itself is only
    /// written on the first persist.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::storage::JsonStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = JsonStore::new_with_path(dir.path().join("history.json")).unwrap();
    /// assert!(store.load_all().is_empty());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for history file")
                .map_err(|e| NexusError::StorageWrite(e.to_string()))?;
        }

        Ok(Self { path })
    }

    /// Location of the history file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored chat
    ///
    /// A missing or unreadable file is a first run, not a failure: the
    /// result is an empty history.
    pub fn load_all(&self) -> Vec<ChatRecord> {
        match self.try_load() {
            Ok(records) => {
                tracing::debug!(
                    "Loaded {} chats from {}",
                    records.len(),
                    self.path.display()
                );
                records
            }
            Err(NexusError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable history file"
                );
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> std::result::Result<Vec<ChatRecord>, NexusError> {
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| NexusError::StorageRead(e.to_string()))
    }

    /// Overwrite the history file with the full list of chats
    pub fn persist_all(&self, records: &[ChatRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| NexusError::StorageWrite(format!("Failed to serialize chats: {}", e)))?;

        std::fs::write(&self.path, json).map_err(|e| {
            NexusError::StorageWrite(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Persisted {} chats to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// True when an identical record (id, title and every turn) is present
pub fn contains(records: &[ChatRecord], record: &ChatRecord) -> bool {
    records.iter().any(|r| r == record)
}

/// Insert or replace a record by id
///
/// Returns `true` when the record was appended, `false` when an existing
/// record with the same id was replaced in place.
pub fn upsert(records: &mut Vec<ChatRecord>, record: ChatRecord) -> bool {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => {
            *existing = record;
            false
        }
        None => {
            records.push(record);
            true
        }
    }
}

/// Find a record by full id or unique id prefix
///
/// An exact match always wins. A prefix that matches more than one record
/// finds nothing.
pub fn find<'a>(records: &'a [ChatRecord], id: &str) -> Option<&'a ChatRecord> {
    position(records, id).map(|i| &records[i])
}

/// Index of the record matching `id` (see [`find`])
pub fn position(records: &[ChatRecord], id: &str) -> Option<usize> {
    if id.is_empty() {
        return None;
    }
    if let Some(i) = records.iter().position(|r| r.id == id) {
        return Some(i);
    }

    let needle = id.to_uppercase();
    let mut matches = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.id.to_uppercase().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}
