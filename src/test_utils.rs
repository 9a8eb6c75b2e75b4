//! Test utilities for Nexus
//!
//! Helpers shared by unit tests: temporary history files and assertions on
//! error kinds.

use crate::error::NexusError;
use crate::storage::{ChatRecord, JsonStore, Turn};
use tempfile::TempDir;

/// Create a store backed by a file in a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (JsonStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let store = JsonStore::new_with_path(dir.path().join("chat_history.json"))
        .expect("Failed to create store");
    (store, dir)
}

/// Build a stored-looking chat with one exchange
pub fn sample_chat(id: &str, question: &str, reply: &str) -> ChatRecord {
    ChatRecord {
        id: id.to_string(),
        title: crate::storage::derive_title(question),
        messages: vec![Turn::user(question), Turn::model(reply)],
    }
}

/// Assert that an error is a `NexusError` matching the predicate
///
/// # Panics
///
/// Panics if the error is not a `NexusError` or the predicate rejects it
pub fn assert_nexus_error(err: &anyhow::Error, pred: impl Fn(&NexusError) -> bool) {
    match err.downcast_ref::<NexusError>() {
        Some(e) => assert!(pred(e), "unexpected error variant: {:?}", e),
        None => panic!("expected NexusError, got: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_store_starts_empty() {
        let (store, _dir) = temp_store();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_sample_chat_is_titled() {
        let chat = sample_chat("x", "What is 2+2?", "4");
        assert_eq!(chat.title, "What is 2+2?");
        assert_eq!(chat.messages.len(), 2);
    }

    #[test]
    fn test_assert_nexus_error_matches() {
        let err: anyhow::Error = NexusError::EmptyPrompt.into();
        assert_nexus_error(&err, |e| matches!(e, NexusError::EmptyPrompt));
    }
}
