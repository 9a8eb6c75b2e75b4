use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Title given to a chat before its first exchange completes
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// Maximum number of characters kept from the first question in a title
pub const TITLE_MAX_CHARS: usize = 30;

const TITLE_ELLIPSIS: &str = "...";

/// Speaker of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The person typing questions
    #[serde(rename = "user")]
    User,
    /// The language model (stored as `"ai"` in the history file)
    #[serde(rename = "ai")]
    Model,
}

impl Role {
    /// Parse a role as typed by the user (`user`, `ai` or `model`)
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::storage::Role;
    ///
    /// assert_eq!(Role::parse_str("AI").unwrap(), Role::Model);
    /// assert!(Role::parse_str("system").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "ai" | "model" => Ok(Self::Model),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "ai"),
        }
    }
}

/// One message in a chat, tagged by speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it
    pub role: Role,
    /// Literal text of the message
    pub content: String,
}

impl Turn {
    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a model turn
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// A full conversation as stored in the history file
///
/// Equality is structural: two records are equal only when id, title and
/// every turn match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Unique identifier (ULID), fixed at creation
    pub id: String,
    /// Display title
    pub title: String,
    /// Ordered turns
    pub messages: Vec<Turn>,
}

impl ChatRecord {
    /// Create an empty chat with a fresh id and the placeholder title
    ///
    /// # Examples
    ///
    /// ```
    /// use nexus::storage::{ChatRecord, PLACEHOLDER_TITLE};
    ///
    /// let chat = ChatRecord::new();
    /// assert_eq!(chat.title, PLACEHOLDER_TITLE);
    /// assert!(chat.messages.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            id: new_chat_id(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// True when the chat holds no turns yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Creation time recovered from the id, if it is a ULID
    ///
    /// Records written by older tools may carry other id formats; those
    /// simply have no known creation time.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Ulid::from_string(&self.id)
            .ok()
            .map(|ulid| DateTime::<Utc>::from(ulid.datetime()))
    }
}

impl Default for ChatRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a new chat id
///
/// ULIDs sort by creation time and carry 80 random bits, so chats created
/// within the same millisecond still get distinct ids.
pub fn new_chat_id() -> String {
    Ulid::new().to_string()
}

/// Derive a chat title from the first question
///
/// Questions longer than [`TITLE_MAX_CHARS`] characters are cut and
/// suffixed with `...`.
///
/// # Examples
///
/// ```
/// use nexus::storage::derive_title;
///
/// assert_eq!(derive_title("What is 2+2?"), "What is 2+2?");
/// assert_eq!(
///     derive_title("Explain the borrow checker to me like I am five"),
///     "Explain the borrow checker to ..."
/// );
/// ```
pub fn derive_title(question: &str) -> String {
    if question.chars().count() > TITLE_MAX_CHARS {
        let head: String = question.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        question.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_as_user_and_ai() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_role_rejects_unknown_value() {
        let parsed = serde_json::from_str::<Role>("\"assistant\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_derive_title_keeps_short_question() {
        let q = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(derive_title(&q), q);
    }

    #[test]
    fn test_derive_title_truncates_long_question() {
        let q = "b".repeat(TITLE_MAX_CHARS + 1);
        let title = derive_title(&q);
        assert_eq!(title, format!("{}...", "b".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn test_derive_title_counts_characters_not_bytes() {
        let q = "é".repeat(TITLE_MAX_CHARS + 5);
        let title = derive_title(&q);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_new_chat_ids_are_distinct() {
        let a = ChatRecord::new();
        let b = ChatRecord::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_created_at_from_ulid() {
        let chat = ChatRecord::new();
        let created = chat.created_at().expect("ulid has a timestamp");
        assert!((Utc::now() - created).num_seconds() < 60);
    }

    #[test]
    fn test_created_at_none_for_legacy_id() {
        let chat = ChatRecord {
            id: "20240101120000".to_string(),
            title: "Old".to_string(),
            messages: vec![],
        };
        assert!(chat.created_at().is_none());
    }

    #[test]
    fn test_record_json_layout() {
        let chat = ChatRecord {
            id: "x".to_string(),
            title: "T".to_string(),
            messages: vec![Turn::user("hi"), Turn::model("hello")],
        };
        let value = serde_json::to_value(&chat).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "x",
                "title": "T",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "ai", "content": "hello"}
                ]
            })
        );
    }
}
