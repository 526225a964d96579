//! Session persistence for chat history
//!
//! Stores chat sessions in an embedded database so a conversation can be
//! resumed, branched from an earlier message, or replayed later.

use crate::error::{BeatsmithError, Result};
use crate::providers::Citation;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use ulid::Ulid;

/// Maximum length of an auto-generated session title
const TITLE_MAX_CHARS: usize = 30;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The human operator
    User,
    /// The assistant persona
    Assistant,
    /// Status lines injected by the app (errors, mode switches)
    System,
}

/// A single message in a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (ULID)
    pub id: String,

    /// Message author
    pub role: MessageRole,

    /// Message text
    pub content: String,

    /// Creation timestamp (RFC-3339)
    pub timestamp: String,

    /// Citations attached to a grounded assistant reply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl Message {
    /// Create a new message with a fresh ID and timestamp
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
            citations: Vec::new(),
        }
    }

    /// Create an assistant message carrying citations
    pub fn assistant_with_citations(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            citations,
            ..Self::new(MessageRole::Assistant, content)
        }
    }
}

/// A persisted chat session
///
/// # Examples
///
/// ```
/// use beatsmith::session::{ChatSession, Message, MessageRole};
///
/// let mut session = ChatSession::new("dark trap with heavy 808s please");
/// session.push(Message::new(MessageRole::User, "dark trap with heavy 808s please"));
/// assert_eq!(session.title, "dark trap with heavy 808s plea...");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (ULID)
    pub id: String,

    /// Short title derived from the first user message
    pub title: String,

    /// Creation timestamp (RFC-3339)
    pub timestamp: String,

    /// Ordered conversation messages
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Create a new session titled after the opening user message
    ///
    /// Titles longer than 30 characters are truncated with an ellipsis.
    pub fn new(first_user_message: &str) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: Self::derive_title(first_user_message),
            timestamp: Utc::now().to_rfc3339(),
            messages: Vec::new(),
        }
    }

    fn derive_title(text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return "Untitled session".to_string();
        }
        let truncated: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        if trimmed.chars().count() > TITLE_MAX_CHARS {
            format!("{}...", truncated)
        } else {
            truncated
        }
    }

    /// Append a message to the session
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Render the conversation as `User:`/`D-Hz:` lines for provider history
    ///
    /// System messages are app-local status lines and are not replayed.
    pub fn history_lines(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter_map(|m| match m.role {
                MessageRole::User => Some(format!("User: {}", m.content)),
                MessageRole::Assistant => Some(format!("D-Hz: {}", m.content)),
                MessageRole::System => None,
            })
            .collect()
    }

    /// Create a new session branched at the given message
    ///
    /// The branch carries every message up to and including `message_id`
    /// under a fresh session ID, leaving the original untouched. The branch
    /// is titled after the branch-point message itself, not the original
    /// session title.
    ///
    /// # Errors
    ///
    /// Returns error if no message with that ID exists
    pub fn branch_at(&self, message_id: &str) -> Result<ChatSession> {
        let position = self
            .messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| {
                BeatsmithError::NotFound(format!("No message with id {}", message_id))
            })?;

        let snippet: String = self.messages[position].content.chars().take(20).collect();
        Ok(ChatSession {
            id: Ulid::new().to_string(),
            title: format!("Branch: {}...", snippet),
            timestamp: Utc::now().to_rfc3339(),
            messages: self.messages[..=position].to_vec(),
        })
    }
}

/// Session persistence manager
///
/// Manages persistent storage and retrieval of chat sessions using an
/// embedded `sled` key-value database.
pub struct SessionStore {
    db: Db,
}

impl SessionStore {
    /// Open or create a session store
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Storage` if database cannot be opened
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| BeatsmithError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }

    /// Save a session to the store
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Storage` if serialization or insertion fails
    pub fn save(&self, session: &ChatSession) -> Result<()> {
        let key = session.id.as_bytes();
        let value = serde_json::to_vec(session)
            .map_err(|e| BeatsmithError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key, value)
            .map_err(|e| BeatsmithError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| BeatsmithError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Retrieve a session by ID
    ///
    /// # Returns
    ///
    /// Returns Some(ChatSession) if found, None if not found
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Storage` if retrieval or deserialization fails
    pub fn get(&self, id: &str) -> Result<Option<ChatSession>> {
        match self
            .db
            .get(id.as_bytes())
            .map_err(|e| BeatsmithError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let session = serde_json::from_slice(&bytes).map_err(|e| {
                    BeatsmithError::Storage(format!("Deserialization failed: {}", e))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// List all sessions, newest first
    ///
    /// ULID keys sort lexicographically by creation time, so reverse key
    /// order gives newest-first without deserializing timestamps.
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Storage` if iteration or deserialization fails
    pub fn list(&self) -> Result<Vec<ChatSession>> {
        let mut sessions = Vec::new();
        for entry in self.db.iter().rev() {
            let (_, bytes) =
                entry.map_err(|e| BeatsmithError::Storage(format!("Iteration failed: {}", e)))?;
            let session = serde_json::from_slice(&bytes)
                .map_err(|e| BeatsmithError::Storage(format!("Deserialization failed: {}", e)))?;
            sessions.push(session);
        }
        Ok(sessions)
    }

    /// Delete a session by ID
    ///
    /// # Returns
    ///
    /// Returns true if a session was deleted, false if none existed
    ///
    /// # Errors
    ///
    /// Returns `BeatsmithError::Storage` if removal fails
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .db
            .remove(id.as_bytes())
            .map_err(|e| BeatsmithError::Storage(format!("Remove failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| BeatsmithError::Storage(format!("Flush failed: {}", e)))?;

        Ok(removed.is_some())
    }
}
