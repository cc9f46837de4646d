use serde::{Deserialize, Serialize};

use crate::limits::{MAX_HISTORY_ITEMS, MAX_TEXT_CHARS, truncate_chars};
use crate::models::request::{ChatHistoryItem, ChatRole};

/// A message held in the caller's in-memory conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub created_at: jiff::Timestamp,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

/// Convert a local conversation into the wire history.
///
/// Keeps the most recent [`MAX_HISTORY_ITEMS`] non-blank messages in order,
/// each trimmed and capped to [`MAX_TEXT_CHARS`].
pub fn history_items(messages: &[ChatMessage]) -> Vec<ChatHistoryItem> {
    let kept: Vec<&ChatMessage> = messages
        .iter()
        .filter(|m| !m.text.trim().is_empty())
        .collect();
    let start = kept.len().saturating_sub(MAX_HISTORY_ITEMS);

    kept[start..]
        .iter()
        .map(|m| ChatHistoryItem {
            role: m.role,
            text: truncate_chars(m.text.trim(), MAX_TEXT_CHARS),
        })
        .collect()
}
