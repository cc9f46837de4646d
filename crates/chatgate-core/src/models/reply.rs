use serde::{Deserialize, Serialize};

use crate::models::ui_block::UiBlock;

/// Canonical assistant reply returned by the proxy, whatever shape the
/// upstream used. `ui` is omitted from the wire form when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ui: Vec<UiBlock>,
}

impl StructuredReply {
    pub fn plain(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ui: Vec::new(),
        }
    }
}
