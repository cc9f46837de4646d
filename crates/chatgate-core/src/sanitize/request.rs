use serde_json::Value;

use crate::limits::{MAX_HISTORY_ITEMS, MAX_TEXT_CHARS, truncate_chars};
use crate::models::request::{ChatCompleteRequest, ChatHistoryItem, ChatRole};
use crate::sanitize::non_empty_str;

/// Parse a request body into a [`ChatCompleteRequest`].
///
/// Returns `None` unless `raw` is an object with a non-blank string `input`.
/// The input is trimmed and truncated; `history` keeps its last
/// [`MAX_HISTORY_ITEMS`] elements, and each element survives only if it has
/// an allowed role and non-blank text.
pub fn parse_request_payload(raw: &Value) -> Option<ChatCompleteRequest> {
    let object = raw.as_object()?;
    let input = non_empty_str(object.get("input"))?;

    let history = match object.get("history").and_then(Value::as_array) {
        Some(items) => {
            let start = items.len().saturating_sub(MAX_HISTORY_ITEMS);
            items[start..].iter().filter_map(parse_history_item).collect()
        }
        None => Vec::new(),
    };

    Some(ChatCompleteRequest {
        input: truncate_chars(input, MAX_TEXT_CHARS),
        history,
    })
}

fn parse_history_item(value: &Value) -> Option<ChatHistoryItem> {
    let object = value.as_object()?;
    let role = object
        .get("role")
        .and_then(Value::as_str)
        .and_then(ChatRole::parse)?;
    let text = non_empty_str(object.get("text"))?;

    Some(ChatHistoryItem {
        role,
        text: truncate_chars(text, MAX_TEXT_CHARS),
    })
}
