//! Shape matchers for JSON envelopes that arrive in more than one form.
//!
//! Each matcher inspects one known shape and returns `None` when the value
//! does not have it; callers try the matchers in order and take the first
//! hit.

use serde_json::Value;

use crate::limits::{MAX_REPLY_CHARS, truncate_chars};
use crate::models::reply::StructuredReply;
use crate::sanitize::{non_empty_str, normalize_ui_blocks};

/// Message returned to clients when the upstream error body is unusable.
pub const UPSTREAM_ERROR_FALLBACK: &str = "Upstream provider request failed.";

type OutputTextShape = fn(&Value) -> Option<String>;

const OUTPUT_TEXT_SHAPES: [OutputTextShape; 3] = [output_text_field, chat_choice, output_chunks];

type ReplyShape = fn(&Value) -> Option<StructuredReply>;

const REPLY_SHAPES: [ReplyShape; 3] = [success_envelope, reply_object, message_object];

/// Pull the generated text out of an upstream completion payload.
///
/// Understands a top-level `output_text` string, chat-style
/// `choices[0].message.content`, and `output[].content[].text` chunks (joined
/// with newlines). Returns `None` when no shape yields visible text.
pub fn extract_output_text(payload: &Value) -> Option<String> {
    OUTPUT_TEXT_SHAPES.iter().find_map(|shape| shape(payload))
}

/// Best-effort `error.message` from an upstream error body.
pub fn to_upstream_error_message(payload: &Value) -> String {
    payload
        .get("error")
        .and_then(|error| non_empty_str(error.get("message")))
        .unwrap_or(UPSTREAM_ERROR_FALLBACK)
        .to_string()
}

/// Decode a completion response body into a [`StructuredReply`].
///
/// Accepts `{success: true, data: ...}` wrapping either of the bare shapes,
/// `{reply, ui?}`, and `{message, ui?}`. The `ui` member is sanitized again
/// so a client never trusts blocks it did not validate itself.
pub fn structured_reply_from_value(value: &Value) -> Option<StructuredReply> {
    REPLY_SHAPES.iter().find_map(|shape| shape(value))
}

fn output_text_field(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("output_text")).map(str::to_string)
}

fn chat_choice(payload: &Value) -> Option<String> {
    let message = payload.get("choices")?.as_array()?.first()?.get("message")?;
    non_empty_str(message.get("content")).map(str::to_string)
}

fn output_chunks(payload: &Value) -> Option<String> {
    let chunks: Vec<&str> = payload
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|chunk| chunk.get("text").and_then(Value::as_str))
        .collect();

    let joined = chunks.join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn success_envelope(value: &Value) -> Option<StructuredReply> {
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    let data = value.get("data")?;
    reply_object(data).or_else(|| message_object(data))
}

fn reply_object(value: &Value) -> Option<StructuredReply> {
    bare_reply(value, "reply")
}

fn message_object(value: &Value) -> Option<StructuredReply> {
    bare_reply(value, "message")
}

fn bare_reply(value: &Value, key: &str) -> Option<StructuredReply> {
    let reply = non_empty_str(value.get(key))?;
    Some(StructuredReply {
        reply: truncate_chars(reply, MAX_REPLY_CHARS),
        ui: normalize_ui_blocks(value.get("ui")),
    })
}
