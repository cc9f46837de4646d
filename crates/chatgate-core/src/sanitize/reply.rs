use serde_json::Value;

use crate::error::CoreError;
use crate::limits::{MAX_REPLY_CHARS, truncate_chars};
use crate::models::reply::StructuredReply;
use crate::sanitize::{non_empty_str, normalize_ui_blocks};

/// Turn model output text into a [`StructuredReply`].
///
/// Text that does not start with `{` is a plain reply. Text that does must be
/// valid JSON; a parse failure is returned to the caller rather than hidden.
/// A JSON object without a usable `reply` or `message` falls back to the raw
/// text as a plain reply.
pub fn parse_structured_reply(output_text: &str) -> Result<StructuredReply, CoreError> {
    let trimmed = output_text.trim();
    if !trimmed.starts_with('{') {
        return Ok(StructuredReply::plain(truncate_chars(trimmed, MAX_REPLY_CHARS)));
    }

    let parsed: Value = serde_json::from_str(trimmed)?;

    let Some(reply) =
        non_empty_str(parsed.get("reply")).or_else(|| non_empty_str(parsed.get("message")))
    else {
        return Ok(StructuredReply::plain(truncate_chars(trimmed, MAX_REPLY_CHARS)));
    };

    Ok(StructuredReply {
        reply: truncate_chars(reply, MAX_REPLY_CHARS),
        ui: normalize_ui_blocks(parsed.get("ui")),
    })
}
