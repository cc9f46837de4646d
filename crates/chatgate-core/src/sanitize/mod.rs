//! Allow-list parsing of untrusted JSON into contract types.
//!
//! Every function here drops malformed elements instead of failing the whole
//! value: a partially broken upstream reply still yields whatever parts are
//! well formed, and nothing outside the block protocol reaches the renderer.

mod blocks;
mod reply;
mod request;

pub use blocks::normalize_ui_blocks;
pub use reply::parse_structured_reply;
pub use request::parse_request_payload;

use serde_json::Value;

/// Returns the trimmed string if `value` is a string with visible content.
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(crate) fn optional_string(value: Option<&Value>) -> Option<String> {
    non_empty_str(value).map(str::to_string)
}
