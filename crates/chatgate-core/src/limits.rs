//! Bounds applied to everything that crosses the proxy boundary.

/// Maximum number of history items forwarded upstream.
pub const MAX_HISTORY_ITEMS: usize = 24;

/// Maximum characters kept from the user input and each history text.
pub const MAX_TEXT_CHARS: usize = 3000;

/// Maximum characters kept from an assistant reply.
pub const MAX_REPLY_CHARS: usize = 3000;

/// Maximum UI blocks inspected per reply.
pub const MAX_UI_BLOCKS: usize = 6;

/// Maximum options in a quick-replies block, items in a menu, or choices in a
/// select field.
pub const MAX_ACTION_OPTIONS: usize = 10;

/// Maximum fields in a form block.
pub const MAX_FORM_FIELDS: usize = 8;

/// Truncate `text` to at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
