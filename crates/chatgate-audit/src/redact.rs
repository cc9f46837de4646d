use std::sync::LazyLock;

use regex::Regex;

/// Maximum characters in a redacted preview.
pub const MAX_PREVIEW_CHARS: usize = 220;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{6,}").expect("number pattern is valid"));

/// Mask email addresses and runs of six or more digits, then cap the result
/// to [`MAX_PREVIEW_CHARS`] characters.
///
/// Masking happens before truncation so a cut can never expose part of a
/// value that would have been replaced.
pub fn redact_audit_text(input: &str) -> String {
    let masked = EMAIL.replace_all(input, "[email]");
    let masked = LONG_NUMBER.replace_all(&masked, "[number]");

    match masked.char_indices().nth(MAX_PREVIEW_CHARS) {
        Some((idx, _)) => masked[..idx].to_string(),
        None => masked.into_owned(),
    }
}
