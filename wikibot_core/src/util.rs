//! Text helpers for session summaries.

/// Marker appended to text cut short by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Cut `text` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was dropped.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
