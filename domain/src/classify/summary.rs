//! Response summarization.

use crate::util::{collapse_whitespace, first_sentence, truncate_chars};

/// Longest summary that passes through unshortened.
pub const MAX_SUMMARY_CHARS: usize = 280;

/// Produce a compact summary of a raw response.
///
/// Whitespace is collapsed first. Responses up to [`MAX_SUMMARY_CHARS`]
/// characters pass through unchanged; longer ones shrink to their first
/// sentence, or to a truncated prefix with an ellipsis marker when no
/// sentence boundary exists.
pub fn summarize(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= MAX_SUMMARY_CHARS {
        return collapsed;
    }
    match first_sentence(&collapsed) {
        Some(sentence) => sentence.to_string(),
        None => format!("{}...", truncate_chars(&collapsed, MAX_SUMMARY_CHARS).trim()),
    }
}
