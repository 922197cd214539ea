//! Splitting raw shape and page text into bullet fragments.
//!
//! Slide text arrives as whole text frames; bullets are recovered by
//! splitting on line breaks and on the bullet markers authors type by hand.

use regex::Regex;
use std::sync::LazyLock;

/// Line breaks and hand-typed bullet markers (`•`, `- `).
static BULLET_SPLIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|•|- ").unwrap());

/// Split shape text into trimmed, non-empty bullet fragments.
///
/// A dash only counts as a marker when followed by a space, so hyphenated
/// words such as "year-end" stay whole.
pub fn split_bullets(text: &str) -> Vec<String> {
    BULLET_SPLIT_REGEX
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split page text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
