//! Placeholder responses
//!
//! Deterministic substitute text returned when the completion service is
//! unreachable or fails. Placeholder output is never cached.

use crate::value_objects::{Fragment, Prompt};

/// Build the placeholder text for a prompt and an error description
pub fn placeholder_text(prompt: &Prompt, error: &str) -> String {
    format!("Demo response for: '{prompt}'. (API error: {error})")
}

/// Split placeholder text into word-sized fragments, each followed by a space
pub fn placeholder_fragments(text: &str) -> Vec<Fragment> {
    text.split_whitespace()
        .filter_map(|word| Fragment::new(format!("{word} ")))
        .collect()
}
