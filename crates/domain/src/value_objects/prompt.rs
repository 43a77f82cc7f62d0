//! Prompt value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text supplied by a client, forwarded verbatim to the completion service.
///
/// A prompt is never trimmed or normalized: two prompts that differ only in
/// trailing whitespace are different prompts and land in different cache
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// Wrap raw client text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Borrow the prompt text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes, used for logging instead of the content itself
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the prompt has no characters at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the prompt and return the inner text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
