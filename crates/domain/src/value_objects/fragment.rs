//! Streamed text fragment

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One incremental piece of generated text.
///
/// A fragment always carries visible text: empty and whitespace-only chunks
/// from the upstream are rejected at construction and never reach a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fragment(String);

impl Fragment {
    /// Create a fragment, returning `None` for blank text
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Borrow the fragment text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the fragment and return the inner text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Fragment {
    type Error = DomainError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text).ok_or(DomainError::BlankFragment)
    }
}

impl From<Fragment> for String {
    fn from(fragment: Fragment) -> Self {
        fragment.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
