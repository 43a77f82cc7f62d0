//! Domain layer for the chat relay
//!
//! Contains the value objects shared by every layer: prompts, cache keys,
//! streamed fragments and the placeholder text used when the completion
//! service fails. This layer performs no I/O.

pub mod errors;
pub mod placeholder;
pub mod value_objects;

pub use errors::DomainError;
pub use placeholder::{placeholder_fragments, placeholder_text};
pub use value_objects::*;
