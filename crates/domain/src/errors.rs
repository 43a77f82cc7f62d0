//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A fragment must carry visible text
    #[error("Fragment is empty or whitespace-only")]
    BlankFragment,
}
