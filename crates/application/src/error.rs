//! Application-level errors

use thiserror::Error;

/// Errors that can occur in the application layer.
///
/// The relay replaces inference failures with placeholder output; only
/// `Serialization` (a corrupt cached stream) reaches a transport.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Completion service failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// External service error (connectivity, rate limits)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ApplicationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
