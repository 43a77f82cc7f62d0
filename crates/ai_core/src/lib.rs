//! AI Core - Completion service client
//!
//! Talks to an OpenAI-compatible chat-completions API, either returning the
//! whole reply or a stream of incremental content deltas.

pub mod config;
pub mod error;
pub mod openai;
pub mod ports;

pub use config::CompletionConfig;
pub use error::InferenceError;
pub use openai::OpenAiCompletionEngine;
pub use ports::{
    CompletionEngine, CompletionMessage, CompletionRequest, CompletionResponse, CompletionStream,
    StreamingChunk, TokenUsage,
};
