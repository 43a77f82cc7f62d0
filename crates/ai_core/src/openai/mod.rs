//! OpenAI-compatible chat-completions client

mod client;
mod streaming;

pub use client::OpenAiCompletionEngine;
