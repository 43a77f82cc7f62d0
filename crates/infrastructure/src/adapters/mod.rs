//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod openai_inference_adapter;

pub use openai_inference_adapter::OpenAiInferenceAdapter;
