//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod cache_port;
mod inference_port;

#[cfg(test)]
pub use cache_port::MockCachePort;
pub use cache_port::{CacheLookup, CachePort, CacheWrite, ttl};
#[cfg(test)]
pub use inference_port::MockInferencePort;
pub use inference_port::{InferencePort, InferenceResult, InferenceStream};
