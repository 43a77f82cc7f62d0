//! Application layer - Use cases and orchestration
//!
//! Defines the ports to the cache store and the completion service, and the
//! completion relay that combines them.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
