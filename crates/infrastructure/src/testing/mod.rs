//! Testing utilities for infrastructure integration tests.
//!
//! Runs a real Redis in a container via testcontainers. Tests using it are
//! marked `#[ignore]` since they require Docker; run them with
//! `cargo test -- --ignored`.

mod containers;

pub use containers::{ContainerError, RedisContainer, RedisContainerConfig};
