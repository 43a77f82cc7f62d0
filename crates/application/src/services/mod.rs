//! Application services

mod completion_relay;

pub use completion_relay::{CompletionRelay, FragmentStream, RelayConfig};
