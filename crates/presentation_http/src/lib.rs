//! Chat relay HTTP presentation layer
//!
//! Exposes the completion relay over `POST /chat` and the `/chat/ws`
//! WebSocket endpoint, plus a liveness route at `/`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
