//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, prefix mount)
//!     → request.rs (request ID, Payload extraction)
//!     → api handlers
//!     → response.rs (Reply: JSON or raw body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Payload, X_REQUEST_ID};
pub use response::Reply;
pub use server::{AppState, HttpServer};
