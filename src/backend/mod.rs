//! Slicer backend client subsystem.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → simple.rs  (GET/DELETE, no body, shared pooled client, JSON result)
//!     → forward.rs (POST/PUT/PATCH, raw body + content type, raw response)
//!     → slicer service at base_url
//! ```
//!
//! # Design Decisions
//! - Transport failures and timeouts both surface as `BackendUnreachable` (503)
//! - The with-body client never interprets status codes; handlers do
//! - No retries: the UI owns retry policy

pub mod forward;
pub mod simple;
pub mod types;

pub use forward::ForwardClient;
pub use simple::SimpleClient;
pub use types::{BackendEndpoint, BackendResponse, CallTimeouts, SimpleMethod};
