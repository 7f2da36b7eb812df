//! Slicer proxy library.
//!
//! A thin REST gateway between a browser UI and a slicer service: profile
//! management and health calls pass through, slicing results are written to
//! the printer's G-code directory.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod output;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
