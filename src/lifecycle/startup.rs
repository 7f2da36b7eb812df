//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration before anything is built
//! - Build the backend clients and output directory handle
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener is bound by the caller and handed in last

use thiserror::Error;

use crate::config::validation::{join_errors, ValidationError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("invalid backend URL: {0}")]
    BackendUrl(#[from] url::ParseError),

    #[error("failed to build backend HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
