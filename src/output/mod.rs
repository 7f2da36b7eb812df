//! Slice output post-processing.
//!
//! # Data Flow
//! ```text
//! backend slice response
//!     → filename.rs (Content-Disposition → bare name ending in .gcode)
//!     → writer.rs   (mkdir -p output dir, write body, last write wins)
//! ```

pub mod filename;
pub mod writer;

pub use filename::{resolve_output_filename, GCODE_EXTENSION};
pub use writer::OutputDir;
