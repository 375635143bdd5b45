//! Storyline Common Utilities
//!
//! Shared infrastructure for all Storyline crates:
//! - Error types and result aliases
//! - Frame clock utilities (frame stepping, frame-grid rounding, timecode)
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
