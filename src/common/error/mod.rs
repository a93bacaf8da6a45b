//! Unified error types for ywodt.
//!
//! This module provides the single error type returned by the decoder, the
//! container reader and the pre-pass.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
