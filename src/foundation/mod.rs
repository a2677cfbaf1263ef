//! Shared value types and the crate error.

/// Core value types (frame rate, canvas, time formatting).
pub mod core;
/// Error taxonomy.
pub mod error;
