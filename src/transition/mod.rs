//! Transition kinds and the transition planner.

/// Transition names and parsing.
pub mod kind;
/// Transition window clamping and frame-extraction flags.
pub mod plan;
