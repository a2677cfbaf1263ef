//! Script loading: JSON boundary model lowered into typed beats.

/// Typed beat variants.
pub mod beat;
/// Script loading and validation.
pub mod load;
pub(crate) mod model;
