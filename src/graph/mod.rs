//! Composition graph builder.
//!
//! Everything here produces [`ast::FilterGraph`] values; nothing touches the filesystem or spawns
//! processes.

/// Typed filter-graph AST and its wire serialization.
pub mod ast;
/// Embedded movie audio chains and the final mix.
pub mod audio;
/// Whole-script graph assembly.
pub mod builder;
/// Caption and transition compositing.
pub mod overlay;
/// Per-beat visual chains and frame extraction.
pub mod video;
