//! beatreel turns an ordered list of narrated beats into one encoded video.
//!
//! # Pipeline overview
//!
//! 1. **Load**: JSON script -> [`Script`] (typed beats, settings, padding policy)
//! 2. **Probe**: beats -> [`MediaFacts`] (durations of the produced media)
//! 3. **Reconcile**: facts -> [`Timeline`] (authoritative duration/start/silence per beat)
//! 4. **Plan**: timeline -> [`TransitionPlan`] (clamped transition windows, frame-extraction flags)
//! 5. **Build**: everything above -> [`FilterGraph`] (typed `-filter_complex` AST)
//! 6. **Encode**: one `ffmpeg` invocation via [`CompositionEngine`]
//!
//! Stages 1-5 are pure and synchronous; only stage 6 spawns a process.
#![forbid(unsafe_code)]

/// Encoder invocation.
pub mod encode;
/// Shared value types and errors.
pub mod foundation;
/// Filter-graph construction.
pub mod graph;
/// Ordered pipeline entry points.
pub mod pipeline;
/// Media facts and probes.
pub mod probe;
/// Script loading.
pub mod script;
/// Beat timeline reconciliation.
pub mod timeline;
/// Transition planning.
pub mod transition;

pub use crate::encode::ffmpeg::{CompositionEngine, EncodeReport, EncoderSettings};
pub use crate::foundation::core::{Canvas, Fps};
pub use crate::foundation::error::{BeatreelError, BeatreelResult};
pub use crate::graph::ast::FilterGraph;
pub use crate::graph::builder::GraphOptions;
pub use crate::pipeline::{Prepared, prepare, render};
pub use crate::probe::ffprobe::FfprobeProbe;
pub use crate::probe::{FixedProbe, MediaFacts, MediaProbe};
pub use crate::script::beat::{Beat, BeatKind, FillOption};
pub use crate::script::load::{Script, Settings};
pub use crate::timeline::padding::PaddingPolicy;
pub use crate::timeline::reconcile::{ReconciledBeat, Timeline, reconcile};
pub use crate::transition::kind::{SlideDir, TransitionKind};
pub use crate::transition::plan::{TransitionPlan, TransitionPlanEntry};
