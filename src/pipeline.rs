//! The ordered render pipeline: validate, probe, reconcile, plan, build, encode.
//!
//! Every failure except the encoder's own is raised before the encoder is spawned.

use std::ffi::OsString;
use std::path::Path;

use crate::encode::ffmpeg::{CompositionEngine, EncodeReport, encoder_args};
use crate::foundation::error::BeatreelResult;
use crate::graph::ast::FilterGraph;
use crate::graph::builder::{GraphOptions, build, check_visual_media};
use crate::probe::{MediaFacts, MediaProbe, check_still_images, probe_all};
use crate::script::load::{Script, Settings};
use crate::timeline::reconcile::{Timeline, reconcile};
use crate::transition::plan::{TransitionPlan, plan};

/// Everything up to (not including) the encoder run.
#[derive(Clone, Debug)]
pub struct Prepared {
    pub facts: Vec<MediaFacts>,
    pub timeline: Timeline,
    pub plan: TransitionPlan,
    pub graph: FilterGraph,
}

impl Prepared {
    /// Encoder arguments this preparation would run with.
    pub fn encoder_args(&self, settings: &Settings, out_path: &Path) -> Vec<OsString> {
        encoder_args(
            &self.graph,
            settings.fps,
            self.timeline.total_duration(),
            &settings.encoder,
            out_path,
        )
    }
}

impl From<&Settings> for GraphOptions {
    fn from(s: &Settings) -> Self {
        Self {
            canvas: s.canvas,
            fps: s.fps,
            captions: s.captions,
        }
    }
}

/// Run every pure stage for `script`.
#[tracing::instrument(skip_all, fields(beats = script.beats.len()))]
pub fn prepare(script: &Script, probe: &dyn MediaProbe) -> BeatreelResult<Prepared> {
    check_visual_media(&script.beats)?;
    let facts = probe_all(probe, &script.beats)?;
    let timeline = reconcile(&script.beats, &facts, &script.policy)?;
    let plan = plan(&timeline, &script.beats, script.settings.fps)?;
    let graph = build(
        &script.beats,
        &facts,
        &timeline,
        &plan,
        script.narration.as_deref(),
        &GraphOptions::from(&script.settings),
    )?;
    tracing::info!(
        total_s = timeline.total_duration(),
        transitions = plan.entries.len(),
        "prepared composition"
    );
    Ok(Prepared {
        facts,
        timeline,
        plan,
        graph,
    })
}

/// Render `script` to `out_path` with the system `ffmpeg`.
pub fn render(
    script: &Script,
    probe: &dyn MediaProbe,
    out_path: &Path,
) -> BeatreelResult<EncodeReport> {
    let engine = CompositionEngine::new(script.settings.encoder.clone());
    render_with(&engine, script, probe, out_path)
}

/// Render `script` to `out_path` with an explicit engine.
pub fn render_with(
    engine: &CompositionEngine,
    script: &Script,
    probe: &dyn MediaProbe,
    out_path: &Path,
) -> BeatreelResult<EncodeReport> {
    let prepared = prepare(script, probe)?;
    check_still_images(&script.beats)?;
    engine.encode(
        &prepared.graph,
        script.settings.fps,
        prepared.timeline.total_duration(),
        out_path,
    )
}
