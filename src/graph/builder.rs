use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{BeatreelError, BeatreelResult, ensure_same_len};
use crate::graph::ast::{Filter, FilterChain, FilterGraph, InputSpec, Pad};
use crate::graph::audio::{bed_chain, mix_chain, movie_audio_chain};
use crate::graph::overlay::{TransitionLayers, caption_chain, transition_chains};
use crate::graph::video::{ExtractedFrames, VisualSource, add_split_and_extract_frames, visual_chain};
use crate::probe::MediaFacts;
use crate::script::beat::{Beat, BeatKind};
use crate::timeline::reconcile::Timeline;
use crate::transition::plan::{TransitionPlan, visual_span};

/// Output settings the graph depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphOptions {
    pub canvas: Canvas,
    pub fps: Fps,
    /// Overlay caption images.
    pub captions: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            captions: true,
        }
    }
}

/// Fail with [`BeatreelError::MissingMedia`] for the first beat that needs a visual and has none.
pub fn check_visual_media(beats: &[Beat]) -> BeatreelResult<()> {
    match beats.iter().position(|b| matches!(b.kind, BeatKind::Plain)) {
        Some(beat) => Err(BeatreelError::MissingMedia { beat }),
        None => Ok(()),
    }
}

/// Assemble the complete composition graph for one render.
#[tracing::instrument(skip_all, fields(beats = beats.len()))]
pub fn build(
    beats: &[Beat],
    facts: &[MediaFacts],
    timeline: &Timeline,
    plan: &TransitionPlan,
    narration: Option<&Path>,
    opts: &GraphOptions,
) -> BeatreelResult<FilterGraph> {
    ensure_same_len("beats vs media facts", beats.len(), facts.len())?;
    ensure_same_len("beats vs timeline", beats.len(), timeline.len())?;
    ensure_same_len(
        "beats vs first-frame flags",
        beats.len(),
        plan.needs_first_frame.len(),
    )?;
    ensure_same_len(
        "beats vs last-frame flags",
        beats.len(),
        plan.needs_last_frame.len(),
    )?;
    if beats.is_empty() {
        return Err(BeatreelError::validation("script has no beats"));
    }

    let last_visual = beats
        .iter()
        .rposition(|b| !b.is_voice_over())
        .ok_or_else(|| BeatreelError::validation("script has no visual beats"))?;

    let mut inputs = Vec::new();
    let mut chains = Vec::new();
    let mut segments = Vec::new();
    let mut frames: Vec<Option<ExtractedFrames>> = vec![None; beats.len()];
    let mut movie_tracks = Vec::new();

    for (i, beat) in beats.iter().enumerate() {
        let (spec, source, volume) = match &beat.kind {
            BeatKind::VoiceOver(_) => continue,
            BeatKind::Plain => return Err(BeatreelError::MissingMedia { beat: i }),
            BeatKind::Image(image) => (
                InputSpec::looped_image(&image.path, opts.fps.0),
                VisualSource::Image,
                0.0,
            ),
            BeatKind::Movie(movie) => (
                InputSpec::file(&movie.path),
                VisualSource::Movie { speed: beat.speed },
                movie.volume,
            ),
        };

        let mut segment = visual_span(timeline, beats, i);
        if i == 0 {
            segment += timeline.intro_padding;
        }
        if i == last_visual {
            segment += timeline.outro_padding;
        }

        let input = inputs.len();
        inputs.push(spec);
        let stream = Pad::label(format!("v{i}"));
        chains.push(visual_chain(
            input,
            source,
            segment,
            beat.fill,
            opts.canvas,
            opts.fps,
            stream.clone(),
        ));

        let first = plan
            .entry_for(i)
            .filter(|_| plan.needs_first_frame[i])
            .map(|e| e.window());
        let last = plan
            .entry_after(i)
            .filter(|_| plan.needs_last_frame[i])
            .map(|e| e.window());
        let extracted = add_split_and_extract_frames(
            &mut chains,
            i,
            stream,
            source,
            first,
            last,
            opts.canvas,
            opts.fps,
        );
        segments.push(extracted.main.clone());
        frames[i] = Some(extracted);

        if beat.is_movie() && facts[i].has_movie_audio && volume > 0.0 {
            let (chain, pad) = movie_audio_chain(
                input,
                i,
                beat.speed,
                segment,
                timeline.playback_start(i),
                volume,
            );
            chains.push(chain);
            movie_tracks.push(pad);
        }
    }

    let mut acc = Pad::label("vconcat");
    chains.push(FilterChain::new(
        segments.clone(),
        vec![
            Filter::new("concat")
                .kv("n", segments.len())
                .kv("v", 1)
                .kv("a", 0),
        ],
        vec![acc.clone()],
    ));

    if opts.captions {
        for (n, (i, caption)) in beats
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.caption.as_ref().map(|c| (i, c)))
            .enumerate()
        {
            let input = inputs.len();
            inputs.push(InputSpec::file(caption));
            let (start, end) = timeline.narration_window(i);
            let (chain, out) = caption_chain(acc, input, start, end, n);
            chains.push(chain);
            acc = out;
        }
    }

    for entry in &plan.entries {
        let layer_of = |beat: usize, pick: fn(&ExtractedFrames) -> Option<Pad>| {
            frames.get(beat).and_then(Option::as_ref).and_then(pick)
        };
        let prev_last = layer_of(entry.prev_visual, |f| f.last.clone()).ok_or_else(|| {
            BeatreelError::invariant(format!(
                "transition at beat {} has no last-frame layer for beat {}",
                entry.beat, entry.prev_visual
            ))
        })?;
        let layers = TransitionLayers {
            prev_last,
            first: layer_of(entry.beat, |f| f.first.clone()),
        };
        acc = transition_chains(
            &mut chains,
            acc,
            entry,
            timeline.playback_start(entry.beat),
            layers,
            opts.canvas,
        )?;
    }

    let video_out = Pad::label("vout");
    chains.push(FilterChain::simple(
        acc,
        vec![Filter::new("format").value("yuv420p")],
        video_out.clone(),
    ));

    let narration_input = narration.map(|path| {
        inputs.push(InputSpec::file(path));
        inputs.len() - 1
    });
    let (bed, bed_pad) = bed_chain(narration_input, timeline.total_duration());
    chains.push(bed);
    let (mix, audio_out) = mix_chain(bed_pad, movie_tracks);
    chains.push(mix);

    tracing::debug!(
        inputs = inputs.len(),
        chains = chains.len(),
        "built composition graph"
    );
    Ok(FilterGraph {
        inputs,
        chains,
        video_out,
        audio_out,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/graph/builder.rs"]
mod tests;
