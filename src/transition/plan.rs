use crate::foundation::core::Fps;
use crate::foundation::error::{BeatreelResult, ensure_same_len};
use crate::script::beat::Beat;
use crate::timeline::reconcile::Timeline;
use crate::transition::kind::TransitionKind;

/// Share of an adjacent beat a transition may consume at most.
pub const MAX_BEAT_SHARE: f64 = 0.9;

/// Clamped timing of one transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionPlanEntry {
    /// Beat that declares the transition.
    pub beat: usize,
    /// Visual beat shown before `beat`.
    pub prev_visual: usize,
    pub kind: TransitionKind,
    /// Seconds taken from the previous visual beat.
    pub first_duration: f64,
    /// Seconds taken from this beat.
    pub last_duration: f64,
}

impl TransitionPlanEntry {
    /// On-screen length: never more than 90% of either neighbour.
    pub fn window(&self) -> f64 {
        self.first_duration.min(self.last_duration)
    }
}

/// Which beats need frame extraction, and how long every transition runs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionPlan {
    /// One entry per transition, in beat order.
    pub entries: Vec<TransitionPlanEntry>,
    /// Beat `i` must expose its first frame.
    pub needs_first_frame: Vec<bool>,
    /// Beat `i` must expose its last frame.
    pub needs_last_frame: Vec<bool>,
}

impl TransitionPlan {
    /// Transition declared by `beat`, if any.
    pub fn entry_for(&self, beat: usize) -> Option<&TransitionPlanEntry> {
        self.entries.iter().find(|e| e.beat == beat)
    }

    /// Transition that consumes the last frame of `prev_visual`, if any.
    pub fn entry_after(&self, prev_visual: usize) -> Option<&TransitionPlanEntry> {
        self.entries.iter().find(|e| e.prev_visual == prev_visual)
    }
}

/// Clamp a requested transition length against the beats on either side.
///
/// Returns `(first, last)`: each is `requested` limited to 90% of its beat and floored at one
/// frame. Without a previous beat `first` is the one-frame minimum.
pub fn transition_frame_durations(
    requested: f64,
    prev_duration: Option<f64>,
    duration: f64,
    fps: Fps,
) -> (f64, f64) {
    let min_frame = fps.frame_sec();
    let clamp = |span: f64| requested.min(span * MAX_BEAT_SHARE).max(min_frame);
    let first = prev_duration.map_or(min_frame, clamp);
    (first, clamp(duration))
}

/// Plan every transition of the script against the reconciled timeline.
pub fn plan(timeline: &Timeline, beats: &[Beat], fps: Fps) -> BeatreelResult<TransitionPlan> {
    ensure_same_len("timeline vs beats", timeline.len(), beats.len())?;

    let n = beats.len();
    let mut out = TransitionPlan {
        entries: Vec::new(),
        needs_first_frame: vec![false; n],
        needs_last_frame: vec![false; n],
    };

    for (i, beat) in beats.iter().enumerate().skip(1) {
        // Voice-overs play on top of their movie and have no boundary to transition across.
        if beat.is_voice_over() {
            continue;
        }
        let Some(spec) = beat.transition else {
            continue;
        };

        let prev_visual = visual_owner(beats, i - 1);
        let (first_duration, last_duration) = transition_frame_durations(
            spec.duration,
            Some(visual_span(timeline, beats, prev_visual)),
            visual_span(timeline, beats, i),
            fps,
        );

        out.needs_last_frame[prev_visual] = true;
        if spec.kind.needs_first_frame() {
            out.needs_first_frame[i] = true;
        }
        out.entries.push(TransitionPlanEntry {
            beat: i,
            prev_visual,
            kind: spec.kind,
            first_duration,
            last_duration,
        });
    }

    tracing::debug!(transitions = out.entries.len(), "planned transitions");
    Ok(out)
}

/// The beat whose visual is on screen during beat `index`.
pub(crate) fn visual_owner(beats: &[Beat], index: usize) -> usize {
    let mut i = index;
    while i > 0 && beats[i].is_voice_over() {
        i -= 1;
    }
    i
}

/// Reconciled length of a visual beat plus the voice-overs it carries.
pub(crate) fn visual_span(timeline: &Timeline, beats: &[Beat], index: usize) -> f64 {
    let mut span = timeline.beats[index].duration;
    for (beat, timing) in beats.iter().zip(&timeline.beats).skip(index + 1) {
        if !beat.is_voice_over() {
            break;
        }
        span += timing.duration;
    }
    span
}

#[cfg(test)]
#[path = "../../tests/unit/transition/plan.rs"]
mod tests;
