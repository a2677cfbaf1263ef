use serde::{Deserialize, Serialize};

use crate::foundation::error::{BeatreelResult, ensure_same_len};
use crate::probe::MediaFacts;
use crate::script::beat::Beat;
use crate::timeline::grouping::{GroupKind, group_runs, link_of};
use crate::timeline::padding::{PaddingPolicy, get_padding, total_padding};

/// Hard floor for beats whose length comes from nothing but the floor.
pub const MIN_BEAT_DURATION: f64 = 1.0;

const EPSILON: f64 = 1e-9;

/// Authoritative timing of one beat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciledBeat {
    /// Beat length in seconds.
    pub duration: f64,
    /// Sum of all previous durations.
    pub start_at: f64,
    /// Silence appended to the beat's own audio to reach `duration`.
    pub silence_duration: f64,
}

/// Duration and silence of one slot, before start times are assigned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotTiming {
    pub duration: f64,
    pub silence_duration: f64,
}

/// Input to [`resolve_voice_over_group`] for one beat of the group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceOverSlot {
    /// The beat's own narration length.
    pub audio_duration: f64,
    /// Offset into the movie at which the beat starts, when the author fixed it.
    pub start_at: Option<f64>,
}

/// Reconciled timeline for the whole script.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timeline {
    /// One entry per beat, in order.
    pub beats: Vec<ReconciledBeat>,
    /// Lead-in before the first beat.
    pub intro_padding: f64,
    /// Tail after the last beat.
    pub outro_padding: f64,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Sum of beat durations, without intro/outro.
    pub fn beats_duration(&self) -> f64 {
        self.beats.iter().map(|b| b.duration).sum()
    }

    /// Length of the finished video.
    pub fn total_duration(&self) -> f64 {
        if self.beats.is_empty() {
            return 0.0;
        }
        self.intro_padding + self.beats_duration() + self.outro_padding
    }

    /// Time at which beat `index`'s visual begins in the finished video.
    ///
    /// The first beat's visual starts at `0` and covers the intro padding.
    pub fn playback_start(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else {
            self.beats[index].start_at + self.intro_padding
        }
    }

    /// Interval during which beat `index`'s narration plays.
    pub fn narration_window(&self, index: usize) -> (f64, f64) {
        let b = &self.beats[index];
        let start = b.start_at + self.intro_padding;
        (start, start + b.duration)
    }
}

/// Turn per-beat media facts into one consistent timeline.
///
/// Only array-length mismatches fail; missing audio or zero-length media become silence.
#[tracing::instrument(skip_all, fields(beats = beats.len()))]
pub fn reconcile(
    beats: &[Beat],
    facts: &[MediaFacts],
    policy: &PaddingPolicy,
) -> BeatreelResult<Timeline> {
    ensure_same_len("beats vs media facts", beats.len(), facts.len())?;

    let total = beats.len();
    let links: Vec<_> = beats
        .iter()
        .zip(facts)
        .map(|(beat, f)| link_of(beat, f))
        .collect();

    let mut slots = Vec::with_capacity(total);
    for group in group_runs(&links) {
        let range = group.range.clone();
        let owner = &facts[range.start];
        let resolved = match group.kind {
            GroupKind::Single if owner.has_media || beats[range.start].is_movie() => {
                vec![resolve_single(
                    &beats[range.start],
                    owner,
                    range.start,
                    total,
                    policy,
                )]
            }
            GroupKind::Single | GroupKind::Spillover => {
                let explicit: Vec<_> = beats[range.clone()].iter().map(|b| b.duration).collect();
                resolve_spillover_group(&explicit, owner.audio_duration)
            }
            GroupKind::VoiceOver => {
                let members: Vec<_> = range
                    .clone()
                    .map(|i| VoiceOverSlot {
                        audio_duration: facts[i].audio_duration,
                        start_at: beats[i].voice_over_start(),
                    })
                    .collect();
                resolve_voice_over_group(&members, owner.movie_duration)
            }
        };
        ensure_same_len("group timings vs group beats", resolved.len(), range.len())?;
        tracing::debug!(kind = ?group.kind, start = range.start, end = range.end, "resolved beat group");
        slots.extend(resolved);
    }
    ensure_same_len("reconciled beats vs beats", slots.len(), total)?;

    let mut start_at = 0.0;
    let reconciled = slots
        .into_iter()
        .map(|slot| {
            let b = ReconciledBeat {
                duration: slot.duration,
                start_at,
                silence_duration: slot.silence_duration,
            };
            start_at += slot.duration;
            b
        })
        .collect();

    Ok(Timeline {
        beats: reconciled,
        intro_padding: policy.intro_padding,
        outro_padding: policy.outro_padding,
    })
}

fn resolve_single(
    beat: &Beat,
    facts: &MediaFacts,
    index: usize,
    total: usize,
    policy: &PaddingPolicy,
) -> SlotTiming {
    let padding = get_padding(beat, index, total, policy);
    let extra = total_padding(
        padding,
        facts.movie_duration,
        facts.audio_duration,
        beat.duration,
    );
    let mut duration = facts.audio_duration + extra;
    if duration <= EPSILON {
        duration = MIN_BEAT_DURATION;
    }
    SlotTiming {
        duration,
        silence_duration: (duration - facts.audio_duration).max(0.0),
    }
}

/// Spread one owned audio asset across a run of beats.
///
/// `explicit` holds each beat's author-given duration. Target durations are always honored;
/// whatever the audio cannot cover is reported as silence.
pub fn resolve_spillover_group(explicit: &[Option<f64>], total_audio: f64) -> Vec<SlotTiming> {
    let specified_sum: f64 = explicit.iter().flatten().sum();
    let unspecified = explicit.iter().filter(|d| d.is_none()).count();
    let share = if unspecified > 0 {
        ((total_audio - specified_sum) / unspecified as f64).max(MIN_BEAT_DURATION)
    } else {
        0.0
    };

    let mut durations: Vec<f64> = explicit.iter().map(|d| d.unwrap_or(share)).collect();
    let planned: f64 = durations.iter().sum();
    if total_audio - planned > EPSILON
        && let Some(last) = durations.last_mut()
    {
        *last += total_audio - planned;
    }

    let mut audio_remaining = total_audio;
    durations
        .into_iter()
        .map(|duration| {
            let silence_duration = if duration - audio_remaining <= EPSILON {
                audio_remaining = (audio_remaining - duration).max(0.0);
                0.0
            } else {
                let silence = duration - audio_remaining;
                audio_remaining = 0.0;
                silence
            };
            SlotTiming {
                duration,
                silence_duration,
            }
        })
        .collect()
}

/// Divide a movie's length between its owning beat and the voice-overs that follow it.
///
/// The durations sum to `movie_duration`: the last member takes whatever is left.
pub fn resolve_voice_over_group(members: &[VoiceOverSlot], movie_duration: f64) -> Vec<SlotTiming> {
    let mut out = Vec::with_capacity(members.len());
    let mut elapsed = 0.0;
    let mut movie_remaining = movie_duration;

    for (k, member) in members.iter().enumerate() {
        let next_start = members.get(k + 1).and_then(|m| m.start_at);
        let mut duration = match next_start {
            _ if k + 1 == members.len() => movie_remaining,
            Some(next) => next - elapsed,
            // Falls back to the beat's own audio rather than splitting the rest of the movie.
            None => member.audio_duration,
        };
        if duration < 0.0 {
            tracing::warn!(
                member = k,
                duration,
                "voice-over group overruns its movie; clamping to zero"
            );
            duration = 0.0;
        }

        out.push(SlotTiming {
            duration,
            silence_duration: (duration - member.audio_duration).max(0.0),
        });
        elapsed += duration;
        movie_remaining -= duration;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/reconcile.rs"]
mod tests;
