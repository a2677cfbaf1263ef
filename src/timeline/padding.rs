use serde::{Deserialize, Serialize};

use crate::script::beat::Beat;

/// Global gap policy between beats.
///
/// Per-beat overrides live on [`Beat::padding`]; an explicit `0` there is honored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingPolicy {
    /// Gap appended after ordinary beats.
    #[serde(rename = "default")]
    pub default_padding: f64,
    /// Gap appended after the second-to-last beat.
    #[serde(rename = "closing")]
    pub closing_padding: f64,
    /// Lead-in before the first beat, applied by the composer.
    #[serde(rename = "intro")]
    pub intro_padding: f64,
    /// Tail after the last beat, applied by the composer.
    #[serde(rename = "outro")]
    pub outro_padding: f64,
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self {
            default_padding: 0.3,
            closing_padding: 0.8,
            intro_padding: 1.0,
            outro_padding: 1.0,
        }
    }
}

impl PaddingPolicy {
    /// Policy with every gap set to zero.
    pub fn none() -> Self {
        Self {
            default_padding: 0.0,
            closing_padding: 0.0,
            intro_padding: 0.0,
            outro_padding: 0.0,
        }
    }
}

/// Padding that follows beat `index` of `total`.
///
/// The last beat gets `0`: outro padding is added outside the beat track.
pub fn get_padding(beat: &Beat, index: usize, total: usize, policy: &PaddingPolicy) -> f64 {
    if let Some(p) = beat.padding {
        return p;
    }
    if index + 1 == total {
        0.0
    } else if index + 2 == total {
        policy.closing_padding
    } else {
        policy.default_padding
    }
}

/// Time added on top of a beat's own audio.
///
/// With a movie the result is `padding + movie - audio`, which can be negative when the
/// narration outlasts the clip: movie length always decides the beat duration.
///
/// An explicit duration longer than the audio is the whole beat, padding included, so a
/// reconciled duration fed back in as explicit comes out unchanged.
pub fn total_padding(
    padding: f64,
    movie_duration: f64,
    audio_duration: f64,
    explicit_duration: Option<f64>,
) -> f64 {
    if movie_duration > 0.0 {
        return padding + (movie_duration - audio_duration);
    }
    match explicit_duration {
        Some(d) if d > audio_duration => d - audio_duration,
        _ => padding,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/padding.rs"]
mod tests;
