//! Media facts: what the produced files of each beat actually contain.
//!
//! Reconciliation consumes [`MediaFacts`] only, never files, so any probe can feed it.

/// `ffprobe`-backed probe (requires the `media-ffmpeg` feature).
pub mod ffprobe;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{BeatreelError, BeatreelResult};
use crate::script::beat::{Beat, BeatKind};

/// Raw duration/existence facts for one beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFacts {
    /// Playback length of the beat's movie (already divided by speed), `0` without a movie.
    pub movie_duration: f64,
    /// Length of the beat's own narration audio.
    pub audio_duration: f64,
    /// The beat owns a produced audio or movie asset.
    pub has_media: bool,
    /// The beat's movie has an embedded audio track.
    pub has_movie_audio: bool,
}

/// Source of [`MediaFacts`].
pub trait MediaProbe {
    /// Facts for beat `index`.
    fn probe(&self, index: usize, beat: &Beat) -> BeatreelResult<MediaFacts>;
}

/// Probe every beat in order.
pub fn probe_all(probe: &dyn MediaProbe, beats: &[Beat]) -> BeatreelResult<Vec<MediaFacts>> {
    let mut out = Vec::with_capacity(beats.len());
    for (index, beat) in beats.iter().enumerate() {
        let facts = probe.probe(index, beat)?;
        tracing::debug!(
            beat = index,
            movie = facts.movie_duration,
            audio = facts.audio_duration,
            has_media = facts.has_media,
            "probed beat media"
        );
        out.push(facts);
    }
    Ok(out)
}

/// Facts supplied up front, for dry runs and tests.
#[derive(Clone, Debug, Default)]
pub struct FixedProbe {
    facts: Vec<MediaFacts>,
}

impl FixedProbe {
    /// Wrap a list of facts, one per beat.
    pub fn new(facts: Vec<MediaFacts>) -> Self {
        Self { facts }
    }

    /// Load facts from a JSON array file.
    pub fn from_path(path: impl AsRef<Path>) -> BeatreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BeatreelError::validation(format!("open facts JSON '{}': {e}", path.display()))
        })?;
        let facts: Vec<MediaFacts> = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| BeatreelError::serde(format!("parse facts JSON: {e}")))?;
        Ok(Self { facts })
    }
}

impl MediaProbe for FixedProbe {
    fn probe(&self, index: usize, _beat: &Beat) -> BeatreelResult<MediaFacts> {
        self.facts.get(index).copied().ok_or_else(|| {
            BeatreelError::invariant(format!(
                "fixed facts cover {} beats, beat {index} requested",
                self.facts.len()
            ))
        })
    }
}

/// Check that every still image decodes far enough to report its dimensions.
pub fn check_still_images(beats: &[Beat]) -> BeatreelResult<()> {
    for (index, beat) in beats.iter().enumerate() {
        let BeatKind::Image(img) = &beat.kind else {
            continue;
        };
        image::image_dimensions(&img.path)
            .map_err(|e| BeatreelError::probe(index, &img.path, format!("unreadable image: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/probe/mod.rs"]
mod tests;
