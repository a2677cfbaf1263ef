use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::transition::kind::{TransitionKind, TransitionSpec};

/// How a visual is fitted onto the output canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOption {
    /// Scale to fit inside the canvas and letterbox the rest.
    #[default]
    #[serde(alias = "aspectFit")]
    AspectFit,
    /// Scale to cover the canvas and crop the overflow.
    #[serde(alias = "aspectFill")]
    AspectFill,
}

/// A beat that shows a movie clip.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieBeat {
    /// Movie file.
    pub path: PathBuf,
    /// Gain for the movie's embedded audio; `0` drops it.
    pub volume: f64,
}

/// A beat that narrates over the preceding movie and has no visual of its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoiceOverBeat {
    /// Offset into the group's movie at which this beat starts.
    pub start_at: Option<f64>,
}

/// A beat that shows a still image (rendered slide, chart, generated picture, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBeat {
    /// Image file.
    pub path: PathBuf,
}

/// Beat variants, resolved once when the script is loaded.
#[derive(Clone, Debug, PartialEq)]
pub enum BeatKind {
    /// Movie clip.
    Movie(MovieBeat),
    /// Voice-over on the preceding movie.
    VoiceOver(VoiceOverBeat),
    /// Still image.
    Image(ImageBeat),
    /// No visual asset.
    Plain,
}

/// One narration/media unit of the script.
#[derive(Clone, Debug, PartialEq)]
pub struct Beat {
    /// Resolved variant.
    pub kind: BeatKind,
    /// Author-given duration in seconds.
    pub duration: Option<f64>,
    /// Per-beat padding override. `Some(0.0)` is distinct from `None`.
    pub padding: Option<f64>,
    /// Produced narration audio owned by this beat.
    pub audio: Option<PathBuf>,
    /// Rendered caption image.
    pub caption: Option<PathBuf>,
    /// Transition from the previous visual beat.
    pub transition: Option<TransitionSpec>,
    /// Canvas fitting.
    pub fill: FillOption,
    /// Playback speed (1.0 is normal).
    pub speed: f64,
}

impl Beat {
    /// Beat with no timing overrides.
    pub fn new(kind: BeatKind) -> Self {
        Self {
            kind,
            duration: None,
            padding: None,
            audio: None,
            caption: None,
            transition: None,
            fill: FillOption::AspectFit,
            speed: 1.0,
        }
    }

    /// Image beat.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::new(BeatKind::Image(ImageBeat { path: path.into() }))
    }

    /// Movie beat with unit volume.
    pub fn movie(path: impl Into<PathBuf>) -> Self {
        Self::new(BeatKind::Movie(MovieBeat {
            path: path.into(),
            volume: 1.0,
        }))
    }

    /// Voice-over beat.
    pub fn voice_over(start_at: Option<f64>) -> Self {
        Self::new(BeatKind::VoiceOver(VoiceOverBeat { start_at }))
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_audio(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio = Some(path.into());
        self
    }

    pub fn with_caption(mut self, path: impl Into<PathBuf>) -> Self {
        self.caption = Some(path.into());
        self
    }

    pub fn with_transition(mut self, kind: TransitionKind, duration: f64) -> Self {
        self.transition = Some(TransitionSpec { kind, duration });
        self
    }

    pub fn with_fill(mut self, fill: FillOption) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// `true` for voice-over beats.
    pub fn is_voice_over(&self) -> bool {
        matches!(self.kind, BeatKind::VoiceOver(_))
    }

    /// `true` for movie beats.
    pub fn is_movie(&self) -> bool {
        matches!(self.kind, BeatKind::Movie(_))
    }

    /// Voice-over offset, if this is a voice-over beat that sets one.
    pub fn voice_over_start(&self) -> Option<f64> {
        match &self.kind {
            BeatKind::VoiceOver(v) => v.start_at,
            _ => None,
        }
    }
}
