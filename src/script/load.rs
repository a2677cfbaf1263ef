use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encode::ffmpeg::EncoderSettings;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{BeatreelError, BeatreelResult};
use crate::script::beat::{Beat, BeatKind, FillOption, ImageBeat, MovieBeat, VoiceOverBeat};
use crate::script::model::{BeatDef, EncoderDef, ScriptDef, TransitionDef};
use crate::timeline::padding::PaddingPolicy;
use crate::transition::kind::TransitionSpec;

/// Output and composition settings.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Overlay rendered caption images.
    pub captions: bool,
    /// Encoder options.
    pub encoder: EncoderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            captions: true,
            encoder: EncoderSettings::default(),
        }
    }
}

/// A validated script: settings, padding policy and typed beats.
#[derive(Clone, Debug)]
pub struct Script {
    /// Output settings.
    pub settings: Settings,
    /// Gap policy.
    pub policy: PaddingPolicy,
    /// Narration/BGM bed covering the whole video.
    pub narration: Option<PathBuf>,
    /// Beats in playback order.
    pub beats: Vec<Beat>,
}

impl Script {
    /// Parse a script from a JSON reader. Relative media paths resolve against `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: &Path) -> BeatreelResult<Self> {
        let def: ScriptDef = serde_json::from_reader(r)
            .map_err(|e| BeatreelError::serde(format!("parse script JSON: {e}")))?;
        Self::from_def(def, base_dir)
    }

    /// Parse a script from a JSON string.
    pub fn from_json_str(json: &str, base_dir: &Path) -> BeatreelResult<Self> {
        Self::from_reader(json.as_bytes(), base_dir)
    }

    /// Parse a script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BeatreelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BeatreelError::validation(format!("open script JSON '{}': {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_reader(BufReader::new(f), base_dir)
    }

    pub(crate) fn from_def(def: ScriptDef, base_dir: &Path) -> BeatreelResult<Self> {
        let s = def.settings;
        s.canvas.validate()?;
        let fps = Fps::new(s.fps)?;
        validate_policy(&s.padding)?;

        let default_transition = s
            .default_transition
            .as_ref()
            .map(lower_transition)
            .transpose()?;

        let mut beats = Vec::with_capacity(def.beats.len());
        for (index, beat_def) in def.beats.into_iter().enumerate() {
            let prev = beats.last();
            let beat = lower_beat(
                index,
                beat_def,
                prev,
                base_dir,
                s.fill_option,
                default_transition,
            )?;
            beats.push(beat);
        }
        validate_voice_over_offsets(&beats)?;

        Ok(Self {
            settings: Settings {
                canvas: s.canvas,
                fps,
                captions: s.caption,
                encoder: lower_encoder(&s.encoder)?,
            },
            policy: s.padding,
            narration: def.narration.map(|p| resolve_path(base_dir, &p)),
            beats,
        })
    }
}

fn lower_beat(
    index: usize,
    def: BeatDef,
    prev: Option<&Beat>,
    base_dir: &Path,
    default_fill: FillOption,
    default_transition: Option<TransitionSpec>,
) -> BeatreelResult<Beat> {
    let invalid = |msg: &str| BeatreelError::validation(format!("beat {index}: {msg}"));

    let kind = match (def.voice_over, def.image, def.movie) {
        (true, None, None) => {
            if !prev.is_some_and(|p| p.is_movie() || p.is_voice_over()) {
                return Err(invalid(
                    "voice_over must follow a movie beat or another voice_over beat",
                ));
            }
            if let Some(t) = def.start_at
                && (!t.is_finite() || t < 0.0)
            {
                return Err(invalid("start_at must be finite and >= 0"));
            }
            BeatKind::VoiceOver(VoiceOverBeat {
                start_at: def.start_at,
            })
        }
        (true, _, _) => return Err(invalid("voice_over beats cannot carry an image or movie")),
        (false, Some(_), Some(_)) => return Err(invalid("set either image or movie, not both")),
        (false, image, movie) => {
            if def.start_at.is_some() {
                return Err(invalid("start_at is only valid on voice_over beats"));
            }
            match (image, movie) {
                (Some(p), None) => BeatKind::Image(ImageBeat {
                    path: resolve_path(base_dir, &p),
                }),
                (None, Some(p)) => {
                    let volume = def.audio_params.movie_volume.unwrap_or(1.0);
                    if !volume.is_finite() || volume < 0.0 {
                        return Err(invalid("movie_volume must be finite and >= 0"));
                    }
                    BeatKind::Movie(MovieBeat {
                        path: resolve_path(base_dir, &p),
                        volume,
                    })
                }
                _ => BeatKind::Plain,
            }
        }
    };

    if let Some(d) = def.duration
        && (!d.is_finite() || d <= 0.0)
    {
        return Err(invalid("duration must be finite and > 0"));
    }
    if let Some(p) = def.audio_params.padding
        && (!p.is_finite() || p < 0.0)
    {
        return Err(invalid("padding must be finite and >= 0"));
    }
    let speed = def.speed.unwrap_or(1.0);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(invalid("speed must be finite and > 0"));
    }

    let transition = match def.transition.as_ref() {
        Some(t) => Some(
            lower_transition(t)
                .map_err(|e| BeatreelError::validation(format!("beat {index}: {e}")))?,
        ),
        None => default_transition,
    };

    Ok(Beat {
        kind,
        duration: def.duration,
        padding: def.audio_params.padding,
        audio: def.audio.map(|p| resolve_path(base_dir, &p)),
        caption: def.caption.map(|p| resolve_path(base_dir, &p)),
        transition,
        fill: def.fill_option.unwrap_or(default_fill),
        speed,
    })
}

fn lower_transition(def: &TransitionDef) -> BeatreelResult<TransitionSpec> {
    TransitionSpec::parse(&def.kind, def.duration)
}

fn lower_encoder(def: &EncoderDef) -> BeatreelResult<EncoderSettings> {
    if def.video_codec.trim().is_empty() || def.audio_codec.trim().is_empty() {
        return Err(BeatreelError::validation("encoder codecs must be non-empty"));
    }
    let timeout = match def.timeout_sec {
        None => None,
        Some(t) if t.is_finite() && t > 0.0 => Some(Duration::from_secs_f64(t)),
        Some(_) => {
            return Err(BeatreelError::validation(
                "encoder timeout_sec must be finite and > 0",
            ));
        }
    };
    Ok(EncoderSettings {
        video_codec: def.video_codec.clone(),
        audio_codec: def.audio_codec.clone(),
        video_bitrate: def.video_bitrate.clone(),
        audio_bitrate: def.audio_bitrate.clone(),
        timeout,
    })
}

fn validate_policy(p: &PaddingPolicy) -> BeatreelResult<()> {
    for (name, v) in [
        ("default", p.default_padding),
        ("closing", p.closing_padding),
        ("intro", p.intro_padding),
        ("outro", p.outro_padding),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(BeatreelError::validation(format!(
                "padding.{name} must be finite and >= 0"
            )));
        }
    }
    Ok(())
}

/// Voice-over offsets within one movie group must strictly increase.
fn validate_voice_over_offsets(beats: &[Beat]) -> BeatreelResult<()> {
    let mut last: Option<f64> = None;
    for (index, beat) in beats.iter().enumerate() {
        if !beat.is_voice_over() {
            last = None;
            continue;
        }
        if let Some(t) = beat.voice_over_start() {
            if let Some(prev) = last
                && t <= prev
            {
                return Err(BeatreelError::validation(format!(
                    "beat {index}: voice_over start_at {t} must be greater than the previous offset {prev}"
                )));
            }
            last = Some(t);
        }
    }
    Ok(())
}

fn resolve_path(base_dir: &Path, p: &str) -> PathBuf {
    let path = Path::new(p);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/load.rs"]
mod tests;
