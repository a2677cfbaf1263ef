use std::path::{Path, PathBuf};

use crate::foundation::error::{BeatreelError, BeatreelResult};
use crate::probe::{MediaFacts, MediaProbe};
use crate::script::beat::{Beat, BeatKind};

/// Stream summary of one media file.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_sec: f64,
    /// At least one video stream.
    pub has_video: bool,
    /// At least one audio stream.
    pub has_audio: bool,
}

/// Probe that runs the system `ffprobe` on each beat's files.
#[derive(Clone, Debug)]
pub struct FfprobeProbe {
    program: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffprobe"),
        }
    }
}

impl FfprobeProbe {
    /// Probe using `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe using a specific `ffprobe` binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, index: usize, beat: &Beat) -> BeatreelResult<MediaFacts> {
        let mut facts = MediaFacts::default();

        if let BeatKind::Movie(movie) = &beat.kind {
            let info = probe_media(&self.program, &movie.path)
                .map_err(|e| BeatreelError::probe(index, &movie.path, e.to_string()))?;
            if !info.has_video {
                return Err(BeatreelError::probe(index, &movie.path, "no video stream found"));
            }
            facts.movie_duration = info.duration_sec / beat.speed;
            facts.has_movie_audio = info.has_audio;
            facts.has_media = true;
        }

        if let Some(audio) = beat.audio.as_deref() {
            let info = probe_media(&self.program, audio)
                .map_err(|e| BeatreelError::probe(index, audio, e.to_string()))?;
            facts.audio_duration = info.duration_sec;
            facts.has_media = true;
        }

        Ok(facts)
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_media(program: &Path, source_path: &Path) -> BeatreelResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new(program)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| BeatreelError::validation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(BeatreelError::validation(format!(
            "ffprobe failed: {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| BeatreelError::serde(format!("ffprobe json parse failed: {e}")))?;
    parse_probe_duration(parsed.format.and_then(|f| f.duration).as_deref()).map(|duration_sec| {
        MediaInfo {
            duration_sec,
            has_video: parsed
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("video")),
            has_audio: parsed
                .streams
                .iter()
                .any(|s| s.codec_type.as_deref() == Some("audio")),
        }
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_media(_program: &Path, _source_path: &Path) -> BeatreelResult<MediaInfo> {
    Err(BeatreelError::validation(
        "probing media files requires the 'media-ffmpeg' feature",
    ))
}

/// Parse ffprobe's `format.duration`. A missing or non-numeric value is an error, never `0`.
pub(crate) fn parse_probe_duration(raw: Option<&str>) -> BeatreelResult<f64> {
    let raw = raw.ok_or_else(|| BeatreelError::validation("ffprobe reported no duration"))?;
    let v = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| BeatreelError::validation(format!("invalid duration '{raw}'")))?;
    if !v.is_finite() || v < 0.0 {
        return Err(BeatreelError::validation(format!("invalid duration '{raw}'")));
    }
    Ok(v)
}
