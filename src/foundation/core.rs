use crate::foundation::error::{BeatreelError, BeatreelResult};

/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 30;

/// Integer output frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(pub u32);

impl Fps {
    /// Create a validated (non-zero) frame rate.
    pub fn new(fps: u32) -> BeatreelResult<Self> {
        if fps == 0 {
            return Err(BeatreelError::validation("fps must be non-zero"));
        }
        Ok(Self(fps))
    }

    /// Duration of one frame in seconds.
    pub fn frame_sec(self) -> f64 {
        1.0 / f64::from(self.0)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(DEFAULT_FPS)
    }
}

/// Output canvas in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate dimensions for yuv420p output.
    pub fn validate(self) -> BeatreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BeatreelError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(BeatreelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Format seconds for encoder arguments and filter expressions.
///
/// Rounds to microseconds so accumulated float noise never reaches the wire string.
pub fn fmt_sec(v: f64) -> String {
    let rounded = (v * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Return `true` when `a` and `b` differ by less than a microsecond.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
