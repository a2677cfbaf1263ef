use crate::foundation::error::{BeatreelError, BeatreelResult};

/// Direction of a slide transition, named after the direction of motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDir {
    /// Moves toward the left edge.
    Left,
    /// Moves toward the right edge.
    Right,
    /// Moves toward the top edge.
    Up,
    /// Moves toward the bottom edge.
    Down,
}

/// Visual transition between a beat and the previous visual beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Previous beat's last frame fades out over the new beat.
    Fade,
    /// Previous beat's last frame slides off canvas.
    SlideOut(SlideDir),
    /// New beat's first frame slides in over the previous beat's last frame.
    SlideIn(SlideDir),
}

impl TransitionKind {
    /// `true` when the transition needs this beat's own first frame.
    pub fn needs_first_frame(self) -> bool {
        matches!(self, Self::SlideIn(_))
    }

    /// Canonical script name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideOut(SlideDir::Left) => "slideout_left",
            Self::SlideOut(SlideDir::Right) => "slideout_right",
            Self::SlideOut(SlideDir::Up) => "slideout_up",
            Self::SlideOut(SlideDir::Down) => "slideout_down",
            Self::SlideIn(SlideDir::Left) => "slidein_left",
            Self::SlideIn(SlideDir::Right) => "slidein_right",
            Self::SlideIn(SlideDir::Up) => "slidein_up",
            Self::SlideIn(SlideDir::Down) => "slidein_down",
        }
    }
}

/// A transition as requested by the script author.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    /// Transition kind.
    pub kind: TransitionKind,
    /// Requested duration in seconds, before clamping.
    pub duration: f64,
}

impl TransitionSpec {
    /// Parse a script transition name and validate its duration.
    pub fn parse(name: &str, duration: f64) -> BeatreelResult<Self> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(BeatreelError::validation(
                "transition duration must be finite and >= 0",
            ));
        }
        Ok(Self {
            kind: parse_transition(name)?,
            duration,
        })
    }
}

/// Parse a transition name such as `fade` or `slidein_left`.
pub fn parse_transition(name: &str) -> BeatreelResult<TransitionKind> {
    let kind = name.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(BeatreelError::validation("transition type must be non-empty"));
    }
    if kind == "fade" {
        return Ok(TransitionKind::Fade);
    }

    let (family, dir) = kind
        .split_once('_')
        .ok_or_else(|| BeatreelError::validation(format!("unknown transition type '{kind}'")))?;
    let dir = match dir {
        "left" => SlideDir::Left,
        "right" => SlideDir::Right,
        "up" => SlideDir::Up,
        "down" => SlideDir::Down,
        other => {
            return Err(BeatreelError::validation(format!(
                "unknown slide direction '{other}' in transition '{kind}'"
            )));
        }
    };
    match family {
        "slideout" => Ok(TransitionKind::SlideOut(dir)),
        "slidein" => Ok(TransitionKind::SlideIn(dir)),
        _ => Err(BeatreelError::validation(format!(
            "unknown transition type '{kind}'"
        ))),
    }
}
