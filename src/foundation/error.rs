use std::path::PathBuf;

/// Convenience result type used across beatreel.
pub type BeatreelResult<T> = Result<T, BeatreelError>;

/// Top-level error taxonomy.
///
/// Everything except [`BeatreelError::Encoder`] is detected before the encoder is spawned.
#[derive(thiserror::Error, Debug)]
pub enum BeatreelError {
    /// Invalid script, settings or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A beat that needs its own visual has neither an image nor a movie.
    #[error("missing media: beat {beat} has neither an image nor a movie file")]
    MissingMedia {
        /// 0-based beat index.
        beat: usize,
    },

    /// Media facts could not be read from a produced file.
    #[error("probe error: beat {beat} ('{}'): {message}", path.display())]
    Probe {
        /// 0-based beat index.
        beat: usize,
        /// File that failed to probe.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// Internal consistency check failed. Indicates a bug, never bad input.
    #[error("invariant violation: {0}")]
    Invariant(String),

    /// The external encoder failed. Captured output is attached.
    #[error("encoder error ({status}): {}", stderr.trim())]
    Encoder {
        /// Exit status or failure description.
        status: String,
        /// Captured encoder stdout.
        stdout: String,
        /// Captured encoder stderr.
        stderr: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeatreelError {
    /// Build a [`BeatreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BeatreelError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build a [`BeatreelError::Probe`] value.
    pub fn probe(beat: usize, path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Probe {
            beat,
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Build a [`BeatreelError::Encoder`] value without captured output.
    pub fn encoder(status: impl Into<String>) -> Self {
        Self::Encoder {
            status: status.into(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Build a [`BeatreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Fail with [`BeatreelError::Invariant`] unless two parallel arrays have equal length.
pub(crate) fn ensure_same_len(what: &str, left: usize, right: usize) -> BeatreelResult<()> {
    if left != right {
        return Err(BeatreelError::invariant(format!(
            "{what}: length mismatch ({left} != {right})"
        )));
    }
    Ok(())
}
