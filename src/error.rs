//! Error types for the animation timeline.

use crate::interpolation::TrackInterpolation;
use crate::value::ValueKind;

/// Error type covering every failure the timeline engine can raise.
///
/// All of these are programmer-visible defects raised synchronously at the
/// call site; none are transient or retried.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AnimationError {
    /// Invalid argument (null-equivalent, empty name, non-finite time)
    #[error("Invalid argument `{name}`: {reason}")]
    Argument { name: &'static str, reason: String },

    /// A key already exists at the given time on a track
    #[error("Track '{track}' already has a key at time {time}")]
    DuplicateKey { track: String, time: f32 },

    /// Key value kind does not match its track
    #[error("Value kind mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Index out of bounds on key insertion/removal
    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// No key exists at the given time
    #[error("Track '{track}' has no key at time {time}")]
    KeyNotFound { track: String, time: f32 },

    /// No track exists with the given name and kind
    #[error("No {kind:?} track named '{name}'")]
    TrackNotFound { name: String, kind: ValueKind },

    /// Registration/track interpolation capability mismatch at play time
    #[error(
        "Track '{track}' supports {track_caps:?} but its registration requires {registered_caps:?}"
    )]
    UnsupportedInterpolation {
        track: String,
        registered_caps: TrackInterpolation,
        track_caps: TrackInterpolation,
    },

    /// Persisted data names a track the reader has no registration for
    #[error("Animation data contains unknown track '{track}'")]
    SchemaMismatch { track: String },

    /// Persisted data carries a version tag the codec cannot read
    #[error("Unsupported animation data version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    /// Chunk-sequencing violation or other IO failure from the chunk layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnimationError {
    /// Shorthand for an [`AnimationError::Argument`].
    pub fn argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Argument {
            name,
            reason: reason.into(),
        }
    }

    /// Get the error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Argument { .. } => "argument",
            Self::DuplicateKey { .. }
            | Self::TypeMismatch { .. }
            | Self::IndexOutOfRange { .. }
            | Self::KeyNotFound { .. }
            | Self::TrackNotFound { .. } => "structure",
            Self::UnsupportedInterpolation { .. } => "playback",
            Self::SchemaMismatch { .. } | Self::UnsupportedVersion { .. } | Self::Io(_) => {
                "persistence"
            }
        }
    }
}
