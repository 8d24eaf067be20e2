//! A keyframe: one (time, value) sample on a track.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::value::Value;

/// A single time/value pair. Immutable once constructed; owned exclusively by
/// the track that holds it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    time: f32,
    value: Value,
}

impl KeyFrame {
    /// Create a new keyframe. `time` must be finite and non-negative.
    pub fn new(time: f32, value: Value) -> Result<Self, AnimationError> {
        if !time.is_finite() || time < 0.0 {
            return Err(AnimationError::argument(
                "time",
                format!("must be finite and >= 0, got {time}"),
            ));
        }
        Ok(Self { time, value })
    }

    /// Time at which this keyframe occurs, in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Value at this keyframe.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the keyframe, returning its value.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }
}
