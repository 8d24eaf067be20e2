//! An animation track: one named, typed channel of keyframes.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::interpolation::{linear_value, InterpolationMode, TrackInterpolation};
use crate::keyframe::KeyFrame;
use crate::math::{approx_eq, approx_zero};
use crate::spline::SplineCache;
use crate::value::{Value, ValueKind};

/// An ordered-by-time, duplicate-time-free collection of keyframes of one
/// fixed value kind, with an interpolation mode and enabled flag.
///
/// Tracks are built and edited outside of active playback; a controller only
/// pulls interpolated values from them, so a track never holds a reference
/// back to whatever plays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    name: String,
    kind: ValueKind,
    mode: InterpolationMode,
    enabled: bool,
    keys: Vec<KeyFrame>,
    supported: TrackInterpolation,
    /// Derived spline control data; rebuilt lazily, dropped on any mutation.
    #[serde(skip)]
    spline: Option<SplineCache>,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.mode == other.mode
            && self.enabled == other.enabled
            && self.keys == other.keys
            && self.supported == other.supported
    }
}

impl Track {
    /// Create a new empty track with the default capability set for `kind`.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Result<Self, AnimationError> {
        Self::with_support(name, kind, TrackInterpolation::default_for(kind))
    }

    /// Create a new empty track with an explicit capability set.
    pub fn with_support(
        name: impl Into<String>,
        kind: ValueKind,
        supported: TrackInterpolation,
    ) -> Result<Self, AnimationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AnimationError::argument("name", "must not be empty"));
        }
        Ok(Self {
            name,
            kind,
            mode: InterpolationMode::default(),
            enabled: true,
            keys: Vec::new(),
            supported,
            spline: None,
        })
    }

    /// Name of this track.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value kind, fixed at construction.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Active interpolation mode.
    #[inline]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Set the interpolation mode. Assignments outside the track's
    /// capability set are ignored.
    pub fn set_mode(&mut self, mode: InterpolationMode) {
        if !self.supported.contains(mode.as_flag()) {
            return;
        }
        if self.mode != mode {
            self.mode = mode;
            self.spline = None;
        }
    }

    /// Capability set this track supports.
    #[inline]
    pub fn supported_interpolation(&self) -> TrackInterpolation {
        self.supported
    }

    /// Whether this track participates in dispatch.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the track.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Keys in ascending time order.
    #[inline]
    pub fn keys(&self) -> &[KeyFrame] {
        &self.keys
    }

    /// Number of keys.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Index of the key at exactly (within epsilon) the given time.
    fn index_of(&self, time: f32) -> Option<usize> {
        let pos = self
            .keys
            .partition_point(|k| k.time() < time - crate::math::EPSILON);
        if pos < self.keys.len() && approx_eq(self.keys[pos].time(), time) {
            Some(pos)
        } else {
            None
        }
    }

    /// Exact-time membership test (not a range test).
    #[inline]
    pub fn contains_key(&self, time: f32) -> bool {
        self.index_of(time).is_some()
    }

    fn check_key(&self, key: &KeyFrame) -> Result<(), AnimationError> {
        if key.value().kind() != self.kind {
            return Err(AnimationError::TypeMismatch {
                expected: self.kind,
                actual: key.value().kind(),
            });
        }
        if self.contains_key(key.time()) {
            return Err(AnimationError::DuplicateKey {
                track: self.name.clone(),
                time: key.time(),
            });
        }
        Ok(())
    }

    /// Add a key, keeping the collection sorted by time.
    ///
    /// Fails with [`AnimationError::DuplicateKey`] when a key already exists
    /// at the key's time, and [`AnimationError::TypeMismatch`] when the
    /// value kind differs from the track's.
    pub fn add_key(&mut self, key: KeyFrame) -> Result<(), AnimationError> {
        self.check_key(&key)?;
        let pos = self.keys.partition_point(|k| k.time() < key.time());
        self.keys.insert(pos, key);
        self.spline = None;
        Ok(())
    }

    /// Add a key after validating `index` against the current length. The
    /// key still lands at its time-sorted position.
    pub fn insert_key(&mut self, index: usize, key: KeyFrame) -> Result<(), AnimationError> {
        if index > self.keys.len() {
            return Err(AnimationError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            });
        }
        self.add_key(key)
    }

    /// Add a run of keys with the same index validation as [`insert_key`].
    ///
    /// The whole batch is validated up front, so a rejected key leaves the
    /// track untouched rather than partially extended.
    ///
    /// [`insert_key`]: Track::insert_key
    pub fn insert_keys(
        &mut self,
        index: usize,
        keys: impl IntoIterator<Item = KeyFrame>,
    ) -> Result<(), AnimationError> {
        if index > self.keys.len() {
            return Err(AnimationError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            });
        }
        let keys: Vec<KeyFrame> = keys.into_iter().collect();
        for (i, key) in keys.iter().enumerate() {
            self.check_key(key)?;
            if keys[..i].iter().any(|k| approx_eq(k.time(), key.time())) {
                return Err(AnimationError::DuplicateKey {
                    track: self.name.clone(),
                    time: key.time(),
                });
            }
        }
        for key in keys {
            let pos = self.keys.partition_point(|k| k.time() < key.time());
            self.keys.insert(pos, key);
        }
        self.spline = None;
        Ok(())
    }

    /// Remove the key at exactly the given time.
    pub fn remove_key(&mut self, time: f32) -> Result<KeyFrame, AnimationError> {
        let index = self.index_of(time).ok_or_else(|| AnimationError::KeyNotFound {
            track: self.name.clone(),
            time,
        })?;
        self.spline = None;
        Ok(self.keys.remove(index))
    }

    /// Remove the key at the given index.
    pub fn remove_key_at(&mut self, index: usize) -> Result<KeyFrame, AnimationError> {
        if index >= self.keys.len() {
            return Err(AnimationError::IndexOutOfRange {
                index,
                len: self.keys.len(),
            });
        }
        self.spline = None;
        Ok(self.keys.remove(index))
    }

    /// Remove all keys.
    pub fn clear_keys(&mut self) {
        self.keys.clear();
        self.spline = None;
    }

    /// Compute the interpolated value at `time`.
    ///
    /// `time` must already be wrapped into `[0, length)` by the caller when
    /// the animation loops; `length` bounds the wrap-around interval between
    /// the last and first key of a looping track. Returns `None` when the
    /// track has no keys.
    pub fn sample(&mut self, time: f32, length: f32, looped: bool) -> Option<Value> {
        if self.keys.is_empty() {
            return None;
        }

        // Exact key hit: return the stored value untouched so keyframes
        // never accumulate interpolation error.
        if let Some(index) = self.index_of(time) {
            return Some(self.keys[index].value().clone());
        }

        let first = &self.keys[0];
        if self.keys.len() == 1 || time < first.time() {
            return Some(first.value().clone());
        }

        let last_index = self.keys.len() - 1;
        if !looped && time >= self.keys[last_index].time() {
            return Some(self.keys[last_index].value().clone());
        }

        // Nearest keys: prev is the last key at or before `time`. An exact
        // hit was already handled, so prev is strictly before `time`.
        let prev_index = self.keys.partition_point(|k| k.time() <= time) - 1;
        let (next_index, interval) = if prev_index == last_index {
            // Past the last key on a looping animation: wrap to the first
            // key through the end of the timeline.
            (0, (length - self.keys[prev_index].time()) + first.time())
        } else {
            (
                prev_index + 1,
                self.keys[prev_index + 1].time() - self.keys[prev_index].time(),
            )
        };

        let u = if approx_zero(interval) {
            0.0
        } else {
            (time - self.keys[prev_index].time()) / interval
        };

        match self.mode {
            InterpolationMode::None => Some(self.keys[prev_index].value().clone()),
            InterpolationMode::Linear => Some(linear_value(
                self.keys[prev_index].value(),
                self.keys[next_index].value(),
                u,
            )),
            InterpolationMode::Spline => Some(self.sample_spline(prev_index, u, looped)),
        }
    }

    /// Evaluate the spline segment starting at `prev_index`, (re)building the
    /// control data when missing or built for the other looped-ness.
    fn sample_spline(&mut self, prev_index: usize, u: f32, looped: bool) -> Value {
        let needs_build = match &self.spline {
            Some(cache) => cache.is_cyclic() != looped,
            None => true,
        };
        if needs_build {
            self.spline = SplineCache::build(&self.keys, self.kind, looped);
        }
        match &self.spline {
            Some(cache) => Value::from_components(self.kind, cache.eval(prev_index, u))
                .unwrap_or_else(|| self.keys[prev_index].value().clone()),
            // Kinds with no numeric components degrade to stepping.
            None => self.keys[prev_index].value().clone(),
        }
    }
}
