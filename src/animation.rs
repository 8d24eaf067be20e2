//! Animation container: a named set of tracks plus timeline parameters.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::track::Track;
use crate::value::ValueKind;

/// A named container of tracks plus duration, loop flag/count, and playback
/// speed. Owns no reference to whatever object it animates.
///
/// Built with [`AnimationBuilder`]; the track set is fixed after `build`,
/// though individual track contents may still be edited between playback
/// sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    name: String,
    length: f32,
    looped: bool,
    loop_count: u32,
    speed: f32,
    tracks: Vec<Track>,
}

impl Animation {
    /// Start building an animation.
    #[inline]
    pub fn builder(name: impl Into<String>) -> AnimationBuilder {
        AnimationBuilder::new(name)
    }

    /// Name of this animation.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in seconds, always greater than zero.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Whether the timeline wraps at the ends.
    #[inline]
    pub fn looped(&self) -> bool {
        self.looped
    }

    #[inline]
    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    /// Maximum number of wraps before time advancement freezes; 0 means
    /// unlimited.
    #[inline]
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    #[inline]
    pub fn set_loop_count(&mut self, loop_count: u32) {
        self.loop_count = loop_count;
    }

    /// Playback speed multiplier; the sign determines direction.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// All tracks, keyed by `(name, kind)`.
    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a track by name and value kind.
    pub fn track(&self, name: &str, kind: ValueKind) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.kind() == kind && t.name() == name)
    }

    /// Mutable track lookup for editing between playback sessions.
    pub fn track_mut(&mut self, name: &str, kind: ValueKind) -> Option<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.kind() == kind && t.name() == name)
    }

    pub(crate) fn track_index(&self, name: &str, kind: ValueKind) -> Option<usize> {
        self.tracks
            .iter()
            .position(|t| t.kind() == kind && t.name() == name)
    }

    pub(crate) fn track_at_mut(&mut self, index: usize) -> &mut Track {
        &mut self.tracks[index]
    }

    /// Remove a track by name and kind.
    pub fn remove_track(&mut self, name: &str, kind: ValueKind) -> Result<Track, AnimationError> {
        let index =
            self.track_index(name, kind)
                .ok_or_else(|| AnimationError::TrackNotFound {
                    name: name.to_string(),
                    kind,
                })?;
        Ok(self.tracks.remove(index))
    }
}

/// Builder accumulating at most one track per `(name, kind)` pair.
///
/// When no explicit length is given, `build` infers it as the maximum key
/// time across all tracks.
#[derive(Debug, Clone, Default)]
pub struct AnimationBuilder {
    name: String,
    length: Option<f32>,
    looped: bool,
    loop_count: u32,
    speed: Option<f32>,
    tracks: Vec<Track>,
}

impl AnimationBuilder {
    /// Start a builder for an animation with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an explicit length in seconds.
    pub fn length(mut self, length: f32) -> Self {
        self.length = Some(length);
        self
    }

    /// Make the animation loop.
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Cap the number of loops; 0 means unlimited.
    pub fn loop_count(mut self, loop_count: u32) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Set the playback speed multiplier.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Add a track. Duplicate `(name, kind)` pairs are reported by `build`.
    pub fn track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Validate and assemble the animation.
    pub fn build(self) -> Result<Animation, AnimationError> {
        if self.name.is_empty() {
            return Err(AnimationError::argument("name", "must not be empty"));
        }

        for (i, track) in self.tracks.iter().enumerate() {
            if self.tracks[..i]
                .iter()
                .any(|t| t.kind() == track.kind() && t.name() == track.name())
            {
                return Err(AnimationError::argument(
                    "track",
                    format!(
                        "more than one {} track named '{}'",
                        track.kind().name(),
                        track.name()
                    ),
                ));
            }
        }

        let length = match self.length {
            Some(length) => {
                if !length.is_finite() || length <= 0.0 {
                    return Err(AnimationError::argument(
                        "length",
                        format!("must be finite and > 0, got {length}"),
                    ));
                }
                length
            }
            None => {
                let max_time = self
                    .tracks
                    .iter()
                    .filter_map(|t| t.keys().last())
                    .map(|k| k.time())
                    .fold(0.0f32, f32::max);
                if max_time <= 0.0 {
                    return Err(AnimationError::argument(
                        "length",
                        "cannot be inferred from an animation with no keys",
                    ));
                }
                max_time
            }
        };

        Ok(Animation {
            name: self.name,
            length,
            looped: self.looped,
            loop_count: self.loop_count,
            speed: self.speed.unwrap_or(1.0),
            tracks: self.tracks,
        })
    }
}
