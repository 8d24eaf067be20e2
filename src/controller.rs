//! Playback state machine and per-kind value dispatch.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::error::AnimationError;
use crate::math::{approx_eq, wrap};
use crate::registration::TrackRegistration;
use crate::value::{TextureRef, Value};

/// Playback state of an animation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// No animation bound; initial and terminal state.
    #[default]
    Stopped,
    /// Time advances on every update.
    Playing,
    /// An animation is bound but time is held.
    Paused,
}

impl PlaybackState {
    /// Get the name of this playback state.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    /// Check if the controller is actively playing.
    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// The integration seam between the timeline engine and an animated object.
///
/// A concrete binding names the properties it animates (one registration per
/// logical property) and implements one apply hook per value kind, writing
/// the interpolated value onto the target. The controller calls exactly one
/// hook per playable track per dispatch, chosen by the track's value kind.
/// Hooks default to no-ops, so a binding only implements the kinds it
/// registers.
pub trait AnimationBinding {
    /// The animated object type.
    type Target;

    /// Registrations for every property this binding animates. Read once at
    /// controller construction.
    fn registrations(&self) -> Vec<TrackRegistration>;

    fn apply_single(&mut self, _reg: &TrackRegistration, _target: &mut Self::Target, _value: f32) {}
    fn apply_vec2(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 2],
    ) {
    }
    fn apply_vec3(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 3],
    ) {
    }
    fn apply_vec4(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 4],
    ) {
    }
    fn apply_quat(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 4],
    ) {
    }
    fn apply_rect(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 4],
    ) {
    }
    fn apply_color(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: [f32; 4],
    ) {
    }
    fn apply_texture(
        &mut self,
        _reg: &TrackRegistration,
        _target: &mut Self::Target,
        _value: &TextureRef,
    ) {
    }
}

/// Outcome of pushing a new time through the loop/clamp rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUpdate {
    /// Time was accepted (possibly wrapped) and a dispatch pass ran.
    Applied,
    /// A finite loop cap was already reached; the update was ignored.
    Frozen,
    /// A non-looping timeline hit an end; the clamped frame was dispatched.
    Ended,
}

/// Drives playback of one animation onto one animated object.
///
/// The controller owns the target and the animation for the duration of a
/// playback session: [`play`] takes them by value and [`stop`] hands them
/// back, so nothing else can mutate them mid-session.
///
/// [`play`]: AnimationController::play
/// [`stop`]: AnimationController::stop
#[derive(Debug)]
pub struct AnimationController<B: AnimationBinding> {
    binding: B,
    registrations: Vec<TrackRegistration>,
    /// `(registration index, track index)` pairs validated at play time.
    playable: Vec<(usize, usize)>,
    animation: Option<Animation>,
    target: Option<B::Target>,
    time: f32,
    loop_counter: u32,
    state: PlaybackState,
}

impl<B: AnimationBinding> AnimationController<B> {
    /// Create a controller around a binding. Fails when the binding declares
    /// two registrations with the same value.
    pub fn new(binding: B) -> Result<Self, AnimationError> {
        let registrations = binding.registrations();
        for (i, reg) in registrations.iter().enumerate() {
            if registrations[..i].contains(reg) {
                return Err(AnimationError::argument(
                    "registrations",
                    format!(
                        "duplicate registration for {} track '{}'",
                        reg.kind().name(),
                        reg.name()
                    ),
                ));
            }
        }
        Ok(Self {
            binding,
            registrations,
            playable: Vec::new(),
            animation: None,
            target: None,
            time: 0.0,
            loop_counter: 0,
            state: PlaybackState::Stopped,
        })
    }

    /// Current playback state.
    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current time cursor in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Number of wraps performed in the current session.
    #[inline]
    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    /// Registrations declared by the binding.
    #[inline]
    pub fn registrations(&self) -> &[TrackRegistration] {
        &self.registrations
    }

    /// Registrations confirmed playable against the bound animation.
    pub fn playable_tracks(&self) -> impl Iterator<Item = &TrackRegistration> {
        self.playable.iter().map(|&(i, _)| &self.registrations[i])
    }

    /// The currently bound animation, if any.
    #[inline]
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// The currently bound target object, if any.
    #[inline]
    pub fn target(&self) -> Option<&B::Target> {
        self.target.as_ref()
    }

    /// The binding this controller dispatches through.
    #[inline]
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Join every registration against the animation's tracks. A matched
    /// track's capability set must equal the registration's exactly;
    /// unmatched registrations and tracks are skipped.
    fn validate_playable(&self, animation: &Animation) -> Result<Vec<(usize, usize)>, AnimationError> {
        let mut playable = Vec::new();
        for (reg_index, reg) in self.registrations.iter().enumerate() {
            let Some(track_index) = animation.track_index(reg.name(), reg.kind()) else {
                continue;
            };
            let track = &animation.tracks()[track_index];
            if track.supported_interpolation() != reg.supported_interpolation() {
                return Err(AnimationError::UnsupportedInterpolation {
                    track: track.name().to_string(),
                    registered_caps: reg.supported_interpolation(),
                    track_caps: track.supported_interpolation(),
                });
            }
            playable.push((reg_index, track_index));
        }
        Ok(playable)
    }

    /// Bind a target and an animation and start playing.
    ///
    /// The playable-track list is validated before any existing playback is
    /// torn down, so a failed `play` leaves the controller untouched. On
    /// success the first frame is evaluated and dispatched immediately;
    /// reverse-speed animations start at the end of the timeline.
    ///
    /// Playing an animation with the same name as the one currently paused
    /// resumes instead: the incoming pair is bound, but the time cursor and
    /// loop counter carry over.
    pub fn play(
        &mut self,
        target: B::Target,
        animation: Animation,
    ) -> Result<(), AnimationError> {
        let playable = self.validate_playable(&animation)?;

        let resume = if self.state == PlaybackState::Paused
            && self
                .animation
                .as_ref()
                .map_or(false, |a| a.name() == animation.name())
        {
            Some((self.time, self.loop_counter))
        } else {
            None
        };

        self.teardown();
        debug!(
            "playing '{}' ({} of {} registrations playable)",
            animation.name(),
            playable.len(),
            self.registrations.len()
        );

        match resume {
            Some((time, loops)) => {
                self.time = time.min(animation.length());
                self.loop_counter = loops;
            }
            None => {
                self.time = if animation.speed() < 0.0 {
                    animation.length()
                } else {
                    0.0
                };
            }
        }
        self.playable = playable;
        self.animation = Some(animation);
        self.target = Some(target);
        self.state = PlaybackState::Playing;
        self.dispatch();
        Ok(())
    }

    /// Pause playback. Without a bound animation the controller is forced
    /// to `Stopped` instead.
    pub fn pause(&mut self) {
        if self.animation.is_none() {
            self.state = PlaybackState::Stopped;
            return;
        }
        if self.state == PlaybackState::Playing {
            debug!("paused at {}", self.time);
            self.state = PlaybackState::Paused;
        }
    }

    /// Resume paused playback. Without a bound animation the controller is
    /// forced to `Stopped` instead.
    pub fn resume(&mut self) {
        if self.animation.is_none() {
            self.state = PlaybackState::Stopped;
            return;
        }
        if self.state == PlaybackState::Paused {
            debug!("resumed at {}", self.time);
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback and hand the target and animation back to the caller.
    /// Returns `None` when nothing was bound.
    ///
    /// The time cursor is rewound and the start-of-timeline pose dispatched
    /// before the pair is detached, so the returned target leaves in its
    /// rest pose rather than wherever playback happened to be.
    pub fn stop(&mut self) -> Option<(B::Target, Animation)> {
        if let Some(animation) = &self.animation {
            debug!("stopped '{}'", animation.name());
            self.time = 0.0;
            self.loop_counter = 0;
            self.dispatch();
        }
        self.teardown()
    }

    /// Advance the time cursor by `speed * delta` and dispatch the frame.
    ///
    /// No-op unless playing. When a non-looping animation reaches an end,
    /// the final clamped frame is dispatched, playback is torn down in the
    /// same call, and the unbound pair is returned to the caller.
    pub fn update(&mut self, delta: f32) -> Option<(B::Target, Animation)> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let speed = self.animation.as_ref().map(|a| a.speed()).unwrap_or(1.0);
        match self.apply_time(self.time + speed * delta) {
            TimeUpdate::Ended => {
                debug!("reached end of timeline, stopping");
                self.teardown()
            }
            TimeUpdate::Applied | TimeUpdate::Frozen => None,
        }
    }

    /// Move the time cursor directly, applying the same loop/clamp rules as
    /// [`update`] but never stopping playback (direct scrubbing keeps the
    /// final pose instead).
    ///
    /// [`update`]: AnimationController::update
    pub fn set_time(&mut self, time: f32) {
        self.apply_time(time);
    }

    /// Reset the time cursor and loop counter and re-dispatch.
    pub fn reset(&mut self) {
        if self.animation.is_none() {
            return;
        }
        self.time = 0.0;
        self.loop_counter = 0;
        self.dispatch();
    }

    /// Re-dispatch the current time without advancing it, for reinitializing
    /// a target that lost state.
    pub fn refresh(&mut self) {
        self.dispatch();
    }

    /// Push a new time value through the loop/clamp rules of the timeline.
    fn apply_time(&mut self, time: f32) -> TimeUpdate {
        let Some(animation) = self.animation.as_ref() else {
            return TimeUpdate::Frozen;
        };
        let length = animation.length();

        // A numerically equal assignment still forces a refresh pass.
        if approx_eq(time, self.time) {
            self.dispatch();
            return TimeUpdate::Applied;
        }

        if animation.looped() {
            if time < 0.0 || time > length {
                let cap = animation.loop_count();
                if cap != 0 && self.loop_counter >= cap {
                    // Finite loop budget spent: freeze rather than stop, so
                    // the last pose persists while state stays Playing.
                    return TimeUpdate::Frozen;
                }
                self.loop_counter += 1;
                self.time = wrap(time, length);
            } else {
                self.time = time;
            }
            self.dispatch();
            TimeUpdate::Applied
        } else {
            self.time = time.clamp(0.0, length);
            self.dispatch();
            if time <= 0.0 || time >= length {
                TimeUpdate::Ended
            } else {
                TimeUpdate::Applied
            }
        }
    }

    /// Evaluate every playable track at the current time and route each
    /// value to the binding hook for its kind.
    fn dispatch(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        let Some(target) = self.target.as_mut() else {
            return;
        };
        let length = animation.length();
        let looped = animation.looped();
        let mut applied = 0usize;

        for &(reg_index, track_index) in &self.playable {
            let reg = &self.registrations[reg_index];
            let track = animation.track_at_mut(track_index);
            if !track.enabled() {
                continue;
            }
            let Some(value) = track.sample(self.time, length, looped) else {
                continue;
            };
            match value {
                Value::Single(v) => self.binding.apply_single(reg, target, v),
                Value::Vec2(v) => self.binding.apply_vec2(reg, target, v),
                Value::Vec3(v) => self.binding.apply_vec3(reg, target, v),
                Value::Vec4(v) => self.binding.apply_vec4(reg, target, v),
                Value::Quat(v) => self.binding.apply_quat(reg, target, v),
                Value::Rect(v) => self.binding.apply_rect(reg, target, v),
                Value::Color(v) => self.binding.apply_color(reg, target, v),
                Value::Texture(v) => self.binding.apply_texture(reg, target, &v),
            }
            applied += 1;
        }
        trace!("dispatched {} track values at t={}", applied, self.time);
    }

    /// Clear all per-session state, returning whatever was bound.
    fn teardown(&mut self) -> Option<(B::Target, Animation)> {
        self.playable.clear();
        self.time = 0.0;
        self.loop_counter = 0;
        self.state = PlaybackState::Stopped;
        match (self.target.take(), self.animation.take()) {
            (Some(target), Some(animation)) => Some((target, animation)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_state_names() {
        assert_eq!(PlaybackState::Stopped.name(), "stopped");
        assert_eq!(PlaybackState::Playing.name(), "playing");
        assert_eq!(PlaybackState::Paused.name(), "paused");
        assert!(PlaybackState::Playing.is_playing());
        assert!(!PlaybackState::Paused.is_playing());
    }
}
