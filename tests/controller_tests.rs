use approx::assert_relative_eq;

use animation_timeline::{
    Animation, AnimationBinding, AnimationController, AnimationError, InterpolationMode, KeyFrame,
    PlaybackState, Track, TrackInterpolation, TrackRegistration, Value, ValueKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Sprite {
    position: [f32; 3],
    opacity: f32,
}

struct SpriteBinding;

impl AnimationBinding for SpriteBinding {
    type Target = Sprite;

    fn registrations(&self) -> Vec<TrackRegistration> {
        vec![
            TrackRegistration::new("position", ValueKind::Vec3).unwrap(),
            TrackRegistration::new("opacity", ValueKind::Single).unwrap(),
        ]
    }

    fn apply_vec3(&mut self, reg: &TrackRegistration, target: &mut Sprite, value: [f32; 3]) {
        if reg.name() == "position" {
            target.position = value;
        }
    }

    fn apply_single(&mut self, reg: &TrackRegistration, target: &mut Sprite, value: f32) {
        if reg.name() == "opacity" {
            target.opacity = value;
        }
    }
}

fn position_track() -> Track {
    let mut track = Track::new("position", ValueKind::Vec3).unwrap();
    track
        .add_key(KeyFrame::new(0.0, Value::vec3(0.0, 0.0, 0.0)).unwrap())
        .unwrap();
    track
        .add_key(KeyFrame::new(1.0, Value::vec3(10.0, 0.0, 0.0)).unwrap())
        .unwrap();
    track.set_mode(InterpolationMode::Linear);
    track
}

fn slide_animation(looped: bool) -> Animation {
    Animation::builder("slide")
        .length(1.0)
        .looped(looped)
        .track(position_track())
        .build()
        .unwrap()
}

fn controller() -> AnimationController<SpriteBinding> {
    AnimationController::new(SpriteBinding).unwrap()
}

#[test]
fn test_play_dispatches_first_frame() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();

    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.time(), 0.0);
    assert_eq!(ctl.target().unwrap().position, [0.0, 0.0, 0.0]);
    assert_eq!(ctl.playable_tracks().count(), 1);
}

#[test]
fn test_update_interpolates_then_stops_at_end() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();

    assert!(ctl.update(0.5).is_none());
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);
    assert_eq!(ctl.state(), PlaybackState::Playing);

    // Cumulative time 1.1 clamps to the end, dispatches the final pose,
    // and tears playback down in the same call.
    let (sprite, animation) = ctl.update(0.6).unwrap();
    assert_eq!(sprite.position, [10.0, 0.0, 0.0]);
    assert_eq!(animation.name(), "slide");
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    assert!(ctl.animation().is_none());
    assert!(ctl.target().is_none());
}

#[test]
fn test_looped_update_wraps_and_counts() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(true)).unwrap();

    assert!(ctl.update(1.5).is_none());
    assert_relative_eq!(ctl.time(), 0.5);
    assert_eq!(ctl.loop_counter(), 1);
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);
}

#[test]
fn test_loop_cap_freezes_without_stopping() {
    let mut animation = slide_animation(true);
    animation.set_loop_count(1);
    let mut ctl = controller();
    ctl.play(Sprite::default(), animation).unwrap();

    // First overrun spends the loop budget.
    ctl.update(1.25);
    assert_relative_eq!(ctl.time(), 0.25);
    assert_eq!(ctl.loop_counter(), 1);

    // In-range advances still apply.
    ctl.update(0.5);
    assert_relative_eq!(ctl.time(), 0.75);

    // A second overrun is ignored: time and pose freeze, state stays Playing.
    ctl.update(1.0);
    assert_relative_eq!(ctl.time(), 0.75);
    assert_relative_eq!(ctl.target().unwrap().position[0], 7.5);
    assert_eq!(ctl.state(), PlaybackState::Playing);
}

#[test]
fn test_play_rejects_capability_mismatch() {
    let mut restricted = Track::with_support(
        "position",
        ValueKind::Vec3,
        TrackInterpolation::NONE | TrackInterpolation::LINEAR,
    )
    .unwrap();
    restricted
        .add_key(KeyFrame::new(0.0, Value::vec3(0.0, 0.0, 0.0)).unwrap())
        .unwrap();
    let animation = Animation::builder("slide")
        .length(1.0)
        .track(restricted)
        .build()
        .unwrap();

    let mut ctl = controller();
    let err = ctl.play(Sprite::default(), animation).unwrap_err();
    assert!(matches!(
        err,
        AnimationError::UnsupportedInterpolation { ref track, .. } if track == "position"
    ));
    // Failed play leaves the controller untouched.
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    assert!(ctl.animation().is_none());
}

#[test]
fn test_failed_play_preserves_current_session() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    ctl.update(0.5);

    let mut restricted = Track::with_support("position", ValueKind::Vec3, TrackInterpolation::NONE)
        .unwrap();
    restricted
        .add_key(KeyFrame::new(0.0, Value::vec3(1.0, 1.0, 1.0)).unwrap())
        .unwrap();
    let bad = Animation::builder("bad")
        .length(1.0)
        .track(restricted)
        .build()
        .unwrap();

    assert!(ctl.play(Sprite::default(), bad).is_err());
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.animation().unwrap().name(), "slide");
    assert_relative_eq!(ctl.time(), 0.5);
}

#[test]
fn test_unmatched_registrations_are_skipped() {
    // The animation only animates position; the opacity registration simply
    // never becomes playable.
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    assert_eq!(ctl.playable_tracks().count(), 1);
    assert_eq!(ctl.playable_tracks().next().unwrap().name(), "position");
}

#[test]
fn test_pause_and_resume() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    ctl.update(0.25);

    ctl.pause();
    assert_eq!(ctl.state(), PlaybackState::Paused);

    // Updates are ignored while paused.
    ctl.update(0.5);
    assert_relative_eq!(ctl.time(), 0.25);

    ctl.resume();
    assert_eq!(ctl.state(), PlaybackState::Playing);
    ctl.update(0.25);
    assert_relative_eq!(ctl.time(), 0.5);
}

#[test]
fn test_play_same_name_while_paused_resumes() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    ctl.update(0.5);
    ctl.pause();

    // Re-playing the same animation (by name) while paused keeps the time
    // cursor instead of restarting.
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_relative_eq!(ctl.time(), 0.5);
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);
}

#[test]
fn test_play_different_name_while_paused_restarts() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    ctl.update(0.5);
    ctl.pause();

    let other = Animation::builder("other")
        .length(1.0)
        .track(position_track())
        .build()
        .unwrap();
    ctl.play(Sprite::default(), other).unwrap();
    assert_eq!(ctl.state(), PlaybackState::Playing);
    assert_eq!(ctl.time(), 0.0);
    assert_eq!(ctl.animation().unwrap().name(), "other");
}

#[test]
fn test_pause_without_animation_forces_stopped() {
    let mut ctl = controller();
    ctl.pause();
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    ctl.resume();
    assert_eq!(ctl.state(), PlaybackState::Stopped);
}

#[test]
fn test_stop_returns_bound_pair_in_rest_pose() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(true)).unwrap();
    ctl.update(0.5);
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);

    // Stop rewinds and dispatches before detaching, so the returned target
    // carries the start-of-timeline pose, not the mid-playback one.
    let (sprite, animation) = ctl.stop().unwrap();
    assert_eq!(sprite.position, [0.0, 0.0, 0.0]);
    assert_eq!(animation.name(), "slide");
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    assert_eq!(ctl.time(), 0.0);
    assert_eq!(ctl.loop_counter(), 0);
    assert!(ctl.stop().is_none());
}

#[test]
fn test_reverse_speed_starts_at_end() {
    let mut animation = slide_animation(false);
    animation.set_speed(-1.0);
    let mut ctl = controller();
    ctl.play(Sprite::default(), animation).unwrap();

    assert_relative_eq!(ctl.time(), 1.0);
    assert_eq!(ctl.target().unwrap().position, [10.0, 0.0, 0.0]);

    ctl.update(0.5);
    assert_relative_eq!(ctl.time(), 0.5);
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);

    // Running past zero clamps, dispatches the first pose, and stops.
    let (sprite, _) = ctl.update(0.6).unwrap();
    assert_eq!(sprite.position, [0.0, 0.0, 0.0]);
    assert_eq!(ctl.state(), PlaybackState::Stopped);
}

#[test]
fn test_set_time_scrubs_without_stopping() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();

    // Direct scrubbing past the end clamps but keeps the session alive.
    ctl.set_time(5.0);
    assert_relative_eq!(ctl.time(), 1.0);
    assert_eq!(ctl.target().unwrap().position, [10.0, 0.0, 0.0]);
    assert_eq!(ctl.state(), PlaybackState::Playing);

    ctl.set_time(0.5);
    assert_relative_eq!(ctl.target().unwrap().position[0], 5.0);
}

#[test]
fn test_refresh_redispatches_current_pose() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(false)).unwrap();
    ctl.update(0.5);

    let before = *ctl.target().unwrap();
    ctl.refresh();
    assert_eq!(*ctl.target().unwrap(), before);
    assert_relative_eq!(ctl.time(), 0.5);
}

#[test]
fn test_reset_rewinds_and_redispatches() {
    let mut ctl = controller();
    ctl.play(Sprite::default(), slide_animation(true)).unwrap();
    ctl.update(1.5);
    assert_eq!(ctl.loop_counter(), 1);

    ctl.reset();
    assert_eq!(ctl.time(), 0.0);
    assert_eq!(ctl.loop_counter(), 0);
    assert_eq!(ctl.target().unwrap().position, [0.0, 0.0, 0.0]);
}

#[test]
fn test_disabled_track_is_not_dispatched() {
    let mut animation = slide_animation(false);
    animation
        .track_mut("position", ValueKind::Vec3)
        .unwrap()
        .set_enabled(false);

    let mut ctl = controller();
    let sprite = Sprite {
        position: [9.0, 9.0, 9.0],
        opacity: 0.0,
    };
    ctl.play(sprite, animation).unwrap();
    ctl.update(0.5);
    assert_eq!(ctl.target().unwrap().position, [9.0, 9.0, 9.0]);
}

#[test]
fn test_multiple_tracks_dispatch_together() {
    let mut opacity = Track::new("opacity", ValueKind::Single).unwrap();
    opacity
        .add_key(KeyFrame::new(0.0, Value::single(0.0)).unwrap())
        .unwrap();
    opacity
        .add_key(KeyFrame::new(1.0, Value::single(1.0)).unwrap())
        .unwrap();
    opacity.set_mode(InterpolationMode::Linear);

    let animation = Animation::builder("fade_slide")
        .length(1.0)
        .track(position_track())
        .track(opacity)
        .build()
        .unwrap();

    let mut ctl = controller();
    ctl.play(Sprite::default(), animation).unwrap();
    assert_eq!(ctl.playable_tracks().count(), 2);

    ctl.update(0.5);
    let sprite = ctl.target().unwrap();
    assert_relative_eq!(sprite.position[0], 5.0);
    assert_relative_eq!(sprite.opacity, 0.5);
}

#[test]
fn test_duplicate_registration_rejected() {
    #[derive(Debug)]
    struct DuplicateBinding;
    impl AnimationBinding for DuplicateBinding {
        type Target = Sprite;
        fn registrations(&self) -> Vec<TrackRegistration> {
            vec![
                TrackRegistration::new("position", ValueKind::Vec3).unwrap(),
                TrackRegistration::new("position", ValueKind::Vec3).unwrap(),
            ]
        }
    }

    let err = AnimationController::new(DuplicateBinding).unwrap_err();
    assert!(matches!(err, AnimationError::Argument { .. }));
}

#[test]
fn test_update_while_stopped_is_a_no_op() {
    let mut ctl = controller();
    assert!(ctl.update(1.0).is_none());
    assert_eq!(ctl.state(), PlaybackState::Stopped);
    assert_eq!(ctl.time(), 0.0);
}
