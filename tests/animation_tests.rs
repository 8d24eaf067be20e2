use animation_timeline::{Animation, InterpolationMode, KeyFrame, Track, Value, ValueKind};

fn keyed_track(name: &str, last_time: f32) -> Track {
    let mut track = Track::new(name, ValueKind::Single).unwrap();
    track
        .add_key(KeyFrame::new(0.0, Value::single(0.0)).unwrap())
        .unwrap();
    track
        .add_key(KeyFrame::new(last_time, Value::single(1.0)).unwrap())
        .unwrap();
    track
}

#[test]
fn test_length_inferred_across_tracks() {
    // Inference takes the maximum key time over all tracks.
    let animation = Animation::builder("idle")
        .track(keyed_track("alpha", 2.0))
        .track(keyed_track("beta", 3.5))
        .build()
        .unwrap();

    assert_eq!(animation.length(), 3.5);
}

#[test]
fn test_builder_options_flow_through() {
    let animation = Animation::builder("idle")
        .length(4.0)
        .looped(true)
        .loop_count(2)
        .speed(-0.5)
        .track(keyed_track("alpha", 1.0))
        .build()
        .unwrap();

    assert!(animation.looped());
    assert_eq!(animation.loop_count(), 2);
    assert_eq!(animation.speed(), -0.5);
}

#[test]
fn test_track_edits_between_sessions() {
    let mut animation = Animation::builder("idle")
        .length(2.0)
        .track(keyed_track("alpha", 1.0))
        .build()
        .unwrap();

    let track = animation.track_mut("alpha", ValueKind::Single).unwrap();
    track
        .add_key(KeyFrame::new(2.0, Value::single(0.5)).unwrap())
        .unwrap();
    track.set_mode(InterpolationMode::Linear);

    let track = animation.track("alpha", ValueKind::Single).unwrap();
    assert_eq!(track.key_count(), 3);
    assert_eq!(track.mode(), InterpolationMode::Linear);
}

#[test]
fn test_serde_round_trip() {
    let mut track = keyed_track("alpha", 1.0);
    track.set_mode(InterpolationMode::Linear);
    let animation = Animation::builder("idle")
        .length(1.0)
        .looped(true)
        .loop_count(3)
        .speed(0.5)
        .track(track)
        .build()
        .unwrap();

    let json = serde_json::to_string(&animation).unwrap();
    let restored: Animation = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, animation);
    assert_eq!(restored.loop_count(), 3);
    assert_eq!(restored.speed(), 0.5);
    assert_eq!(
        restored.track("alpha", ValueKind::Single).unwrap().mode(),
        InterpolationMode::Linear
    );
}
