use super::*;

#[test]
fn progress_is_monotonic_until_completed() {
    let mut pb = PlaybackState {
        speed_multiplier: 3,
        ..PlaybackState::default()
    };
    let mut clock = PlaybackClock::new(0.01);
    clock.play(&mut pb);
    assert!(clock.driver().is_active());

    let mut last = pb.progress;
    let mut frames = 0;
    while clock.state() == ClockState::Playing {
        clock.step(&mut pb);
        assert!(pb.progress >= last);
        last = pb.progress;
        frames += 1;
        assert!(frames < 1_000);
    }
    assert_eq!(frames, 34);
    assert_eq!(pb.progress, 1.0);
    assert_eq!(clock.state(), ClockState::Completed);
    assert!(!pb.playing);
    assert!(!clock.driver().is_active());
}

#[test]
fn play_after_completion_restarts() {
    let mut pb = PlaybackState::default();
    let mut clock = PlaybackClock::new(0.5);
    clock.play(&mut pb);
    clock.step(&mut pb);
    assert!(clock.step(&mut pb));
    assert_eq!(clock.state(), ClockState::Completed);

    clock.play(&mut pb);
    assert_eq!(pb.progress, 0.0);
    assert_eq!(clock.state(), ClockState::Playing);
    assert_eq!(clock.driver().generation(), 2);
}

#[test]
fn scrub_keeps_playing_flag() {
    let mut pb = PlaybackState::default();
    let mut clock = PlaybackClock::new(0.01);
    clock.scrub(&mut pb, 0.4);
    assert!(!pb.playing);
    assert_eq!(pb.progress, 0.4);

    clock.play(&mut pb);
    clock.scrub(&mut pb, 0.9);
    assert!(pb.playing);
    assert_eq!(clock.state(), ClockState::Playing);
}

#[test]
fn scrubbing_back_from_completed_leaves_position_alone_on_play() {
    let mut pb = PlaybackState::default();
    let mut clock = PlaybackClock::new(1.0);
    clock.play(&mut pb);
    clock.step(&mut pb);
    clock.scrub(&mut pb, 0.3);
    assert_eq!(clock.state(), ClockState::Idle);
    clock.play(&mut pb);
    assert_eq!(pb.progress, 0.3);
}

#[test]
fn pause_cancels_driver_and_steps_are_ignored() {
    let mut pb = PlaybackState::default();
    let mut clock = PlaybackClock::new(0.1);
    clock.toggle(&mut pb);
    clock.step(&mut pb);
    clock.toggle(&mut pb);
    assert!(!clock.driver().is_active());
    let p = pb.progress;
    assert!(!clock.step(&mut pb));
    assert_eq!(pb.progress, p);
}
