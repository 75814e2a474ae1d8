use super::*;

#[test]
fn waits_for_delay_after_completion() {
    let mut s = FleetSequencer::new(1_200.0);
    assert_eq!(
        s.tick(0.0, true, ClockState::Playing, 0, 3, true),
        FleetStep::Idle
    );
    assert_eq!(
        s.tick(100.0, true, ClockState::Completed, 0, 3, true),
        FleetStep::Waiting
    );
    assert_eq!(
        s.tick(1_299.0, true, ClockState::Completed, 0, 3, true),
        FleetStep::Waiting
    );
    assert_eq!(
        s.tick(1_300.0, true, ClockState::Completed, 0, 3, true),
        FleetStep::Advance { from: 0, to: 1 }
    );
    assert!(!s.is_waiting());
}

#[test]
fn wraps_around_the_fleet() {
    let mut s = FleetSequencer::new(0.0);
    let mut index = 0;
    let mut seen = vec![index];
    for i in 0..4 {
        match s.tick(i as f64, true, ClockState::Completed, index, 3, true) {
            FleetStep::Advance { to, .. } => index = to,
            other => panic!("unexpected {other:?}"),
        }
        seen.push(index);
    }
    assert_eq!(seen, vec![0, 1, 2, 0, 1]);
}

#[test]
fn empty_route_advances_on_next_tick() {
    let mut s = FleetSequencer::new(1_200.0);
    assert_eq!(
        s.tick(0.0, true, ClockState::Idle, 2, 3, false),
        FleetStep::Advance { from: 2, to: 0 }
    );
}

#[test]
fn disabled_autoplay_cancels_pending_advance() {
    let mut s = FleetSequencer::new(1_200.0);
    s.tick(0.0, true, ClockState::Completed, 0, 3, true);
    assert!(s.is_waiting());
    assert_eq!(
        s.tick(10.0, false, ClockState::Completed, 0, 3, true),
        FleetStep::Idle
    );
    assert!(!s.is_waiting());
    assert_eq!(
        s.tick(5_000.0, true, ClockState::Idle, 0, 0, false),
        FleetStep::Idle
    );
}
