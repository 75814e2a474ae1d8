use super::*;

#[test]
fn fires_once_after_deadline() {
    let mut t = Timer::new();
    assert!(!t.fire_if_due(1_000.0));
    t.arm(0.0, 100.0);
    assert!(!t.fire_if_due(99.0));
    assert!(t.fire_if_due(100.0));
    assert!(!t.fire_if_due(200.0));
    assert!(!t.is_armed());
}

#[test]
fn arm_debounces_and_arm_once_keeps_deadline() {
    let mut t = Timer::new();
    t.arm(0.0, 100.0);
    t.arm(50.0, 100.0);
    assert_eq!(t.due_at_ms(), Some(150.0));

    t.arm_once(80.0, 100.0);
    assert_eq!(t.due_at_ms(), Some(150.0));

    t.cancel();
    t.cancel();
    assert!(!t.fire_if_due(1_000.0));
}
