use super::*;

#[test]
fn pulse_stays_in_unit_range() {
    let p = PulseOscillator::new(300.0);
    assert!((p.sample(0.0) - 0.5).abs() < 1e-12);
    let peak = 300.0 * std::f64::consts::FRAC_PI_2;
    assert!((p.sample(peak) - 1.0).abs() < 1e-12);
    for i in 0..1000 {
        let v = p.sample(i as f64 * 16.7);
        assert!((0.0..=1.0).contains(&v));
    }
}

#[test]
fn degenerate_inputs_sit_at_midpoint() {
    assert_eq!(PulseOscillator::new(0.0).sample(100.0), 0.5);
    assert_eq!(PulseOscillator::new(300.0).sample(f64::NAN), 0.5);
}
