use super::*;

const ALL: [Ease; 5] = [
    Ease::Linear,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn sample_interpolates_values() {
    assert_eq!(Ease::Linear.sample(&10.0, &20.0, 0.5), 15.0);
    assert_eq!(Ease::OutCubic.sample(&0.0, &8.0, 0.5), 7.0);
}

#[test]
fn nan_time_is_start() {
    assert_eq!(Ease::OutCubic.apply(f64::NAN), 0.0);
}
