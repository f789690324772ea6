use crate::*;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_f64(&mut self, start: f64, end: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        start + (end - start) * unit
    }
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance * scale,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}

/// Rest at 0, then a jump to 100 at t = 0.
fn jump_0_to_100() -> (Spring, Oscillator) {
    let spring = Spring::new(SpringConfig::new(27.8, 1.0, 200.0)).unwrap();
    let threshold = Some(spring.settle_threshold());
    let osc = Oscillator::untargeted(&spring, 0.0)
        .retarget(0.0, 0.0, threshold)
        .retarget(100.0, 0.0, threshold);
    (spring, osc)
}

#[test]
fn default_spring_coefficients() {
    let spring = Spring::new(SpringConfig::default()).unwrap();
    assert_close(spring.alpha(), -13.9, 1e-12);
    assert_close(spring.beta(), (27.8 * 27.8 - 800.0) / 2.0, 1e-12);
    assert!(spring.beta() < 0.0);
    assert_eq!(spring, Spring::default());
}

#[test]
fn overdamped_spring_is_rejected_at_construction() {
    let err = Spring::new(SpringConfig::new(40.0, 1.0, 200.0)).unwrap_err();
    assert!(matches!(err, SpringError::NotUnderdamped { discriminant } if discriminant > 0.0));

    // Critically damped: damping² == 4·mass·stiffness.
    let err = Spring::new(SpringConfig::new(20.0, 1.0, 100.0)).unwrap_err();
    assert_eq!(err, SpringError::NotUnderdamped { discriminant: 0.0 });
}

#[test]
fn invalid_constants_are_rejected() {
    assert_eq!(
        Spring::new(SpringConfig::default().with_mass(0.0)).unwrap_err(),
        SpringError::InvalidMass { mass: 0.0 }
    );
    assert!(matches!(
        Spring::new(SpringConfig::default().with_stiffness(f64::NAN)).unwrap_err(),
        SpringError::NonFinite {
            name: "stiffness",
            ..
        }
    ));
    assert!(matches!(
        Spring::new(SpringConfig::default().with_settle_threshold(f64::INFINITY)).unwrap_err(),
        SpringError::NonFinite {
            name: "settle_threshold",
            ..
        }
    ));

    // Negative damping still has a negative discriminant but grows instead of decaying.
    assert_eq!(
        Spring::new(SpringConfig::new(-27.8, 1.0, 200.0)).unwrap_err(),
        SpringError::NotPositive {
            name: "damping",
            value: -27.8
        }
    );
    assert!(matches!(
        Spring::new(SpringConfig::new(0.0, 1.0, 200.0)).unwrap_err(),
        SpringError::NotPositive { name: "damping", .. }
    ));
    for threshold in [0.0, -1.0] {
        assert_eq!(
            Spring::new(SpringConfig::default().with_settle_threshold(threshold)).unwrap_err(),
            SpringError::NotPositive {
                name: "settle_threshold",
                value: threshold
            }
        );
    }
    assert_eq!(
        Spring::new(SpringConfig::default().with_snap_threshold(-0.1)).unwrap_err(),
        SpringError::Negative {
            name: "snap_threshold",
            value: -0.1
        }
    );
    assert!(Spring::new(SpringConfig::default().with_snap_threshold(0.0)).is_ok());
}

#[test]
fn first_target_starts_at_rest() {
    let spring = Spring::default();
    let osc = Oscillator::untargeted(&spring, 10.0);
    assert_eq!(osc.target(), None);
    assert_eq!(osc.value_at(500.0), None);

    let osc = osc.retarget(42.0, 10.0, Some(spring.settle_threshold()));
    assert_eq!(osc.c1(), 0.0);
    assert_eq!(osc.c2(), 0.0);
    assert_eq!(osc.t0(), 10.0);
    assert_eq!(osc.end_time(), Some(10.0));
    for t in [10.0, 11.0, 50.0, 1_000.0, 60_000.0] {
        assert_eq!(osc.value_at(t), Some(42.0));
        assert_eq!(osc.velocity_at(t), 0.0);
    }
    assert!(osc.is_done(10.5));
}

#[test]
fn jump_starts_at_full_offset_and_overshoots() {
    let (spring, osc) = jump_0_to_100();
    assert_eq!(osc.target(), Some(100.0));
    assert_close(osc.offset_at(0.0), -100.0, 1e-12);
    assert_close(osc.value_at(0.0).unwrap(), 0.0, 1e-12);
    assert_close(osc.velocity_at(0.0), 0.0, 1e-12);

    // Under-damped: the offset crosses zero at least once before settling.
    let mut crossed_at = None;
    let mut prev = osc.offset_at(0.0);
    for ms in 1..=400 {
        let x = osc.offset_at(ms as f64);
        if prev < 0.0 && x >= 0.0 {
            crossed_at = Some(ms);
            break;
        }
        prev = x;
    }
    let crossed_at = crossed_at.expect("oscillation should overshoot the target");
    assert!((150..200).contains(&crossed_at), "crossed at {crossed_at}ms");

    let end = osc.end_time().unwrap();
    assert!(end > crossed_at as f64);
    assert!(osc.offset_at(end + 1.0).abs() <= spring.settle_threshold());
    assert_close(osc.value_at(5_000.0).unwrap(), 100.0, 1e-9);
}

#[test]
fn retarget_mid_flight_preserves_velocity() {
    let (spring, osc) = jump_0_to_100();
    let now = 50.0;
    let before_x = osc.value_at(now).unwrap();
    let before_v = osc.velocity_at(now);
    assert!(before_v.abs() > 1.0, "should be moving at 50ms");

    let next = osc.retarget(-30.0, now, Some(spring.settle_threshold()));
    assert_eq!(next.t0(), now);
    assert_eq!(next.alpha(), osc.alpha());
    assert_eq!(next.beta(), osc.beta());

    // Reconstruct the velocity from the new coefficients at τ = 0.
    let reconstructed = next.alpha() * next.c1() + next.beta() * next.c2();
    assert_close(reconstructed, before_v, 1e-12);
    assert_close(next.velocity_at(now), before_v, 1e-12);
    assert_close(next.value_at(now).unwrap(), before_x, 1e-12);
    assert_close(next.c1(), before_x - -30.0, 1e-12);
}

#[test]
fn random_retarget_sequences_are_continuous() {
    let spring = Spring::default();
    let threshold = Some(spring.settle_threshold());
    let mut rng = Lcg::new(0x5eed);

    for _ in 0..20 {
        let mut now = 0.0;
        let mut osc = Oscillator::untargeted(&spring, now).retarget(
            rng.gen_range_f64(-500.0, 500.0),
            now,
            threshold,
        );
        for _ in 0..30 {
            now += rng.gen_range_f64(0.5, 120.0);
            let x = osc.value_at(now).unwrap();
            let v = osc.velocity_at(now);
            osc = osc.retarget(rng.gen_range_f64(-500.0, 500.0), now, threshold);
            assert_close(osc.value_at(now).unwrap(), x, 1e-9);
            assert_close(osc.velocity_at(now), v, 1e-9);
        }
    }
}

#[test]
fn retarget_to_current_position_keeps_moving() {
    let (spring, osc) = jump_0_to_100();
    let now = 50.0;
    let here = osc.value_at(now).unwrap();
    let v = osc.velocity_at(now);

    // Zero offset but nonzero velocity: the axis still overshoots and must keep sampling.
    let next = osc.retarget(here, now, Some(spring.settle_threshold()));
    assert_eq!(next.c1(), 0.0);
    assert!(next.c2() != 0.0);
    assert_close(next.velocity_at(now), v, 1e-12);
    let end = next.end_time().unwrap();
    assert!(end > now + 100.0, "end_time = {end}");
    assert!(!next.is_done(now + 1.0));
    assert!(next.offset_at(now + 40.0).abs() > spring.settle_threshold());
}

#[test]
fn peak_displacement_shrinks_every_half_period() {
    let (_, osc) = jump_0_to_100();
    let mut peaks = vec![osc.offset_at(0.0).abs()];
    let mut prev_v = osc.velocity_at(1.0);
    for ms in 2..=1_500 {
        let t = ms as f64;
        let v = osc.velocity_at(t);
        if (prev_v < 0.0) != (v < 0.0) {
            peaks.push(osc.offset_at(t).abs());
        }
        prev_v = v;
    }
    assert!(peaks.len() >= 4, "peaks: {peaks:?}");
    for pair in peaks.windows(2) {
        assert!(pair[1] < pair[0], "peaks: {peaks:?}");
    }
}

#[test]
fn settles_below_threshold_after_end_time() {
    let (spring, osc) = jump_0_to_100();
    let end = osc.end_time().unwrap();
    assert!(!osc.is_done(end));
    assert!(osc.is_done(end + 0.001));

    let amplitude = osc.c1().hypot(osc.c2());
    let mut t = end;
    while t < end + 2_000.0 {
        assert!(osc.offset_at(t).abs() <= spring.settle_threshold() + 1e-12);
        t += 3.7;
    }

    // The envelope bounds the offset everywhere.
    for ms in 0..1_000 {
        let t = ms as f64;
        let envelope = amplitude * (osc.alpha() * t / 1000.0).exp();
        assert!(osc.offset_at(t).abs() <= envelope + 1e-9);
    }
}

#[test]
fn small_displacement_is_done_immediately() {
    let spring = Spring::default();
    let threshold = Some(spring.settle_threshold());
    let osc = Oscillator::untargeted(&spring, 0.0)
        .retarget(10.0, 0.0, threshold)
        .retarget(10.1, 100.0, threshold);
    assert_eq!(osc.end_time(), Some(100.0));
    assert!(osc.is_done(100.5));
}

#[test]
fn untracked_end_time_never_finishes() {
    let spring = Spring::new(SpringConfig::default().with_track_end_time(false)).unwrap();
    let mut axis = AxisState::new(&spring, 0.0);
    assert_eq!(axis.params().end_time(), None);
    axis.retarget(&spring, 0.0, 0.0);
    axis.retarget(&spring, 50.0, 0.0);
    assert_eq!(axis.params().end_time(), None);
    assert!(!axis.is_done(1.0e9));
}

#[test]
fn axis_retarget_to_same_value_is_a_no_op() {
    let spring = Spring::default();
    let mut axis = AxisState::new(&spring, 0.0);
    assert!(axis.retarget(&spring, 0.0, 0.0));
    assert!(axis.retarget(&spring, 100.0, 10.0));
    let before = *axis.params();

    assert!(!axis.retarget(&spring, 100.0, 80.0));
    assert_eq!(*axis.params(), before);
    assert_eq!(axis.params().t0(), 10.0);

    assert!(axis.retarget(&spring, 100.5, 80.0));
    assert_eq!(axis.params().t0(), 80.0);
    assert_eq!(axis.target(), Some(100.5));
}

#[test]
fn registry_returns_the_same_axes_for_an_identity() {
    let spring = Spring::default();
    let mut scope = SharedLayout::<&'static str>::new();
    let id = LayoutId::Shared("first");

    let axes = scope.get(&id, 2, || AxisState::new(&spring, 0.0));
    assert_eq!(axes.len(), 2);
    axes[0].retarget(&spring, 0.0, 0.0);
    axes[0].retarget(&spring, 100.0, 0.0);
    let moving = axes[0];

    let again = scope.get(&id, 2, || AxisState::new(&spring, 99.0));
    assert_eq!(again[0], moving);
    assert_eq!(again[1].target(), None);

    // Growing keeps existing axes.
    let grown = scope.get(&id, 4, || AxisState::new(&spring, 0.0));
    assert_eq!(grown.len(), 4);
    assert_eq!(grown[0], moving);
    assert_eq!(scope.len(), 1);
}

#[test]
fn shared_identity_survives_remount() {
    let spring = Spring::default();
    let mut scope = SharedLayout::<u32>::new();
    let id = LayoutId::Shared(7);

    // First mount.
    scope.acquire(&id);
    let axes = scope.get(&id, 1, || AxisState::new(&spring, 0.0));
    axes[0].retarget(&spring, 0.0, 0.0);
    axes[0].retarget(&spring, 240.0, 0.0);
    let in_flight = axes[0];
    scope.release(&id);
    assert_eq!(scope.mounts(&id), 0);

    // Remount under the same key before pruning.
    scope.acquire(&id);
    let axes = scope.get(&id, 1, || AxisState::new(&spring, 30.0));
    assert_eq!(axes[0], in_flight);
    assert_eq!(axes[0].target(), Some(240.0));
    assert!(!axes[0].is_done(30.0));
    assert_eq!(scope.prune(), 0);
}

#[test]
fn private_identities_never_collide_and_are_released() {
    let spring = Spring::default();
    let mut scope = SharedLayout::<u32>::new();
    let a = scope.private_id();
    let b = scope.private_id();
    assert_ne!(a, b);

    scope.acquire(&a);
    scope.acquire(&b);
    scope.get(&a, 1, || AxisState::new(&spring, 0.0))[0].retarget(&spring, 5.0, 0.0);
    assert_eq!(scope.get(&b, 1, || AxisState::new(&spring, 0.0))[0].target(), None);

    scope.release(&a);
    assert!(!scope.contains(&a));
    assert!(scope.contains(&b));
}

#[test]
fn prune_evicts_unreferenced_shared_entries() {
    let spring = Spring::default();
    let mut scope = SharedLayout::<String>::new();
    let live = LayoutId::Shared("live".to_string());
    let gone = LayoutId::Shared("gone".to_string());

    scope.acquire(&live);
    scope.acquire(&gone);
    scope.get(&live, 2, || AxisState::new(&spring, 0.0));
    scope.get(&gone, 2, || AxisState::new(&spring, 0.0));
    scope.release(&gone);

    assert_eq!(scope.len(), 2);
    assert_eq!(scope.prune(), 1);
    assert!(scope.contains(&live));
    assert!(!scope.contains(&gone));
    assert!(scope.axes(&gone).is_none());
}

#[test]
fn affine_from_corners_maps_the_box() {
    let tl = Point::new(10.0, 20.0);
    let tr = Point::new(110.0, 45.0);
    let bl = Point::new(-15.0, 70.0);
    let m = Affine::from_corners(100.0, 50.0, tl, tr, bl).unwrap();
    assert_eq!(m.transform_point(Point::new(0.0, 0.0)), tl);
    assert_eq!(m.transform_point(Point::new(100.0, 0.0)), tr);
    assert_eq!(m.transform_point(Point::new(0.0, 50.0)), bl);
    assert!(Affine::from_corners(0.0, 50.0, tl, tr, bl).is_none());

    let t = Affine::translate(3.0, -4.0);
    assert_eq!(t.transform_point(Point::default()), Point::new(3.0, -4.0));
}
