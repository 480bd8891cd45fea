use quantum::{measurement::frequencies, BellState};
use rng::ShotRng;
use simulator::{filter_degrees_to_radians, BellEngine};

#[test]
fn zero_pairs_return_zero_counts_without_drawing() {
    let engine = BellEngine::for_bell_state(BellState::PhiPlus, 0.0).unwrap();
    let mut rng = ShotRng::new(b"zero");
    let counts = engine.measure(0, 0.3, 1.2, &mut rng).unwrap();
    assert_eq!(counts, [0, 0, 0, 0]);
    assert_eq!(rng.draws(), 0);
}

#[test]
fn counts_sum_to_n() {
    let engine = BellEngine::for_bell_state(BellState::PhiMinus, 0.2).unwrap();
    let mut rng = ShotRng::new(b"sum");
    for n in [1u64, 7, 100, 1234] {
        let counts = engine.measure(n, -0.7, 0.25, &mut rng).unwrap();
        assert_eq!(counts.iter().sum::<u64>(), n);
    }
}

#[test]
fn frequencies_match_probabilities() {
    let engine = BellEngine::for_bell_state(BellState::PhiPlus, 0.1).unwrap();
    let (a, b) = (0.35, -0.6);
    let mut rng = ShotRng::new(b"frequencies");
    let counts = engine.measure(100_000, a, b, &mut rng).unwrap();

    let freq = frequencies(&counts);
    let probs = engine.probabilities(a, b);
    for i in 0..4 {
        assert!(
            (freq[i] - probs[i]).abs() < 0.01,
            "outcome {}: freq {} vs p {}",
            i,
            freq[i],
            probs[i]
        );
    }
}

#[test]
fn filter_degree_variant_matches_radian_variant() {
    let engine = BellEngine::for_bell_state(BellState::PsiMinus, 0.05).unwrap();
    let (a_deg, b_deg) = (22.5, -11.25);

    let mut r1 = ShotRng::new(b"filters");
    let mut r2 = ShotRng::new(b"filters");
    let via_degrees = engine.measure_filter_degrees(5000, a_deg, b_deg, &mut r1).unwrap();
    let via_radians = engine
        .measure(
            5000,
            a_deg * std::f64::consts::PI / 90.0,
            b_deg * std::f64::consts::PI / 90.0,
            &mut r2,
        )
        .unwrap();
    assert_eq!(via_degrees, via_radians);

    let pa = engine.probabilities(filter_degrees_to_radians(a_deg), filter_degrees_to_radians(b_deg));
    let pb = engine.probabilities(a_deg * std::f64::consts::PI / 90.0, b_deg * std::f64::consts::PI / 90.0);
    assert_eq!(pa, pb);
}

#[test]
fn aligned_phi_plus_never_disagrees() {
    let engine = BellEngine::for_bell_state(BellState::PhiPlus, 0.0).unwrap();
    let mut rng = ShotRng::new(b"aligned");
    let counts = engine.measure(2000, 0.4, 0.4, &mut rng).unwrap();
    assert_eq!(counts[1], 0, "found HV: {:?}", counts);
    assert_eq!(counts[2], 0, "found VH: {:?}", counts);
    assert!(counts[0] > 0 && counts[3] > 0, "counts = {:?}", counts);
}
