use quantum::BellState;
use rng::ShotRng;
use simulator::{
    estimate_chsh_shots, noise_sweep, radians_to_filter_degrees, run_chsh_round, BellEngine,
    EngineConfig, RecordingMount, SimulatedCounter, TSIRELSON_BOUND,
};

#[test]
fn simulated_round_violates_classical_bound() {
    let engine = BellEngine::for_bell_state(BellState::PhiPlus, 0.0).unwrap();
    let mut mount = RecordingMount::new();
    let mut counter = SimulatedCounter::new(&engine, ShotRng::new(b"round"));

    let est = run_chsh_round(&mut mount, &mut counter, engine.chsh_angles(), 20_000).unwrap();

    assert!(est.violates_classical_bound(), "S = {}", est.s);
    assert!((est.s - TSIRELSON_BOUND).abs() < 0.05, "S = {}", est.s);
    assert_eq!(est.total_pairs(), 80_000);

    // mount visited (a0,b0), (a1,b0), (a0,b1), (a1,b1) in filter degrees
    let [a0, a1, b0, b1] = engine.chsh_angles().map(radians_to_filter_degrees);
    assert_eq!(mount.positions(), &[(a0, b0), (a1, b0), (a0, b1), (a1, b1)]);
    assert_eq!(mount.current(), Some((a1, b1)));
}

#[test]
fn parallel_estimate_tracks_exact_value() {
    let engine = BellEngine::for_bell_state(BellState::PsiPlus, 0.05).unwrap();
    let est = estimate_chsh_shots(&engine, 20_000, &ShotRng::new(b"parallel")).unwrap();
    assert!((est.s - engine.chsh_value()).abs() < 0.05, "S = {} vs {}", est.s, engine.chsh_value());
}

#[test]
fn sweep_is_deterministic_and_ordered() {
    let state = BellState::PhiPlus.vector();
    let noises = [0.0, 0.2, 0.5, 1.0];
    let config = EngineConfig::default();

    let first = noise_sweep(&state, &noises, &config, 500, "sweep").unwrap();
    let second = noise_sweep(&state, &noises, &config, 500, "sweep").unwrap();
    assert_eq!(first, second);

    let got: Vec<f64> = first.iter().map(|p| p.noise).collect();
    assert_eq!(got, noises.to_vec());
    assert!(first.iter().all(|p| p.converged && p.s_estimated.is_some()));
    assert!(first.windows(2).all(|w| w[1].s_max <= w[0].s_max + 1e-9));
}

#[test]
fn sweep_without_shots_skips_estimation() {
    let points = noise_sweep(
        &BellState::PsiMinus.vector(),
        &[0.0, 0.1],
        &EngineConfig::default(),
        0,
        "none",
    )
    .unwrap();
    assert!(points.iter().all(|p| p.s_estimated.is_none()));
}

#[test]
fn sweep_rejects_bad_noise() {
    let result = noise_sweep(
        &BellState::PhiPlus.vector(),
        &[0.0, 1.2],
        &EngineConfig::default(),
        0,
        "bad",
    );
    assert!(result.is_err());
}
