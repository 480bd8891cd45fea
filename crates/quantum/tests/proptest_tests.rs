//! Property tests for the coincidence statistics of depolarized Bell states.

use proptest::prelude::*;
use quantum::{
    density::DensityMatrix,
    observables::{direct_correlation, CorrelationForm},
    BellState,
};

fn state_strategy() -> impl Strategy<Value = BellState> {
    prop::sample::select(BellState::ALL.to_vec())
}

proptest! {
    #[test]
    fn correlation_is_bounded(
        state in state_strategy(),
        noise in 0.0f64..=1.0,
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        let rho = DensityMatrix::depolarized(&state.vector(), noise).unwrap();
        let form = CorrelationForm::derive(&rho).unwrap();
        let c = form.correlation(a, b);
        prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&c), "C = {}", c);
    }

    #[test]
    fn probabilities_are_normalized_and_nonnegative(
        state in state_strategy(),
        noise in 0.0f64..=1.0,
        a in -std::f64::consts::PI..std::f64::consts::PI,
        b in -std::f64::consts::PI..std::f64::consts::PI,
    ) {
        let rho = DensityMatrix::depolarized(&state.vector(), noise).unwrap();
        let form = CorrelationForm::derive(&rho).unwrap();
        let p = form.probabilities(a, b);
        let sum: f64 = p.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
        for x in p {
            prop_assert!(x >= -1e-12, "p = {:?}", p);
        }
    }

    #[test]
    fn closed_form_matches_direct_evaluation(
        state in state_strategy(),
        noise in 0.0f64..=1.0,
        a in -4.0f64..4.0,
        b in -4.0f64..4.0,
    ) {
        let rho = DensityMatrix::depolarized(&state.vector(), noise).unwrap();
        let form = CorrelationForm::derive(&rho).unwrap();
        let diff = (form.correlation(a, b) - direct_correlation(&rho, a, b)).abs();
        prop_assert!(diff < 1e-12, "diff = {}", diff);
    }
}
