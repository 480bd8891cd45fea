//! Property tests for the engine's sampling surface.

use proptest::prelude::*;
use quantum::BellState;
use rng::ShotRng;
use simulator::{filter_degrees_to_radians, radians_to_filter_degrees, BellEngine};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn filter_conversion_is_invertible(deg in -360.0f64..360.0) {
        let back = radians_to_filter_degrees(filter_degrees_to_radians(deg));
        prop_assert!((back - deg).abs() < 1e-9);
    }

    #[test]
    fn counts_always_sum_to_n(
        n in 0u64..300,
        noise in 0.0f64..=1.0,
        a in -3.2f64..3.2,
        b in -3.2f64..3.2,
        seed in any::<u64>(),
    ) {
        let engine = BellEngine::for_bell_state(BellState::PhiMinus, noise).unwrap();
        let mut rng = ShotRng::new(&seed.to_be_bytes());
        let counts = engine.measure(n, a, b, &mut rng).unwrap();
        prop_assert_eq!(counts.iter().sum::<u64>(), n);
        prop_assert_eq!(rng.draws(), n);
    }
}
