use std::fmt;

use rng::ShotRng;
use tracing::debug;

use crate::error::{QuantumError, Result};

/// Largest |Σp − 1| tolerated before a distribution is rejected.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Occurrence counts in the order [HH, HV, VH, VV].
pub type Counts = [u64; 4];

/// Joint detection event of one photon pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    HH,
    HV,
    VH,
    VV,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::HH, Outcome::HV, Outcome::VH, Outcome::VV];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based code used by the downstream message layer.
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    /// +1 when both photons agree, −1 otherwise.
    pub fn parity(self) -> i8 {
        match self {
            Outcome::HH | Outcome::VV => 1,
            Outcome::HV | Outcome::VH => -1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::HH => "HH",
            Outcome::HV => "HV",
            Outcome::VH => "VH",
            Outcome::VV => "VV",
        };
        f.write_str(s)
    }
}

/// Clamp negative round-off to zero and renormalize.
///
/// Fails when the raw vector is non-finite or its sum is further than
/// [`PROBABILITY_TOLERANCE`] from 1.
pub fn sanitize_probabilities(raw: [f64; 4]) -> Result<[f64; 4]> {
    let sum: f64 = raw.iter().sum();
    if raw.iter().any(|p| !p.is_finite()) || (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(QuantumError::DegenerateDistribution {
            probabilities: raw,
            sum,
        });
    }

    let mut probs = raw;
    for p in probs.iter_mut() {
        if *p < 0.0 {
            if *p < -PROBABILITY_TOLERANCE {
                return Err(QuantumError::DegenerateDistribution {
                    probabilities: raw,
                    sum,
                });
            }
            debug!(value = *p, "clamping negative outcome probability");
            *p = 0.0;
        }
    }

    let total: f64 = probs.iter().sum();
    if total <= 0.0 {
        return Err(QuantumError::DegenerateDistribution {
            probabilities: raw,
            sum,
        });
    }
    for p in probs.iter_mut() {
        *p /= total;
    }
    Ok(probs)
}

/// One categorical draw from an already sanitized distribution.
pub fn sample_outcome(probs: &[f64; 4], rng: &mut ShotRng) -> Outcome {
    let mut x = rng.next_f64(b"COINCIDENCE");
    let mut last = Outcome::VV;
    for outcome in Outcome::ALL {
        let p = probs[outcome.index()];
        if p <= 0.0 {
            continue;
        }
        if x < p {
            return outcome;
        }
        x -= p;
        last = outcome;
    }
    // round-off left x just past the final bucket
    last
}

/// Draw `n` independent pairs and tally them. `n == 0` never touches `rng`.
pub fn sample_counts(n: u64, probs: [f64; 4], rng: &mut ShotRng) -> Result<Counts> {
    let mut counts = [0u64; 4];
    if n == 0 {
        return Ok(counts);
    }

    let probs = sanitize_probabilities(probs)?;
    for _ in 0..n {
        counts[sample_outcome(&probs, rng).index()] += 1;
    }
    Ok(counts)
}

/// Estimate C = (N_HH − N_HV − N_VH + N_VV) / N from tallied counts.
pub fn correlation_from_counts(counts: &Counts) -> Option<f64> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return None;
    }

    let same = (counts[0] + counts[3]) as f64;
    let diff = (counts[1] + counts[2]) as f64;
    Some((same - diff) / total as f64)
}

/// Relative frequencies; zeros for an empty tally.
pub fn frequencies(counts: &Counts) -> [f64; 4] {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return [0.0; 4];
    }
    counts.map(|c| c as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shots_do_not_draw() {
        let mut rng = ShotRng::new(b"zero");
        let counts = sample_counts(0, [0.25; 4], &mut rng).unwrap();
        assert_eq!(counts, [0, 0, 0, 0]);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn tiny_negative_is_clamped() {
        let p = sanitize_probabilities([0.5 + 1e-12, -1e-12, 0.0, 0.5]).unwrap();
        assert_eq!(p[1], 0.0);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn large_drift_is_rejected() {
        assert!(sanitize_probabilities([0.5, 0.5, 0.5, 0.0]).is_err());
        assert!(sanitize_probabilities([1.1, -0.1, 0.0, 0.0]).is_err());
        assert!(sanitize_probabilities([f64::NAN, 0.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn certain_outcome_always_drawn() {
        let mut rng = ShotRng::new(b"certain");
        let counts = sample_counts(500, [0.0, 0.0, 1.0, 0.0], &mut rng).unwrap();
        assert_eq!(counts, [0, 0, 500, 0]);
    }

    #[test]
    fn codes_are_one_based() {
        let codes: Vec<u8> = Outcome::ALL.iter().map(|o| o.code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn correlation_from_counts_matches_parity() {
        assert_eq!(correlation_from_counts(&[0, 0, 0, 0]), None);
        assert_eq!(correlation_from_counts(&[5, 0, 0, 5]), Some(1.0));
        assert_eq!(correlation_from_counts(&[0, 3, 1, 0]), Some(-1.0));
        assert_eq!(correlation_from_counts(&[1, 1, 1, 1]), Some(0.0));
    }
}
