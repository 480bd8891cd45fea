//! Error types for state preparation, derivation and sampling.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuantumError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    /// State vector does not have unit norm.
    #[error("state vector is not normalized: |psi| = {norm}")]
    NotNormalized { norm: f64 },

    /// Depolarizing parameter outside [0, 1] or not finite.
    #[error("noise parameter must lie in [0, 1], got {0}")]
    InvalidNoise(f64),

    #[error("unknown two-particle state '{0}'")]
    UnknownState(String),

    /// The closed-form correlation form could not be built or disagrees with
    /// direct operator evaluation.
    #[error("correlation derivation failed: {0}")]
    Derivation(String),

    /// Outcome probabilities drifted too far from a normalized distribution.
    #[error("degenerate outcome distribution {probabilities:?} (sum = {sum})")]
    DegenerateDistribution { probabilities: [f64; 4], sum: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_offending_values() {
        assert!(QuantumError::InvalidNoise(1.5).to_string().contains("1.5"));
        assert!(QuantumError::UnknownState("bogus".into())
            .to_string()
            .contains("bogus"));
        let err = QuantumError::NotNormalized { norm: 0.5 };
        assert!(err.to_string().contains("0.5"));
    }
}
