//! Correlation function and coincidence probabilities behind a pair of
//! half-wave plates.
//!
//! The plates are real and symmetric, so W(θ)² = I and
//! W(θ)·Z·W(θ) = cos 2θ·Z + sin 2θ·X. Every coincidence observable is then a
//! bilinear form in n(θ_a) = (1, cos 2θ_a, sin 2θ_a) and n(θ_b), with the 3×3
//! coefficient tensor T_ij = Tr(ρ·σ_i⊗σ_j), σ ∈ {I, Z, X}. [`CorrelationForm`]
//! holds that tensor; the correlation function and the outcome probabilities
//! are both read off it.

use crate::density::DensityMatrix;
use crate::error::{QuantumError, Result};
use crate::gates::{coincidence_projectors, identity, kron, pauli_x, pauli_z, waveplate_pair, Mat2};

/// Agreement required between the closed form and direct operator evaluation.
pub const DERIVATION_TOLERANCE: f64 = 1e-9;

/// Angles (radians) at which a freshly derived form is checked.
const REFERENCE_ANGLES: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.0, std::f64::consts::FRAC_PI_8),
    (std::f64::consts::FRAC_PI_4, -std::f64::consts::FRAC_PI_8),
    (0.3, -1.1),
    (2.0, 0.7),
    (-2.5, 1.9),
];

fn basis_ops() -> [Mat2; 3] {
    [identity(), pauli_z(), pauli_x()]
}

#[inline]
fn rotation_vector(theta: f64) -> [f64; 3] {
    let (s, c) = (2.0 * theta).sin_cos();
    [1.0, c, s]
}

/// Closed-form coincidence statistics of a fixed two-photon state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationForm {
    t: [[f64; 3]; 3],
}

impl CorrelationForm {
    /// Derive the form from `rho` and verify it against [`direct_correlation`]
    /// and [`direct_probabilities`].
    pub fn derive(rho: &DensityMatrix) -> Result<Self> {
        let ops = basis_ops();
        let mut t = [[0.0; 3]; 3];
        for (i, a) in ops.iter().enumerate() {
            for (j, b) in ops.iter().enumerate() {
                t[i][j] = rho.expectation(&kron(*a, *b)).re;
            }
        }

        if t.iter().flatten().any(|x| !x.is_finite()) {
            return Err(QuantumError::Derivation(format!(
                "non-finite coefficient tensor {:?}",
                t
            )));
        }

        let form = Self { t };
        for &(a, b) in REFERENCE_ANGLES.iter() {
            let closed = form.correlation(a, b);
            let direct = direct_correlation(rho, a, b);
            if (closed - direct).abs() > DERIVATION_TOLERANCE {
                return Err(QuantumError::Derivation(format!(
                    "C({a}, {b}): closed form {closed} vs direct {direct}"
                )));
            }

            let pc = form.probabilities(a, b);
            let pd = direct_probabilities(rho, a, b);
            if pc.iter().zip(pd.iter()).any(|(x, y)| (x - y).abs() > DERIVATION_TOLERANCE) {
                return Err(QuantumError::Derivation(format!(
                    "P({a}, {b}): closed form {pc:?} vs direct {pd:?}"
                )));
            }
        }

        Ok(form)
    }

    /// Coefficients T_ij, rows Alice (I, Z, X), columns Bob (I, Z, X).
    pub fn coefficients(&self) -> &[[f64; 3]; 3] {
        &self.t
    }

    /// C(θ_a, θ_b) = P(HH) − P(HV) − P(VH) + P(VV).
    pub fn correlation(&self, theta_a: f64, theta_b: f64) -> f64 {
        let na = rotation_vector(theta_a);
        let nb = rotation_vector(theta_b);
        let mut c = 0.0;
        for i in 1..3 {
            for j in 1..3 {
                c += na[i] * self.t[i][j] * nb[j];
            }
        }
        c
    }

    /// [P(HH), P(HV), P(VH), P(VV)] at the given plate angles.
    pub fn probabilities(&self, theta_a: f64, theta_b: f64) -> [f64; 4] {
        let na = rotation_vector(theta_a);
        let nb = rotation_vector(theta_b);

        // single-side and joint terms of the form
        let mut alice = 0.0;
        let mut bob = 0.0;
        let mut joint = 0.0;
        for i in 1..3 {
            alice += na[i] * self.t[i][0];
            bob += self.t[0][i] * nb[i];
            for j in 1..3 {
                joint += na[i] * self.t[i][j] * nb[j];
            }
        }
        let norm = self.t[0][0];

        let mut p = [0.0; 4];
        for (k, (sa, sb)) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)]
            .into_iter()
            .enumerate()
        {
            p[k] = 0.25 * (norm + sa * alice + sb * bob + sa * sb * joint);
        }
        p
    }
}

/// Tr(ρ'·(HH − HV − VH + VV)) with ρ' = U ρ U†, evaluated by brute force.
pub fn direct_correlation(rho: &DensityMatrix, theta_a: f64, theta_b: f64) -> f64 {
    let p = direct_probabilities(rho, theta_a, theta_b);
    p[0] - p[1] - p[2] + p[3]
}

/// [Tr(ρ'·HH), Tr(ρ'·HV), Tr(ρ'·VH), Tr(ρ'·VV)] evaluated by brute force.
pub fn direct_probabilities(rho: &DensityMatrix, theta_a: f64, theta_b: f64) -> [f64; 4] {
    let rotated = rho.conjugate_by(&waveplate_pair(theta_a, theta_b));
    let projectors = coincidence_projectors();
    let mut p = [0.0; 4];
    for (k, proj) in projectors.iter().enumerate() {
        p[k] = rotated.expectation(proj).re;
    }
    p
}
