//! Density operators for the measured photon pair.

use crate::error::{QuantumError, Result};
use crate::gates::{adjoint, identity4, matmul, outer, trace, Mat4, C64};
use crate::states::{norm, StateVector};

/// Tolerance on |psi| when accepting a caller-supplied state.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// 4×4 density operator ρ with Tr(ρ) = 1.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    m: Mat4,
}

impl DensityMatrix {
    /// |ψ⟩⟨ψ|
    pub fn pure(psi: &StateVector) -> Result<Self> {
        let n = norm(psi);
        if !n.is_finite() || (n - 1.0).abs() > NORM_TOLERANCE {
            return Err(QuantumError::NotNormalized { norm: n });
        }
        Ok(Self {
            m: outer(psi, psi),
        }
        .renormalized())
    }

    /// ρ = (1 − p)·|ψ⟩⟨ψ| + p·I, rescaled to unit trace.
    ///
    /// At p = 1 this is the maximally mixed state I/4.
    pub fn depolarized(psi: &StateVector, noise: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(QuantumError::InvalidNoise(noise));
        }
        let pure = Self::pure(psi)?;
        let id = identity4();

        let m: Mat4 = std::array::from_fn(|i| {
            std::array::from_fn(|j| pure.m[i][j] * (1.0 - noise) + id[i][j] * noise)
        });
        Ok(Self { m }.renormalized())
    }

    fn renormalized(mut self) -> Self {
        let t = trace(&self.m).re;
        for row in self.m.iter_mut() {
            for x in row.iter_mut() {
                *x /= t;
            }
        }
        self
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.m
    }

    pub fn trace(&self) -> f64 {
        trace(&self.m).re
    }

    /// Tr(ρ·op)
    pub fn expectation(&self, op: &Mat4) -> C64 {
        trace(&matmul(&self.m, op))
    }

    /// U ρ U†
    pub fn conjugate_by(&self, u: &Mat4) -> DensityMatrix {
        DensityMatrix {
            m: matmul(&matmul(u, &self.m), &adjoint(u)),
        }
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        (0..4).all(|i| (0..4).all(|j| (self.m[i][j] - self.m[j][i].conj()).norm() <= tol))
    }

    /// Tr(ρ²); 1 for pure states, 1/4 for I/4.
    pub fn purity(&self) -> f64 {
        trace(&matmul(&self.m, &self.m)).re
    }
}
