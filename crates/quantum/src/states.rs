//! Catalogue of two-particle polarization states.

use std::fmt;
use std::str::FromStr;

use crate::error::QuantumError;
use crate::gates::C64;

pub type Qubit = [C64; 2];
pub type StateVector = [C64; 4];

/// Horizontal polarization.
pub const H: Qubit = [C64::new(1.0, 0.0), C64::new(0.0, 0.0)];
/// Vertical polarization.
pub const V: Qubit = [C64::new(0.0, 0.0), C64::new(1.0, 0.0)];

/// a ⊗ b, index = 2·a + b.
pub fn tensor(a: Qubit, b: Qubit) -> StateVector {
    [a[0] * b[0], a[0] * b[1], a[1] * b[0], a[1] * b[1]]
}

/// <a|b>
pub fn inner(a: &StateVector, b: &StateVector) -> C64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum()
}

pub fn norm(psi: &StateVector) -> f64 {
    psi.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt()
}

/// The four maximally entangled Bell states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BellState {
    PhiPlus,
    PhiMinus,
    PsiPlus,
    PsiMinus,
}

impl BellState {
    pub const ALL: [BellState; 4] = [
        BellState::PhiPlus,
        BellState::PhiMinus,
        BellState::PsiPlus,
        BellState::PsiMinus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BellState::PhiPlus => "phi_plus",
            BellState::PhiMinus => "phi_minus",
            BellState::PsiPlus => "psi_plus",
            BellState::PsiMinus => "psi_minus",
        }
    }

    pub fn vector(self) -> StateVector {
        let (first, second, sign) = match self {
            BellState::PhiPlus => (tensor(H, H), tensor(V, V), 1.0),
            BellState::PhiMinus => (tensor(H, H), tensor(V, V), -1.0),
            BellState::PsiPlus => (tensor(H, V), tensor(V, H), 1.0),
            BellState::PsiMinus => (tensor(H, V), tensor(V, H), -1.0),
        };
        let s = std::f64::consts::FRAC_1_SQRT_2;
        std::array::from_fn(|i| (first[i] + second[i] * sign) * s)
    }
}

impl fmt::Display for BellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BellState {
    type Err = QuantumError;

    /// Accepts `phi_plus`, `phi-plus` and `PhiPlus` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "phiplus" => Ok(BellState::PhiPlus),
            "phiminus" => Ok(BellState::PhiMinus),
            "psiplus" => Ok(BellState::PsiPlus),
            "psiminus" => Ok(BellState::PsiMinus),
            _ => Err(QuantumError::UnknownState(s.to_string())),
        }
    }
}
