//! Two-photon polarization algebra: the Bell-state catalogue, depolarized
//! density operators, waveplate-rotated coincidence statistics and the
//! categorical sampler that turns them into detector counts.

pub mod density;
pub mod error;
pub mod gates;
pub mod measurement;
pub mod observables;
pub mod states;

pub use density::DensityMatrix;
pub use error::{QuantumError, Result};
pub use measurement::{Counts, Outcome};
pub use observables::CorrelationForm;
pub use states::{BellState, StateVector};
