use quantum::QuantumError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// State preparation, derivation or sampling failed.
    #[error(transparent)]
    Quantum(#[from] QuantumError),

    /// Optimizer stopped before meeting its tolerance and the caller asked
    /// for a converged result.
    #[error("CHSH optimizer did not converge: best S = {s:.6} at angles {angles:?} (rad)")]
    Unconverged { s: f64, angles: [f64; 4] },

    /// No coincidences were recorded at one of the four CHSH settings.
    #[error("no coincidences recorded at CHSH setting {setting}")]
    EmptyCounts { setting: usize },

    /// A mount or counter reported a failure.
    #[error("device: {0}")]
    Device(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }
}
