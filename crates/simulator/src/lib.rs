//! Bell-test simulator: builds a noisy entangled photon pair, finds the
//! CHSH-optimal waveplate angles and samples coincidence counts the way the
//! installation's time tagger would report them.

pub mod engine;
pub mod error;
pub mod grad;
pub mod optimizer;
pub mod output;
pub mod rig;
pub mod session;
pub mod sweep;

pub use engine::{
    build_engine, filter_degrees_to_radians, radians_to_filter_degrees, BellEngine, EngineConfig,
    EngineSummary, LifecycleEvent, CLASSICAL_BOUND, TSIRELSON_BOUND,
};
pub use error::{EngineError, Result};
pub use optimizer::{find_chsh_angles, ChshOptimum, OptimizerOptions};
pub use rig::{run_chsh_round, ChshEstimate, CoincidenceCounter, Mount, RecordingMount, SimulatedCounter};
pub use session::{BellSession, Trial};
pub use sweep::{estimate_chsh_shots, noise_grid, noise_sweep, SweepPoint};
