//! Bell-test engine: one depolarized two-photon state, its correlation
//! function, the CHSH angles that maximize S, and a sampler emulating the
//! coincidence counter at arbitrary plate angles.
//!
//! Construction runs strictly in order
//! density operator → correlation form → angle search; everything after that
//! is read-only, so a built engine can be shared across threads and sampled
//! concurrently with one [`ShotRng`] per caller.

use std::f64::consts::PI;
use std::fmt;

use quantum::{
    measurement::sample_counts, BellState, CorrelationForm, Counts, DensityMatrix, StateVector,
};
use rng::ShotRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::optimizer::{chsh_value, find_chsh_angles, ChshOptimum, OptimizerOptions};

/// Quantum (Tsirelson) bound on S.
pub const TSIRELSON_BOUND: f64 = 2.0 * std::f64::consts::SQRT_2;
/// Local hidden-variable bound on S.
pub const CLASSICAL_BOUND: f64 = 2.0;

/// Polarization rotation (radians) → physical filter angle (degrees).
///
/// The filter turns by half the polarization rotation, so π rad ↦ 90°.
pub fn radians_to_filter_degrees(theta: f64) -> f64 {
    theta * 90.0 / PI
}

/// Inverse of [`radians_to_filter_degrees`].
pub fn filter_degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 90.0
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Depolarizing parameter p ∈ [0, 1].
    pub noise: f64,
    /// Report construction stages at info level instead of debug.
    pub debug: bool,
    /// Fail construction when the angle search does not converge.
    pub require_convergence: bool,
    pub optimizer: OptimizerOptions,
}

/// Construction milestones, in the order they occur.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    DensityBuilt { trace: f64, purity: f64 },
    CorrelationDerived { coefficients: [[f64; 3]; 3] },
    AnglesOptimized { s: f64, angles: [f64; 4], converged: bool, sweeps: usize },
}

macro_rules! stage {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

#[derive(Clone, Debug)]
pub struct BellEngine {
    state: StateVector,
    noise: f64,
    density: DensityMatrix,
    form: CorrelationForm,
    optimum: ChshOptimum,
    filter_degrees: [f64; 4],
}

/// Build an engine for `state` at depolarizing strength `noise`.
pub fn build_engine(state: &StateVector, noise: f64, debug: bool) -> Result<BellEngine> {
    let config = EngineConfig {
        noise,
        debug,
        ..EngineConfig::default()
    };
    BellEngine::with_config(state, &config)
}

impl BellEngine {
    pub fn new(state: &StateVector, noise: f64) -> Result<Self> {
        build_engine(state, noise, false)
    }

    pub fn for_bell_state(state: BellState, noise: f64) -> Result<Self> {
        Self::new(&state.vector(), noise)
    }

    pub fn with_config(state: &StateVector, config: &EngineConfig) -> Result<Self> {
        Self::with_observer(state, config, &mut |_| {})
    }

    /// Build the engine, reporting each construction stage to `observer`.
    pub fn with_observer(
        state: &StateVector,
        config: &EngineConfig,
        observer: &mut dyn FnMut(&LifecycleEvent),
    ) -> Result<Self> {
        stage!(config.debug, noise = config.noise, "initialising Bell-test engine");

        let density = DensityMatrix::depolarized(state, config.noise)?;
        let event = LifecycleEvent::DensityBuilt {
            trace: density.trace(),
            purity: density.purity(),
        };
        stage!(config.debug, ?event, "density operator built");
        observer(&event);

        let form = CorrelationForm::derive(&density)?;
        let event = LifecycleEvent::CorrelationDerived {
            coefficients: *form.coefficients(),
        };
        stage!(config.debug, ?event, "correlation function derived");
        observer(&event);

        let optimum = find_chsh_angles(|a, b| form.correlation(a, b), &config.optimizer);
        let event = LifecycleEvent::AnglesOptimized {
            s: optimum.s,
            angles: optimum.angles,
            converged: optimum.converged,
            sweeps: optimum.sweeps,
        };
        stage!(config.debug, ?event, "CHSH angles optimized");
        observer(&event);

        if !optimum.converged {
            warn!(
                s = optimum.s,
                sweeps = optimum.sweeps,
                angles = ?optimum.angles,
                "CHSH angle search stopped before converging"
            );
            if config.require_convergence {
                return Err(EngineError::Unconverged {
                    s: optimum.s,
                    angles: optimum.angles,
                });
            }
        }

        let engine = Self {
            state: *state,
            noise: config.noise,
            density,
            form,
            filter_degrees: optimum.angles.map(radians_to_filter_degrees),
            optimum,
        };
        if config.debug {
            info!("\n{}", engine.summary());
        }
        Ok(engine)
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn noise(&self) -> f64 {
        self.noise
    }

    pub fn density(&self) -> &DensityMatrix {
        &self.density
    }

    pub fn form(&self) -> &CorrelationForm {
        &self.form
    }

    /// C(θ_a, θ_b), angles in radians.
    pub fn correlation(&self, theta_a: f64, theta_b: f64) -> f64 {
        self.form.correlation(theta_a, theta_b)
    }

    /// [P(HH), P(HV), P(VH), P(VV)], angles in radians.
    pub fn probabilities(&self, theta_a: f64, theta_b: f64) -> [f64; 4] {
        self.form.probabilities(theta_a, theta_b)
    }

    /// S evaluated at arbitrary (a0, a1, b0, b1) in radians.
    pub fn chsh_value_at(&self, angles: [f64; 4]) -> f64 {
        chsh_value(&|a, b| self.correlation(a, b), angles)
    }

    /// (a0, a1, b0, b1) in radians.
    pub fn chsh_angles(&self) -> [f64; 4] {
        self.optimum.angles
    }

    /// (a0, a1, b0, b1) as physical filter angles in degrees.
    pub fn chsh_angles_filter_degrees(&self) -> [f64; 4] {
        self.filter_degrees
    }

    pub fn chsh_value(&self) -> f64 {
        self.optimum.s
    }

    pub fn converged(&self) -> bool {
        self.optimum.converged
    }

    pub fn optimum(&self) -> &ChshOptimum {
        &self.optimum
    }

    /// Sample `n` pairs at plate angles `theta_a`, `theta_b` (radians) and
    /// return counts in the order [HH, HV, VH, VV].
    pub fn measure(&self, n: u64, theta_a: f64, theta_b: f64, rng: &mut ShotRng) -> Result<Counts> {
        if n == 0 {
            return Ok([0; 4]);
        }
        let probs = self.probabilities(theta_a, theta_b);
        Ok(sample_counts(n, probs, rng)?)
    }

    /// [`measure`](Self::measure) with filter angles in degrees.
    pub fn measure_filter_degrees(
        &self,
        n: u64,
        theta_a_deg: f64,
        theta_b_deg: f64,
        rng: &mut ShotRng,
    ) -> Result<Counts> {
        self.measure(
            n,
            filter_degrees_to_radians(theta_a_deg),
            filter_degrees_to_radians(theta_b_deg),
            rng,
        )
    }

    pub fn summary(&self) -> EngineSummary {
        let t = self.form.coefficients();
        EngineSummary {
            state: self.state.map(|c| [c.re, c.im]),
            noise: self.noise,
            correlation_terms: CorrelationTerms {
                zz: t[1][1],
                zx: t[1][2],
                xz: t[2][1],
                xx: t[2][2],
            },
            chsh_value: self.optimum.s,
            chsh_angles: self.optimum.angles,
            chsh_angles_pi: self.optimum.angles.map(|a| a / PI),
            chsh_angles_filter_degrees: self.filter_degrees,
            converged: self.optimum.converged,
            sweeps: self.optimum.sweeps,
        }
    }
}

/// C(θ_a, θ_b) = zz·cos2θ_a·cos2θ_b + zx·cos2θ_a·sin2θ_b
///             + xz·sin2θ_a·cos2θ_b + xx·sin2θ_a·sin2θ_b
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTerms {
    pub zz: f64,
    pub zx: f64,
    pub xz: f64,
    pub xx: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSummary {
    /// Amplitudes as (re, im).
    pub state: [[f64; 2]; 4],
    pub noise: f64,
    pub correlation_terms: CorrelationTerms,
    pub chsh_value: f64,
    pub chsh_angles: [f64; 4],
    pub chsh_angles_pi: [f64; 4],
    pub chsh_angles_filter_degrees: [f64; 4],
    pub converged: bool,
    pub sweeps: usize,
}

impl fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.correlation_terms;
        writeln!(f, "initial state (re, im): {:?}", self.state)?;
        writeln!(f, "depolarizing noise p = {:.4}", self.noise)?;
        writeln!(
            f,
            "C(a, b) = {:+.4} cos2a cos2b {:+.4} cos2a sin2b {:+.4} sin2a cos2b {:+.4} sin2a sin2b",
            t.zz, t.zx, t.xz, t.xx
        )?;
        let [a0, a1, b0, b1] = self.chsh_angles_pi;
        writeln!(f, "CHSH angles (multiples of pi):")?;
        writeln!(f, "  a0: {a0:.4}, a1: {a1:.4}")?;
        writeln!(f, "  b0: {b0:.4}, b1: {b1:.4}")?;
        let [fa0, fa1, fb0, fb1] = self.chsh_angles_filter_degrees;
        writeln!(
            f,
            "filter angles (deg): a0 {fa0:.2}, a1 {fa1:.2}, b0 {fb0:.2}, b1 {fb1:.2}"
        )?;
        write!(
            f,
            "S = {:.4} ({:.0}% of S_bell){}",
            self.chsh_value,
            100.0 * self.chsh_value / TSIRELSON_BOUND,
            if self.converged { "" } else { " [unconverged]" }
        )
    }
}
