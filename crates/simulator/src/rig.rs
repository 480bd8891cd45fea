//! The seam between the simulator and the physical rig.
//!
//! A [`Mount`] turns the two filters; a [`CoincidenceCounter`] counts photon
//! pairs at given plate angles. The simulator implements the counter side
//! with [`SimulatedCounter`], so a CHSH round can run against either the
//! hardware or the engine without the caller knowing which.

use quantum::{measurement::correlation_from_counts, Counts};
use rng::ShotRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{radians_to_filter_degrees, BellEngine, CLASSICAL_BOUND};
use crate::error::{EngineError, Result};

/// Rotation mount holding Alice's and Bob's filters.
pub trait Mount {
    /// Drive both filters to the given angles (degrees) and block until
    /// they have settled.
    fn rotate(&mut self, alice_deg: f64, bob_deg: f64) -> Result<()>;
}

/// Anything that can report coincidence counts [HH, HV, VH, VV] for `n`
/// pairs at plate angles given in radians.
pub trait CoincidenceCounter {
    fn measure_n(&mut self, n: u64, theta_a: f64, theta_b: f64) -> Result<Counts>;
}

/// Engine-backed stand-in for the time tagger.
pub struct SimulatedCounter<'a> {
    engine: &'a BellEngine,
    rng: ShotRng,
}

impl<'a> SimulatedCounter<'a> {
    pub fn new(engine: &'a BellEngine, rng: ShotRng) -> Self {
        Self { engine, rng }
    }
}

impl CoincidenceCounter for SimulatedCounter<'_> {
    fn measure_n(&mut self, n: u64, theta_a: f64, theta_b: f64) -> Result<Counts> {
        self.engine.measure(n, theta_a, theta_b, &mut self.rng)
    }
}

/// Mount without hardware: settles instantly and remembers where it went.
#[derive(Clone, Debug, Default)]
pub struct RecordingMount {
    positions: Vec<(f64, f64)>,
}

impl RecordingMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every (alice, bob) position driven to, oldest first.
    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    pub fn current(&self) -> Option<(f64, f64)> {
        self.positions.last().copied()
    }
}

impl Mount for RecordingMount {
    fn rotate(&mut self, alice_deg: f64, bob_deg: f64) -> Result<()> {
        if !alice_deg.is_finite() || !bob_deg.is_finite() {
            return Err(EngineError::device(format!(
                "cannot rotate to ({alice_deg}, {bob_deg})"
            )));
        }
        self.positions.push((alice_deg, bob_deg));
        Ok(())
    }
}

/// The four (θ_a, θ_b) pairs of a CHSH round, in the order
/// (a0,b0), (a1,b0), (a0,b1), (a1,b1).
pub fn chsh_settings(angles: [f64; 4]) -> [(f64, f64); 4] {
    let [a0, a1, b0, b1] = angles;
    [(a0, b0), (a1, b0), (a0, b1), (a1, b1)]
}

/// Sign of each setting's correlation in S.
const CHSH_SIGNS: [f64; 4] = [1.0, 1.0, 1.0, -1.0];

/// S estimated from measured counts rather than from the correlation form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChshEstimate {
    /// Plate angles (radians) per setting.
    pub settings: [(f64, f64); 4],
    pub counts: [Counts; 4],
    pub correlations: [f64; 4],
    pub s: f64,
}

impl ChshEstimate {
    pub fn from_counts(settings: [(f64, f64); 4], counts: [Counts; 4]) -> Result<Self> {
        let mut correlations = [0.0; 4];
        for (k, c) in counts.iter().enumerate() {
            correlations[k] =
                correlation_from_counts(c).ok_or(EngineError::EmptyCounts { setting: k })?;
        }
        let s = correlations
            .iter()
            .zip(CHSH_SIGNS.iter())
            .map(|(c, sign)| c * sign)
            .sum::<f64>()
            .abs();
        Ok(Self {
            settings,
            counts,
            correlations,
            s,
        })
    }

    pub fn total_pairs(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn violates_classical_bound(&self) -> bool {
        self.s > CLASSICAL_BOUND
    }
}

/// Visit all four CHSH settings: turn the filters, count `n` pairs at each.
pub fn run_chsh_round<M, C>(
    mount: &mut M,
    counter: &mut C,
    angles: [f64; 4],
    n: u64,
) -> Result<ChshEstimate>
where
    M: Mount + ?Sized,
    C: CoincidenceCounter + ?Sized,
{
    let settings = chsh_settings(angles);
    let mut counts = [[0u64; 4]; 4];
    for (k, &(theta_a, theta_b)) in settings.iter().enumerate() {
        mount.rotate(
            radians_to_filter_degrees(theta_a),
            radians_to_filter_degrees(theta_b),
        )?;
        counts[k] = counter.measure_n(n, theta_a, theta_b)?;
        debug!(setting = k, counts = ?counts[k], "CHSH setting counted");
    }
    ChshEstimate::from_counts(settings, counts)
}
