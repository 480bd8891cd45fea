use quantum::{Counts, StateVector};
use rayon::prelude::*;
use rng::ShotRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{BellEngine, EngineConfig};
use crate::error::Result;
use crate::rig::{chsh_settings, ChshEstimate};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub noise: f64,
    pub s_max: f64,
    /// S estimated from sampled counts; `None` when no shots were requested.
    pub s_estimated: Option<f64>,
    pub converged: bool,
}

/// `steps + 1` evenly spaced noise levels from `start` to `stop` inclusive.
///
/// The endpoints are returned exactly and interior points never leave
/// [start, stop], so a grid ending at 1.0 stays a valid noise range.
pub fn noise_grid(start: f64, stop: f64, steps: usize) -> Vec<f64> {
    if steps == 0 {
        return vec![start];
    }
    let (lo, hi) = if start <= stop { (start, stop) } else { (stop, start) };
    (0..=steps)
        .map(|i| match i {
            0 => start,
            i if i == steps => stop,
            i => (start + (stop - start) * i as f64 / steps as f64).max(lo).min(hi),
        })
        .collect()
}

/// Sample the four CHSH settings of `engine` in parallel, `n` pairs each.
///
/// Each setting draws from its own stream forked off `rng`, so the result is
/// independent of thread scheduling.
pub fn estimate_chsh_shots(engine: &BellEngine, n: u64, rng: &ShotRng) -> Result<ChshEstimate> {
    let settings = chsh_settings(engine.chsh_angles());
    let counts: Vec<Counts> = settings
        .par_iter()
        .enumerate()
        .map(|(k, &(theta_a, theta_b))| {
            let mut stream = rng.fork(format!("setting-{}", k).as_bytes());
            engine.measure(n, theta_a, theta_b, &mut stream)
        })
        .collect::<Result<Vec<_>>>()?;

    ChshEstimate::from_counts(settings, [counts[0], counts[1], counts[2], counts[3]])
}

/// Build one engine per noise level in parallel; optionally estimate S from
/// `shots` sampled pairs per setting.
pub fn noise_sweep(
    state: &StateVector,
    noises: &[f64],
    config: &EngineConfig,
    shots: u64,
    seed: &str,
) -> Result<Vec<SweepPoint>> {
    let points = noises
        .par_iter()
        .enumerate()
        .map(|(i, &noise)| -> Result<SweepPoint> {
            let cfg = EngineConfig {
                noise,
                ..config.clone()
            };
            let engine = BellEngine::with_config(state, &cfg)?;
            let s_estimated = if shots > 0 {
                let rng = ShotRng::new(format!("{}-noise-{}", seed, i).as_bytes());
                Some(estimate_chsh_shots(&engine, shots, &rng)?.s)
            } else {
                None
            };
            Ok(SweepPoint {
                noise,
                s_max: engine.chsh_value(),
                s_estimated,
                converged: engine.converged(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(points = points.len(), shots, "noise sweep finished");
    Ok(points)
}
