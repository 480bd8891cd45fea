//! Search for the measurement angles that maximize the CHSH value
//!
//! ```text
//! S(a0, a1, b0, b1) = |C(a0,b0) + C(a1,b0) + C(a0,b1) − C(a1,b1)|
//! ```
//!
//! Internally the angles are multiples of π, bounded to [−1, 1], and `a0` is
//! pinned to 0: S is invariant under rotating all four angles together, so
//! the pin removes a flat direction from the search.
//!
//! For any correlation function of the waveplate form, S depends on each
//! single angle as `c + A·cos 2θ + B·sin 2θ`. The search therefore runs
//! coordinate sweeps in which every free angle jumps to the exact maximizer
//! of |S| along its own axis (three evaluations per axis, see
//! [`Sinusoid::fit`]), wrapped back into the box. Sweeps repeat until S
//! stops improving. This is a local method: which of the symmetric optima it
//! lands on depends on the initial guess, so the guess is a fixed constant.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::grad::{parameter_shift, Sinusoid};

/// Default starting point (a0, a1, b0, b1) in multiples of π.
pub const DEFAULT_INITIAL_GUESS: [f64; 4] = [0.0, 0.25, -0.125, 0.375];

/// Angular frequency of S along one angle, in units where the angle is a
/// multiple of π (period 1).
const OMEGA: f64 = 2.0 * PI;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerOptions {
    /// (a0, a1, b0, b1) in multiples of π. `a0` is always pinned to 0.
    pub initial_guess: [f64; 4],
    pub max_sweeps: usize,
    /// Stop once a full sweep improves S by less than this.
    pub ftol: f64,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_sweeps: 200,
            ftol: 1e-12,
        }
    }
}

/// Result of [`find_chsh_angles`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChshOptimum {
    /// Best S found.
    pub s: f64,
    /// (a0, a1, b0, b1) in radians.
    pub angles: [f64; 4],
    pub converged: bool,
    pub sweeps: usize,
    /// Euclidean norm of ∂S/∂(a1, b0, b1) at the result.
    pub gradient_norm: f64,
}

/// Signed CHSH combination for angles given in radians.
pub fn chsh_sum<F>(c: &F, angles: [f64; 4]) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let [a0, a1, b0, b1] = angles;
    c(a0, b0) + c(a1, b0) + c(a0, b1) - c(a1, b1)
}

/// S for angles given in radians.
pub fn chsh_value<F>(c: &F, angles: [f64; 4]) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    chsh_sum(c, angles).abs()
}

fn to_radians(x: &[f64; 4]) -> [f64; 4] {
    x.map(|v| v * PI)
}

fn wrap_into_box(x: f64) -> f64 {
    if x > 1.0 {
        x - 1.0
    } else if x < -1.0 {
        x + 1.0
    } else {
        x
    }
}

/// Maximize S over (a1, b0, b1) with `a0 = 0`. `c` takes radians.
pub fn find_chsh_angles<F>(c: F, opts: &OptimizerOptions) -> ChshOptimum
where
    F: Fn(f64, f64) -> f64,
{
    let mut x = opts.initial_guess.map(|v| v.clamp(-1.0, 1.0));
    x[0] = 0.0;

    let mut s = chsh_value(&c, to_radians(&x));
    let mut converged = false;
    let mut sweeps = 0;

    while sweeps < opts.max_sweeps {
        sweeps += 1;
        for k in 1..4 {
            let along = |v: f64| {
                let mut y = x;
                y[k] = v;
                chsh_sum(&c, to_radians(&y))
            };
            let fit = Sinusoid::fit(x[k], OMEGA, &along);
            if fit.amplitude() < f64::EPSILON {
                continue;
            }
            let (phase, best) = fit.abs_argmax();
            let current = along(x[k]).abs();
            if best > current {
                x[k] = wrap_into_box(x[k] + phase / OMEGA);
            }
        }

        let next = chsh_value(&c, to_radians(&x));
        let improvement = next - s;
        s = next.max(s);
        if improvement.abs() < opts.ftol {
            converged = true;
            break;
        }
    }

    let angles = to_radians(&x);
    ChshOptimum {
        s: chsh_value(&c, angles),
        angles,
        converged,
        sweeps,
        gradient_norm: gradient_norm(&c, angles),
    }
}

/// |∇S| over the free angles (radians), by the parameter-shift rule.
pub fn gradient_norm<F>(c: &F, angles: [f64; 4]) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let sign = chsh_sum(c, angles).signum();
    let mut sq = 0.0;
    for k in 1..4 {
        let along = |v: f64| {
            let mut y = angles;
            y[k] = v;
            chsh_sum(c, y)
        };
        // frequency 2 in radians: dS/dθ = 2·shift-difference at π/4
        let g = 2.0 * sign * parameter_shift(angles[k], PI / 4.0, &along);
        sq += g * g;
    }
    sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_correlation_reaches_tsirelson_bound() {
        let c = |a: f64, b: f64| (2.0 * (a - b)).cos();
        let opt = find_chsh_angles(c, &OptimizerOptions::default());
        assert!(opt.converged);
        assert!((opt.s - 2.0 * 2f64.sqrt()).abs() < 1e-9, "S = {}", opt.s);
        assert_eq!(opt.angles[0], 0.0);
        assert!(opt.gradient_norm < 1e-4, "|grad| = {}", opt.gradient_norm);
    }

    #[test]
    fn angles_stay_in_box() {
        let c = |a: f64, b: f64| -(2.0 * (a + b)).cos();
        let opt = find_chsh_angles(c, &OptimizerOptions::default());
        for a in opt.angles {
            assert!((-PI..=PI).contains(&a), "angle {}", a);
        }
    }

    #[test]
    fn flat_correlation_converges_at_zero() {
        let opt = find_chsh_angles(|_, _| 0.0, &OptimizerOptions::default());
        assert!(opt.converged);
        assert_eq!(opt.s, 0.0);
        assert_eq!(opt.sweeps, 1);
    }

    #[test]
    fn sweep_limit_reports_unconverged() {
        let c = |a: f64, b: f64| (2.0 * (a - b)).cos();
        let opts = OptimizerOptions {
            max_sweeps: 0,
            ..OptimizerOptions::default()
        };
        let opt = find_chsh_angles(c, &opts);
        assert!(!opt.converged);
        assert_eq!(opt.sweeps, 0);
    }

    #[test]
    fn classical_product_correlation_stays_classical() {
        // H⊗H product state: C = cos 2a · cos 2b
        let c = |a: f64, b: f64| (2.0 * a).cos() * (2.0 * b).cos();
        let opt = find_chsh_angles(c, &OptimizerOptions::default());
        assert!(opt.s <= 2.0 + 1e-9, "S = {}", opt.s);
    }
}
