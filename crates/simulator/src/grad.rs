/// Parameter-shift difference `0.5·(f(θ + s) − f(θ − s))`.
///
/// For `f(θ) = A·cos(ωθ) + B·sin(ωθ) + c` and `s = π/(2ω)` this is exactly
/// `f'(θ)/ω`.
pub fn parameter_shift<F>(theta: f64, shift: f64, f: &F) -> f64
where
    F: Fn(f64) -> f64,
{
    0.5 * (f(theta + shift) - f(theta - shift))
}

/// Sinusoid `c + a·cos(φ) + b·sin(φ)` in the local phase `φ = ω(x − x0)`,
/// recovered from three samples at `x0` and `x0 ± π/(2ω)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sinusoid {
    pub offset: f64,
    pub cos: f64,
    pub sin: f64,
}

impl Sinusoid {
    pub fn fit<F>(x0: f64, omega: f64, f: &F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let shift = std::f64::consts::FRAC_PI_2 / omega;
        let f0 = f(x0);
        let plus = f(x0 + shift);
        let minus = f(x0 - shift);
        let offset = 0.5 * (plus + minus);
        Self {
            offset,
            cos: f0 - offset,
            sin: parameter_shift(x0, shift, f),
        }
    }

    pub fn amplitude(&self) -> f64 {
        self.cos.hypot(self.sin)
    }

    /// Phase in (−π, π] of the maximum of |f|, and that maximum.
    pub fn abs_argmax(&self) -> (f64, f64) {
        let r = self.amplitude();
        let peak = self.sin.atan2(self.cos);
        if (self.offset + r).abs() >= (self.offset - r).abs() {
            (peak, (self.offset + r).abs())
        } else {
            let trough = if peak > 0.0 {
                peak - std::f64::consts::PI
            } else {
                peak + std::f64::consts::PI
            };
            (trough, (self.offset - r).abs())
        }
    }
}
