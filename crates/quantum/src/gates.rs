//! Single- and two-photon operators in the {H, V} polarization basis.

use num_complex::Complex64;

pub type C64 = Complex64;
pub type Mat2 = [[C64; 2]; 2];
pub type Mat4 = [[C64; 4]; 4];

const ZERO: C64 = C64::new(0.0, 0.0);
const ONE: C64 = C64::new(1.0, 0.0);

/// Half-wave plate at rotation `theta` (radians of the polarization, i.e.
/// twice the physical filter angle):
///
/// ```text
/// [ cos θ   sin θ ]
/// [ sin θ  -cos θ ]
/// ```
pub fn half_wave_plate(theta: f64) -> Mat2 {
    let c = theta.cos();
    let s = theta.sin();
    [
        [C64::new(c, 0.0), C64::new(s, 0.0)],
        [C64::new(s, 0.0), C64::new(-c, 0.0)],
    ]
}

pub fn identity() -> Mat2 {
    [[ONE, ZERO], [ZERO, ONE]]
}

pub fn pauli_x() -> Mat2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

pub fn pauli_z() -> Mat2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

/// |H><H|
pub fn projector_h() -> Mat2 {
    [[ONE, ZERO], [ZERO, ZERO]]
}

/// |V><V|
pub fn projector_v() -> Mat2 {
    [[ZERO, ZERO], [ZERO, ONE]]
}

/// Alice ⊗ Bob, row index = 2·alice + bob.
pub fn kron(a: Mat2, b: Mat2) -> Mat4 {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                for l in 0..2 {
                    out[i * 2 + k][j * 2 + l] = a[i][j] * b[k][l];
                }
            }
        }
    }
    out
}

/// Coincidence projectors in the fixed order [HH, HV, VH, VV].
pub fn coincidence_projectors() -> [Mat4; 4] {
    let h = projector_h();
    let v = projector_v();
    [kron(h, h), kron(h, v), kron(v, h), kron(v, v)]
}

/// Both waveplates at once: W(θ_a) ⊗ W(θ_b).
pub fn waveplate_pair(theta_a: f64, theta_b: f64) -> Mat4 {
    kron(half_wave_plate(theta_a), half_wave_plate(theta_b))
}

pub fn identity4() -> Mat4 {
    let mut out = [[ZERO; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        row[i] = ONE;
    }
    out
}

pub fn matmul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for k in 0..4 {
            let aik = a[i][k];
            for j in 0..4 {
                out[i][j] += aik * b[k][j];
            }
        }
    }
    out
}

pub fn adjoint(a: &Mat4) -> Mat4 {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            out[j][i] = a[i][j].conj();
        }
    }
    out
}

pub fn trace(a: &Mat4) -> C64 {
    (0..4).map(|i| a[i][i]).sum()
}

/// |a><b|
pub fn outer(a: &[C64; 4], b: &[C64; 4]) -> Mat4 {
    let mut out = [[ZERO; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            out[i][j] = a[i] * b[j].conj();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Mat4, b: &Mat4, tol: f64) -> bool {
        (0..4).all(|i| (0..4).all(|j| (a[i][j] - b[i][j]).norm() < tol))
    }

    #[test]
    fn waveplate_is_an_involution() {
        for k in 0..16 {
            let theta = k as f64 * 0.41 - 3.0;
            let w = waveplate_pair(theta, -0.5 * theta);
            assert!(close(&matmul(&w, &w), &identity4(), 1e-12));
        }
    }

    #[test]
    fn projectors_partition_identity() {
        let ps = coincidence_projectors();
        let mut sum = [[ZERO; 4]; 4];
        for p in &ps {
            for i in 0..4 {
                for j in 0..4 {
                    sum[i][j] += p[i][j];
                }
            }
        }
        assert!(close(&sum, &identity4(), 1e-15));

        for (a, pa) in ps.iter().enumerate() {
            for (b, pb) in ps.iter().enumerate() {
                let prod = matmul(pa, pb);
                if a == b {
                    assert!(close(&prod, pa, 1e-15));
                } else {
                    assert!(close(&prod, &[[ZERO; 4]; 4], 1e-15));
                }
            }
        }
    }
}
