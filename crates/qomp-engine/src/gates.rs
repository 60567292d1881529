//! Fixed 2×2 matrices the engines need internally, row-major.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Pauli X.
pub fn pauli_x() -> [Complex64; 4] {
    [ZERO, ONE, ONE, ZERO]
}

/// Hadamard.
pub fn hadamard() -> [Complex64; 4] {
    let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [s, s, s, -s]
}

/// Basis-change matrix `V` of the measurement axis (`angle`, `phase`), both
/// in units of π.
///
/// The columns are the "up" state `(cos θ, e^{iφ} sin θ)` and the "down"
/// state `(sin θ, −e^{iφ} cos θ)` with `θ = angle·π/2`. The Z axis (0, 0)
/// gives Pauli Z, which leaves Z-basis outcomes unchanged.
pub fn basis_matrix(angle: f64, phase: f64) -> [Complex64; 4] {
    let (s, c) = (angle * PI / 2.0).sin_cos();
    let e = Complex64::from_polar(1.0, phase * PI);
    [
        Complex64::new(c, 0.0),
        Complex64::new(s, 0.0),
        e * s,
        -e * c,
    ]
}
