//! 2x2 unitaries for the single-qubit and controlled gates of the catalog.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::gate::GateKind;

const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// `e^{iφπ}`.
#[inline]
fn phase(phi: f64) -> Complex64 {
    Complex64::from_polar(1.0, phi * PI)
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// The identity.
    pub fn identity() -> Self {
        Self::diag(c(1.0, 0.0), c(1.0, 0.0))
    }

    fn diag(a: Complex64, d: Complex64) -> Self {
        Self::new(a, c(0.0, 0.0), c(0.0, 0.0), d)
    }

    /// Matrix of a single-qubit gate kind, or of the target action of a
    /// controlled kind. Phases are multiples of π; missing ones count as 0.
    ///
    /// Returns `None` for SWAP, composites and measurements.
    pub fn for_gate(kind: GateKind, phases: &[f64]) -> Option<Self> {
        let kind = kind.controlled_base().unwrap_or(kind);
        let p = |i: usize| phases.get(i).copied().unwrap_or(0.0);
        let u = match kind {
            GateKind::I => Self::identity(),
            GateKind::X => Self::new(c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)),
            GateKind::Y => Self::new(c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)),
            GateKind::Z => Self::diag(c(1.0, 0.0), c(-1.0, 0.0)),
            GateKind::H => Self::new(
                c(FRAC_1_SQRT_2, 0.0),
                c(FRAC_1_SQRT_2, 0.0),
                c(FRAC_1_SQRT_2, 0.0),
                c(-FRAC_1_SQRT_2, 0.0),
            ),
            GateKind::SX => Self::new(c(0.5, 0.5), c(0.5, -0.5), c(0.5, -0.5), c(0.5, 0.5)),
            GateKind::SXdg => Self::new(c(0.5, -0.5), c(0.5, 0.5), c(0.5, 0.5), c(0.5, -0.5)),
            GateKind::S => Self::diag(c(1.0, 0.0), c(0.0, 1.0)),
            GateKind::Sdg => Self::diag(c(1.0, 0.0), c(0.0, -1.0)),
            GateKind::T => Self::diag(c(1.0, 0.0), phase(0.25)),
            GateKind::Tdg => Self::diag(c(1.0, 0.0), phase(-0.25)),
            GateKind::Rx => {
                let (s, co) = (p(0) * PI / 2.0).sin_cos();
                Self::new(c(co, 0.0), c(0.0, -s), c(0.0, -s), c(co, 0.0))
            }
            GateKind::Ry => {
                let (s, co) = (p(0) * PI / 2.0).sin_cos();
                Self::new(c(co, 0.0), c(-s, 0.0), c(s, 0.0), c(co, 0.0))
            }
            GateKind::Rz => Self::diag(phase(-p(0) / 2.0), phase(p(0) / 2.0)),
            GateKind::P | GateKind::U1 => Self::diag(c(1.0, 0.0), phase(p(0))),
            GateKind::U2 => {
                let (alpha, beta) = (p(0), p(1));
                Self::new(
                    c(FRAC_1_SQRT_2, 0.0),
                    -phase(alpha) * FRAC_1_SQRT_2,
                    phase(beta) * FRAC_1_SQRT_2,
                    phase(alpha + beta) * FRAC_1_SQRT_2,
                )
            }
            GateKind::U3 => {
                let (alpha, beta, gamma) = (p(0), p(1), p(2));
                let (s, co) = (gamma * PI / 2.0).sin_cos();
                Self::new(
                    c(co, 0.0),
                    -phase(alpha) * s,
                    phase(beta) * s,
                    phase(alpha + beta) * co,
                )
            }
            _ => return None,
        };
        Some(u)
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let [a, b, c_, d] = self.data;
        Self::new(a.conj(), c_.conj(), b.conj(), d.conj())
    }

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c_, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c_ * e + d * g, c_ * f + d * h)
    }

    /// Whether `U·U† = I` within tolerance.
    pub fn is_unitary(&self) -> bool {
        self.mul(&self.dagger()).approx_eq(&Self::identity())
    }

    /// Element-wise comparison within tolerance.
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < EPSILON)
    }
}
