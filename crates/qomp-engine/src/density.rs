//! Density-matrix engine.
//!
//! Local operators are applied by gathering, for each assignment of the
//! untouched qubits, the `2^k` entries addressed by the target qubits,
//! multiplying, and scattering back. No full `2^n × 2^n` operator is ever
//! built.

use ndarray::{Array2, ArrayView1};
use num_complex::Complex64;

use crate::bits::{self, MAX_QUBITS};
use crate::error::{EngineError, EngineResult};

/// Side of the density matrix a local operator multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `M·ρ`.
    Left,
    /// `ρ·M`.
    Right,
    /// `M·ρ·M†`.
    Both,
}

/// Density matrix of `n` qubits, `2^n × 2^n`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    matrix: Array2<Complex64>,
    num_qubits: usize,
}

impl DensityMatrix {
    /// `|0...0⟩⟨0...0|`.
    pub fn new(num_qubits: usize) -> EngineResult<Self> {
        if num_qubits == 0 {
            return Err(EngineError::Initialization(
                "a density matrix needs at least one qubit".into(),
            ));
        }
        if num_qubits > MAX_QUBITS / 2 {
            return Err(EngineError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS / 2,
            });
        }
        let dim = 1 << num_qubits;
        let mut matrix = Array2::zeros((dim, dim));
        matrix[[0, 0]] = Complex64::new(1.0, 0.0);
        Ok(Self { matrix, num_qubits })
    }

    /// Wrap a square `2^n × 2^n` matrix.
    pub fn from_matrix(matrix: Array2<Complex64>) -> EngineResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(EngineError::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        let num_qubits = bits::qubits_for_dim(rows).ok_or_else(|| {
            EngineError::Initialization(format!("dimension {rows} is not a power of two"))
        })?;
        Ok(Self { matrix, num_qubits })
    }

    pub(crate) fn from_parts(matrix: Array2<Complex64>, num_qubits: usize) -> Self {
        Self { matrix, num_qubits }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Row (and column) count.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    // =========================================================================
    // Local operators
    // =========================================================================

    /// Apply `matrix` on the qubits `ids` from the given side. Empty `ids`
    /// means the whole register.
    pub fn apply_matrix(
        &mut self,
        matrix: &Array2<Complex64>,
        ids: &[usize],
        direction: Direction,
    ) -> EngineResult<()> {
        let all: Vec<usize>;
        let ids = if ids.is_empty() {
            all = (0..self.num_qubits).collect();
            &all
        } else {
            ids
        };
        self.check_operator(matrix, ids)?;

        let masks = bits::masks(ids, self.num_qubits);
        match direction {
            Direction::Left => self.transform_columns(matrix, &masks),
            Direction::Right => self.transform_rows(&matrix.t().to_owned(), &masks),
            Direction::Both => {
                self.transform_columns(matrix, &masks);
                self.transform_rows(&matrix.mapv(|c| c.conj()), &masks);
            }
        }
        Ok(())
    }

    /// Validate ids and that `matrix` is a square operator on exactly them.
    pub fn check_operator(&self, matrix: &Array2<Complex64>, ids: &[usize]) -> EngineResult<()> {
        bits::check_ids(ids, self.num_qubits)?;
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(EngineError::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        if rows > self.dim() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim(),
                got: rows,
            });
        }
        let local = 1usize << ids.len();
        if rows != local {
            return Err(EngineError::DimensionMismatch {
                expected: local,
                got: rows,
            });
        }
        Ok(())
    }

    /// `ρ[:, j] ← M_local · ρ[:, j]` for every column.
    fn transform_columns(&mut self, m: &Array2<Complex64>, masks: &[usize]) {
        let dim = self.dim();
        let (offsets, target_mask) = layout(masks);
        let mut buf = vec![Complex64::new(0.0, 0.0); offsets.len()];
        for j in 0..dim {
            for base in (0..dim).filter(|b| b & target_mask == 0) {
                for (l, off) in offsets.iter().enumerate() {
                    buf[l] = self.matrix[[base | off, j]];
                }
                for (r, off) in offsets.iter().enumerate() {
                    self.matrix[[base | off, j]] = dot(m.row(r), &buf);
                }
            }
        }
    }

    /// `ρ[i, :] ← M_local · ρ[i, :]` for every row.
    fn transform_rows(&mut self, m: &Array2<Complex64>, masks: &[usize]) {
        let dim = self.dim();
        let (offsets, target_mask) = layout(masks);
        let mut buf = vec![Complex64::new(0.0, 0.0); offsets.len()];
        for i in 0..dim {
            for base in (0..dim).filter(|b| b & target_mask == 0) {
                for (l, off) in offsets.iter().enumerate() {
                    buf[l] = self.matrix[[i, base | off]];
                }
                for (r, off) in offsets.iter().enumerate() {
                    self.matrix[[i, base | off]] = dot(m.row(r), &buf);
                }
            }
        }
    }

    // =========================================================================
    // Algebra
    // =========================================================================

    /// `Tr ρ`.
    pub fn trace(&self) -> Complex64 {
        self.matrix.diag().sum()
    }

    /// `Tr ρ²`.
    pub fn sqtrace(&self) -> Complex64 {
        let dim = self.dim();
        (0..dim)
            .flat_map(|i| (0..dim).map(move |j| (i, j)))
            .map(|(i, j)| self.matrix[[i, j]] * self.matrix[[j, i]])
            .sum()
    }

    /// `Tr(ρ·σ)`.
    pub fn trace_product(&self, other: &DensityMatrix) -> EngineResult<Complex64> {
        self.check_same_dim(other)?;
        let dim = self.dim();
        Ok((0..dim)
            .flat_map(|i| (0..dim).map(move |j| (i, j)))
            .map(|(i, j)| self.matrix[[i, j]] * other.matrix[[j, i]])
            .sum())
    }

    /// Trace out the qubits `discard`; the remaining qubits keep their
    /// relative order.
    pub fn partial_trace(&self, discard: &[usize]) -> EngineResult<DensityMatrix> {
        bits::check_ids(discard, self.num_qubits)?;
        if discard.is_empty() {
            return Ok(self.clone());
        }
        if discard.len() == self.num_qubits {
            return Err(EngineError::Initialization(
                "cannot trace out every qubit".into(),
            ));
        }

        let keep = bits::complement(discard, self.num_qubits);
        let keep_masks = bits::masks(&keep, self.num_qubits);
        let drop_masks = bits::masks(discard, self.num_qubits);
        let keep_offsets: Vec<usize> = (0..1usize << keep.len())
            .map(|l| bits::deposit(l, &keep_masks))
            .collect();
        let drop_offsets: Vec<usize> = (0..1usize << discard.len())
            .map(|l| bits::deposit(l, &drop_masks))
            .collect();

        let dim = keep_offsets.len();
        let matrix = Array2::from_shape_fn((dim, dim), |(a, b)| {
            drop_offsets
                .iter()
                .map(|t| self.matrix[[keep_offsets[a] | t, keep_offsets[b] | t]])
                .sum::<Complex64>()
        });
        Ok(DensityMatrix {
            matrix,
            num_qubits: keep.len(),
        })
    }

    /// `ρ ← ρ + σ`.
    pub fn add(&mut self, other: &DensityMatrix) -> EngineResult<()> {
        self.check_same_dim(other)?;
        self.matrix += &other.matrix;
        Ok(())
    }

    /// `ρ ← f·ρ`.
    pub fn scale(&mut self, factor: f64) {
        self.matrix.mapv_inplace(|c| c * factor);
    }

    /// `ρ ⊗ σ`; the qubits of `self` come first.
    pub fn tensor_product(&self, other: &DensityMatrix) -> EngineResult<DensityMatrix> {
        let num_qubits = self.num_qubits + other.num_qubits;
        if num_qubits > MAX_QUBITS / 2 {
            return Err(EngineError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS / 2,
            });
        }
        Ok(DensityMatrix {
            matrix: kron(&self.matrix, &other.matrix),
            num_qubits,
        })
    }

    fn check_same_dim(&self, other: &DensityMatrix) -> EngineResult<()> {
        if self.dim() != other.dim() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(())
    }
}

/// Offsets of every local index, and the union of the masks.
fn layout(masks: &[usize]) -> (Vec<usize>, usize) {
    let offsets = (0..1usize << masks.len())
        .map(|l| bits::deposit(l, masks))
        .collect();
    (offsets, masks.iter().sum())
}

#[inline]
fn dot(row: ArrayView1<'_, Complex64>, v: &[Complex64]) -> Complex64 {
    row.iter().zip(v).map(|(a, b)| a * b).sum()
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    Array2::from_shape_fn((m * p, n * q), |(i, j)| a[[i / p, j / q]] * b[[i % p, j % q]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statevector::StateVector;
    use ndarray::array;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn approx(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-10)
    }

    fn hadamard() -> Array2<Complex64> {
        let s = FRAC_1_SQRT_2;
        array![[c(s), c(s)], [c(s), c(-s)]]
    }

    fn cnot() -> Array2<Complex64> {
        let (o, z) = (c(1.0), c(0.0));
        array![[o, z, z, z], [z, o, z, z], [z, z, z, o], [z, z, o, z]]
    }

    fn bell() -> DensityMatrix {
        let mut rho = DensityMatrix::new(2).unwrap();
        rho.apply_matrix(&hadamard(), &[0], Direction::Both).unwrap();
        rho.apply_matrix(&cnot(), &[0, 1], Direction::Both).unwrap();
        rho
    }

    #[test]
    fn test_bell_matches_pure_state() {
        let mut sv = StateVector::new(2).unwrap();
        let h = hadamard();
        sv.apply_matrix(&h, &[0]).unwrap();
        sv.apply_matrix(&cnot(), &[0, 1]).unwrap();
        assert!(approx(bell().matrix(), sv.to_density().matrix()));
        assert!((bell().trace() - c(1.0)).norm() < 1e-12);
        assert!((bell().sqtrace() - c(1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_left_and_right() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let mut left = DensityMatrix::new(1).unwrap();
        left.apply_matrix(&x, &[], Direction::Left).unwrap();
        // X·|0⟩⟨0| = |1⟩⟨0|
        assert_eq!(left.matrix()[[1, 0]], c(1.0));

        let mut right = DensityMatrix::new(1).unwrap();
        right.apply_matrix(&x, &[], Direction::Right).unwrap();
        // |0⟩⟨0|·X = |0⟩⟨1|
        assert_eq!(right.matrix()[[0, 1]], c(1.0));
    }

    #[test]
    fn test_partial_trace_of_bell_is_mixed() {
        let reduced = bell().partial_trace(&[1]).unwrap();
        assert_eq!(reduced.num_qubits(), 1);
        assert!(approx(reduced.matrix(), &array![[c(0.5), c(0.0)], [c(0.0), c(0.5)]]));
        assert!((reduced.sqtrace().re - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_trace_keeps_order() {
        // |0⟩|1⟩|0⟩, drop the middle qubit: |00⟩
        let mut sv = StateVector::new(3).unwrap();
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        sv.apply_matrix(&x, &[1]).unwrap();
        let reduced = sv.to_density().partial_trace(&[1]).unwrap();
        assert_eq!(reduced.matrix()[[0, 0]], c(1.0));

        // drop qubit 0: qubits (1, 2) are |10⟩, index 2
        let reduced = sv.to_density().partial_trace(&[0]).unwrap();
        assert_eq!(reduced.matrix()[[2, 2]], c(1.0));
    }

    #[test]
    fn test_partial_trace_errors() {
        let rho = bell();
        assert!(rho.partial_trace(&[0, 1]).is_err());
        assert!(rho.partial_trace(&[2]).is_err());
        assert!(rho.partial_trace(&[0, 0]).is_err());
        assert_eq!(rho.partial_trace(&[]).unwrap(), rho);
    }

    #[test]
    fn test_dimension_checks() {
        let mut rho = DensityMatrix::new(1).unwrap();
        let before = rho.clone();
        assert!(matches!(
            rho.apply_matrix(&cnot(), &[0], Direction::Both),
            Err(EngineError::DimensionMismatch { .. })
        ));
        assert_eq!(rho, before);
        assert!(DensityMatrix::from_matrix(Array2::zeros((3, 3))).is_err());
        assert!(DensityMatrix::from_matrix(Array2::zeros((2, 4))).is_err());
    }

    #[test]
    fn test_kron_and_tensor() {
        let zero = DensityMatrix::new(1).unwrap();
        let mut one = DensityMatrix::new(1).unwrap();
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        one.apply_matrix(&x, &[0], Direction::Both).unwrap();
        let joined = one.tensor_product(&zero).unwrap();
        assert_eq!(joined.num_qubits(), 2);
        assert_eq!(joined.matrix()[[2, 2]], c(1.0));
        assert_eq!(joined.trace(), c(1.0));
    }

    #[test]
    fn test_add_scale_trace_product() {
        let mut rho = DensityMatrix::new(1).unwrap();
        let sigma = rho.clone();
        rho.add(&sigma).unwrap();
        rho.scale(0.5);
        assert_eq!(rho, sigma);
        assert_eq!(rho.trace_product(&sigma).unwrap(), c(1.0));
        assert!(rho.add(&bell()).is_err());
    }
}
