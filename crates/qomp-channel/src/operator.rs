//! Density operators and their linear algebra.

use ndarray::Array2;
use num_complex::Complex64;
use qomp_engine::bits::{self, MIN_DOUBLE};
use qomp_engine::{DensityMatrix, Direction, EngineError, StateVector};
use tracing::{debug, instrument, warn};

use crate::error::{ChannelError, ChannelResult, lift};

/// A mixed state of `n` qubits, `2^n × 2^n`.
///
/// Every mutating operation validates its inputs before touching the
/// matrix, so a failed call leaves the operator as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityOperator {
    pub(crate) rho: DensityMatrix,
}

impl DensityOperator {
    /// `|0...0⟩⟨0...0|` over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> ChannelResult<Self> {
        DensityMatrix::new(num_qubits)
            .map(|rho| Self { rho })
            .map_err(initialization)
    }

    /// `|ψ⟩⟨ψ|`.
    pub fn from_state(state: &StateVector) -> Self {
        Self {
            rho: state.to_density(),
        }
    }

    /// Wrap an explicit `2^n × 2^n` matrix. The matrix is taken as is; no
    /// positivity or trace check is made.
    pub fn from_matrix(matrix: Array2<Complex64>) -> ChannelResult<Self> {
        DensityMatrix::from_matrix(matrix)
            .map(|rho| Self { rho })
            .map_err(initialization)
    }

    /// Mixture of pure states `Σ p_i |ψ_i⟩⟨ψ_i|`.
    pub fn from_states(states: &[StateVector], probabilities: &[f64]) -> ChannelResult<Self> {
        let operators: Vec<Self> = states.iter().map(Self::from_state).collect();
        Self::mix(&operators, probabilities)
    }

    /// Statistical mixture `Σ p_i ρ_i`.
    ///
    /// Probabilities are renormalized when they do not sum to one. The
    /// inputs are left untouched.
    #[instrument(skip_all, fields(count = operators.len()))]
    pub fn mix(operators: &[DensityOperator], probabilities: &[f64]) -> ChannelResult<Self> {
        let Some(first) = operators.first() else {
            return Err(ChannelError::Initialization(
                "cannot mix an empty ensemble".into(),
            ));
        };
        if operators.len() != probabilities.len() {
            return Err(ChannelError::Initialization(format!(
                "{} operators but {} probabilities",
                operators.len(),
                probabilities.len()
            )));
        }
        if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(ChannelError::Initialization(format!(
                "invalid probability {p}"
            )));
        }
        if let Some(op) = operators.iter().find(|op| op.dim() != first.dim()) {
            return Err(ChannelError::Initialization(format!(
                "cannot mix operators of dimension {} and {}",
                first.dim(),
                op.dim()
            )));
        }
        let total: f64 = probabilities.iter().sum();
        if total <= 0.0 {
            return Err(ChannelError::Initialization(
                "probabilities sum to zero".into(),
            ));
        }
        if (total - 1.0).abs() > MIN_DOUBLE {
            warn!(total, "ensemble probabilities do not sum to 1, renormalizing");
        }

        let mut mixed = first.rho.clone();
        mixed.scale(probabilities[0] / total);
        for (op, p) in operators.iter().zip(probabilities).skip(1) {
            let mut term = op.rho.clone();
            term.scale(p / total);
            mixed.add(&term).map_err(lift)?;
        }
        Ok(Self { rho: mixed })
    }

    /// Get the number of qubits.
    pub fn qubit_num(&self) -> usize {
        self.rho.num_qubits()
    }

    /// Row (and column) count, `2^n`.
    pub fn dim(&self) -> usize {
        self.rho.dim()
    }

    /// The raw, unrounded matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        self.rho.matrix()
    }

    // =========================================================================
    // Partial trace
    // =========================================================================

    /// Trace out the qubits `discard`. The remaining qubits keep their
    /// relative order; an empty `discard` returns a copy.
    #[instrument(skip(self))]
    pub fn partial_trace(&self, discard: &[usize]) -> ChannelResult<Self> {
        let n = self.qubit_num();
        bits::check_ids(discard, n).map_err(trace_error)?;
        if discard.len() == n {
            return Err(ChannelError::Trace(format!(
                "cannot trace out all {n} qubits"
            )));
        }
        let rho = self.rho.partial_trace(discard).map_err(trace_error)?;
        debug!(remaining = rho.num_qubits(), "partial trace taken");
        Ok(Self { rho })
    }

    /// Reduced operator over `keep`, in ascending qubit order.
    pub fn restrict(&self, keep: &[usize]) -> ChannelResult<Self> {
        let n = self.qubit_num();
        bits::check_ids(keep, n).map_err(trace_error)?;
        self.partial_trace(&bits::complement(keep, n))
    }

    /// Rounded matrix of the reduced operator over `keep`; an empty `keep`
    /// gives the whole operator.
    pub fn element(&self, keep: &[usize]) -> ChannelResult<Array2<Complex64>> {
        let reduced = if keep.is_empty() {
            self.clone()
        } else {
            self.restrict(keep)?
        };
        Ok(reduced.matrix().mapv(bits::round_complex))
    }

    // =========================================================================
    // Algebra
    // =========================================================================

    /// `ρ ← ρ + σ`.
    pub fn add(&mut self, other: &DensityOperator) -> ChannelResult<()> {
        self.rho.add(&other.rho).map_err(lift)
    }

    /// `ρ ← f·ρ`.
    pub fn scale(&mut self, factor: f64) {
        self.rho.scale(factor);
    }

    /// Multiply by `matrix` acting on `ids` (empty = every qubit): `M·ρ`,
    /// `ρ·M` or `M·ρ·M†` depending on `direction`.
    pub fn apply(
        &mut self,
        matrix: &Array2<Complex64>,
        ids: &[usize],
        direction: Direction,
    ) -> ChannelResult<()> {
        self.rho.apply_matrix(matrix, ids, direction).map_err(lift)
    }

    /// `Tr ρ`, rounded.
    pub fn trace(&self) -> ChannelResult<f64> {
        real_part("trace", self.rho.trace())
    }

    /// `Tr ρ²`, rounded.
    pub fn purity_trace(&self) -> ChannelResult<f64> {
        real_part("purity", self.rho.sqtrace())
    }

    /// `Tr(M·ρ)` with `M` acting on `ids`, rounded.
    pub fn expect(&self, matrix: &Array2<Complex64>, ids: &[usize]) -> ChannelResult<f64> {
        let mut product = self.rho.clone();
        product
            .apply_matrix(matrix, ids, Direction::Left)
            .map_err(lift)?;
        real_part("expectation", product.trace())
    }

    /// Hilbert–Schmidt overlap `Tr(ρ·σ)`, rounded.
    pub fn overlap(&self, other: &DensityOperator) -> ChannelResult<f64> {
        let product = self.rho.trace_product(&other.rho).map_err(lift)?;
        real_part("overlap", product)
    }

    /// `ρ ⊗ σ`; the qubits of `self` come first.
    pub fn tensor_product(&self, other: &DensityOperator) -> ChannelResult<Self> {
        self.rho
            .tensor_product(&other.rho)
            .map(|rho| Self { rho })
            .map_err(lift)
    }

    /// Divide by the trace and return the trace it had.
    pub fn normalize(&mut self) -> ChannelResult<f64> {
        let raw = self.rho.trace();
        real_part("trace", raw)?;
        if raw.re.abs() < MIN_DOUBLE {
            return Err(ChannelError::Trace(
                "cannot normalize an operator with zero trace".into(),
            ));
        }
        self.rho.scale(1.0 / raw.re);
        Ok(bits::round(raw.re))
    }

    /// Check that both operators have the same shape and every entry agrees
    /// within `tolerance`.
    pub fn approx_eq(&self, other: &DensityOperator, tolerance: f64) -> bool {
        self.dim() == other.dim()
            && self
                .matrix()
                .iter()
                .zip(other.matrix().iter())
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }
}

/// Real part of a quantity that must be real, rounded.
pub(crate) fn real_part(quantity: &'static str, value: Complex64) -> ChannelResult<f64> {
    if value.im.abs() > MIN_DOUBLE {
        return Err(ChannelError::NumericalTolerance {
            quantity,
            imag: value.im,
        });
    }
    Ok(bits::round(value.re))
}

fn initialization(err: EngineError) -> ChannelError {
    ChannelError::Initialization(err.to_string())
}

fn trace_error(err: EngineError) -> ChannelError {
    ChannelError::Trace(err.to_string())
}
