//! Error types for the engine crate.

use thiserror::Error;

/// Errors raised by the amplitude, density-matrix and tableau engines.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// A state could not be created from the given input.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Matrix or state sizes do not fit together.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// Qubit index beyond the register.
    #[error("Qubit {qubit} is out of range for {num_qubits} qubits")]
    InvalidQubitId {
        /// The offending qubit index.
        qubit: usize,
        /// Number of qubits in the state.
        num_qubits: usize,
    },

    /// Qubit index listed twice.
    #[error("Duplicate qubit index {0}")]
    DuplicateQubitId(usize),

    /// The requested qubits are entangled with the rest of the register.
    #[error("Qubits {0:?} are not separable from the rest of the register")]
    NotSeparable(Vec<usize>),

    /// An expectation value came out complex.
    #[error("Observable is not Hermitian: expectation has imaginary part {imag}")]
    NotHermitian {
        /// Imaginary part of `⟨ψ|M|ψ⟩`.
        imag: f64,
    },

    /// Register too large to allocate.
    #[error("{requested} qubits requested, at most {max} supported")]
    TooManyQubits {
        /// Requested size.
        requested: usize,
        /// Largest supported size.
        max: usize,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
