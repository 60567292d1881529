//! Error types for the channel algebra.

use qomp_engine::EngineError;
use thiserror::Error;

/// Errors raised by [`DensityOperator`](crate::DensityOperator) operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChannelError {
    /// An operator could not be built from the given inputs.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Two operands have incompatible shapes.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension the operation needs.
        expected: usize,
        /// Dimension it was given.
        got: usize,
    },

    /// A qubit id is outside the operator.
    #[error("Qubit {qubit} out of bounds for an operator on {num_qubits} qubits")]
    OutOfBoundQubitId {
        /// The offending qubit id.
        qubit: usize,
        /// Number of qubits the operator spans.
        num_qubits: usize,
    },

    /// A qubit id appears twice.
    #[error("Duplicate qubit {0}")]
    DuplicateQubitId(usize),

    /// A trace or partial trace could not be taken.
    #[error("Trace failed: {0}")]
    Trace(String),

    /// A quantity expected to be real has a significant imaginary part.
    #[error("{quantity} has imaginary part {imag:e} above tolerance")]
    NumericalTolerance {
        /// Which quantity, e.g. `"trace"` or `"probability"`.
        quantity: &'static str,
        /// The imaginary part that was found.
        imag: f64,
    },

    /// Probabilities could not be computed.
    #[error("Probability computation failed: {0}")]
    Probability(String),

    /// An instrument could not be applied.
    #[error("Instrument failed: {0}")]
    Instrument(String),

    /// A selective instrument referenced a missing outcome.
    #[error("Outcome {outcome} out of range for {num_operators} operators")]
    InvalidOutcomeIndex {
        /// Requested outcome.
        outcome: usize,
        /// Number of operators in the instrument.
        num_operators: usize,
    },

    /// Engine error not covered above.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Translate engine id and shape errors into their channel counterparts.
pub(crate) fn lift(err: EngineError) -> ChannelError {
    match err {
        EngineError::InvalidQubitId { qubit, num_qubits } => {
            ChannelError::OutOfBoundQubitId { qubit, num_qubits }
        }
        EngineError::DuplicateQubitId(q) => ChannelError::DuplicateQubitId(q),
        EngineError::DimensionMismatch { expected, got } => {
            ChannelError::DimensionMismatch { expected, got }
        }
        other => ChannelError::Engine(other),
    }
}
