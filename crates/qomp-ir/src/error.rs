//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while validating gate operations and circuits.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit id beyond the declared register size.
    #[error("Qubit {qubit} is out of bounds for a {num_qubits}-qubit register{}", format_gate_context(.gate_name))]
    OutOfBoundQubitId {
        /// The offending qubit.
        qubit: QubitId,
        /// Register size.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Same qubit listed twice in one operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubitId {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// More qubit ids than the gate (or register) accepts.
    #[error("Gate '{gate_name}' accepts at most {max} qubits, got {got}")]
    TooManyQubitIds {
        /// Name of the gate.
        gate_name: String,
        /// Maximum number of ids.
        max: usize,
        /// Number of ids supplied.
        got: usize,
    },

    /// Fewer qubit ids than the gate requires.
    #[error("Gate '{gate_name}' requires at least {min} qubits, got {got}")]
    InsufficientQubitIds {
        /// Name of the gate.
        gate_name: String,
        /// Minimum number of ids.
        min: usize,
        /// Number of ids supplied.
        got: usize,
    },

    /// Classical ids do not pair one-to-one with qubit ids.
    #[error("Gate '{gate_name}' has {qubits} qubit ids but {clbits} classical ids")]
    ClassicalRegisterMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Number of qubit ids.
        qubits: usize,
        /// Number of classical ids.
        clbits: usize,
    },

    /// Classical address beyond the declared memory size.
    #[error("Classical address {clbit} is out of bounds for {num_clbits} bits of memory")]
    OutOfBoundClassicalAddress {
        /// The offending address.
        clbit: ClbitId,
        /// Memory size.
        num_clbits: u32,
    },

    /// Gate name not in the catalog.
    #[error("Unknown gate kind '{0}'")]
    UnknownGateKind(String),

    /// More phase parameters than the gate takes.
    #[error("Gate '{gate_name}' takes {expected} phase parameters, got {got}")]
    PhaseCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Number of phases the gate takes.
        expected: usize,
        /// Number supplied.
        got: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
