//! Error types for the HAL crate.

use qomp_engine::EngineError;
use qomp_ir::IrError;
use thiserror::Error;

/// Errors that can occur while selecting a backend or running a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No backend answers to this name.
    #[error("Backend not supported: {0}")]
    BackendNotSupported(String),

    /// The bound backend cannot execute this gate.
    #[error("Gate '{gate}' is not supported by the {backend} backend")]
    UnsupportedGateForBackend {
        /// Gate mnemonic.
        gate: String,
        /// Backend name.
        backend: String,
    },

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Outcome counts do not form a valid result.
    #[error("Aggregation failed: {0}")]
    Aggregation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Engine error.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Circuit error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
