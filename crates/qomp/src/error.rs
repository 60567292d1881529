//! Error type of the facade.

use qomp_channel::ChannelError;
use qomp_engine::EngineError;
use qomp_hal::HalError;
use qomp_ir::IrError;
use thiserror::Error;

/// Any error a Qomp operation can raise.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QompError {
    /// Circuit validation failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Backend selection or execution failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// A channel operation failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The engine rejected an operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for Qomp operations.
pub type QompResult<T> = Result<T, QompError>;
