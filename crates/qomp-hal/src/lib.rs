//! Qomp Hardware Abstraction Layer
//!
//! The seam between circuits and the simulators that execute them:
//!
//! - [`BackendKind`] names the available simulators and knows which gates
//!   each accepts
//! - [`Runner`] is the synchronous execution capability every simulator
//!   implements
//! - [`MeasurementResult`] aggregates outcome counts keyed by the measured
//!   qubits
//! - [`SimConfig`] carries backend, shot, seed and size settings loaded
//!   from YAML and the environment
//!
//! # Example
//!
//! ```
//! use qomp_hal::{BackendKind, SimConfig};
//!
//! let config = SimConfig::from_yaml_str("backend: stabilizer\nseed: 3\n").unwrap();
//! assert_eq!(config.backend_kind().unwrap(), BackendKind::Stabilizer);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod result;

pub use backend::{BackendKind, Runner};
pub use config::SimConfig;
pub use error::{HalError, HalResult};
pub use result::{MeasurementBasis, MeasurementResult};
