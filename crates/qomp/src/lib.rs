//! Qomp
//!
//! Quantum circuit composition and density-operator channel algebra on
//! local simulators.
//!
//! # Overview
//!
//! - [`QuantumComputer`] records a validated circuit over a fixed qubit
//!   register and classical memory and runs it on a state-vector or
//!   stabilizer backend
//! - [`DensityOperator`] models mixed states: mixing, local unitaries,
//!   Kraus/POVM measurement, instruments and partial trace
//! - [`MeasurementResult`] holds the outcome counts of a run
//!
//! The building blocks live in their own crates and are re-exported here:
//! `qomp-ir` (gates, circuits, synthesis), `qomp-engine` (state vector,
//! density matrix, tableau), `qomp-channel`, `qomp-hal` (backends,
//! results, configuration) and `qomp-adapter-sim` (runners).
//!
//! # Example: Bell pair
//!
//! ```
//! use qomp::{BackendKind, QuantumComputer, QubitId};
//!
//! let mut qc = QuantumComputer::with_seed(2, 0, BackendKind::Stabilizer, 7).unwrap();
//! qc.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//! qc.mb(QubitId(0), QubitId(1)).unwrap();
//!
//! let result = qc.run(10).unwrap();
//! assert_eq!(result.count("00"), 10);
//! ```
//!
//! # Example: From a run to a density operator
//!
//! ```
//! use qomp::DensityOperator;
//! use qomp::{BackendKind, QuantumComputer, QubitId};
//!
//! let mut qc = QuantumComputer::new(1, 0, BackendKind::StateVector).unwrap();
//! qc.h(QubitId(0)).unwrap();
//! qc.run(1).unwrap();
//!
//! let rho: DensityOperator = qc.density_operator().unwrap();
//! assert_eq!(rho.purity_trace().unwrap(), 1.0);
//! assert_eq!(rho.partial_trace(&[]).unwrap().qubit_num(), 1);
//! ```

pub mod computer;
pub mod error;

pub use computer::{Phase, QuantumComputer, ResetFlags};
pub use error::{QompError, QompResult};

pub use qomp_channel::{DensityOperator, OperatorKind};
pub use qomp_hal::{BackendKind, MeasurementBasis, MeasurementResult, SimConfig};
pub use qomp_ir::{BasisAxis, ClbitId, GateKind, GateOp, QubitId, clbits, qubits};

pub use qomp_adapter_sim as sim;
pub use qomp_channel as channel;
pub use qomp_engine as engine;
pub use qomp_hal as hal;
pub use qomp_ir as ir;
