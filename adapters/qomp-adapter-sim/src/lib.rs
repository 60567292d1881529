//! Qomp local simulators
//!
//! Two [`Runner`](qomp_hal::Runner) implementations backed by
//! `qomp-engine`:
//!
//! - [`StateVectorRunner`]: dense state vector, every catalog gate
//! - [`StabilizerRunner`]: CHP tableau, Clifford gates only
//!
//! Both own their quantum state and a `StdRng` seeded once at
//! construction, either from an explicit seed or from OS entropy.
//!
//! # Example
//!
//! ```
//! use qomp_adapter_sim::StateVectorRunner;
//! use qomp_hal::Runner;
//! use qomp_ir::{Circuit, ClassicalMemory, GateKind, GateOp, QubitId, qubits};
//!
//! let mut circuit = Circuit::new(2, 0);
//! circuit.push(GateOp::single(GateKind::H, QubitId(0))).unwrap();
//! circuit.push(GateOp::two(GateKind::CX, QubitId(0), QubitId(1))).unwrap();
//! circuit.push(GateOp::measure(qubits(&[0, 1]))).unwrap();
//!
//! let mut runner = StateVectorRunner::new(2, Some(1)).unwrap();
//! let mut memory = ClassicalMemory::new(0);
//! let result = runner.run(&circuit, &mut memory, 100).unwrap();
//! assert_eq!(result.count("00") + result.count("11"), 100);
//! ```

mod stabilizer;
mod statevector;
mod tally;

pub use stabilizer::StabilizerRunner;
pub use statevector::StateVectorRunner;

use rand::SeedableRng;
use rand::rngs::StdRng;

use qomp_engine::EngineError;
use qomp_hal::{BackendKind, HalError, HalResult};
use qomp_ir::{Circuit, GateOp};

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn ids(op: &GateOp) -> Vec<usize> {
    op.qubits.iter().map(|q| q.index()).collect()
}

pub(crate) fn unsupported(op: &GateOp, backend: BackendKind) -> HalError {
    HalError::UnsupportedGateForBackend {
        gate: op.name().to_string(),
        backend: backend.name().to_string(),
    }
}

/// Checks common to every run: a positive shot count and a circuit sized
/// for the runner's register.
pub(crate) fn check_run(circuit: &Circuit, num_qubits: usize, shots: u32) -> HalResult<()> {
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be at least 1".into()));
    }
    if circuit.num_qubits() as usize != num_qubits {
        return Err(HalError::Engine(EngineError::DimensionMismatch {
            expected: num_qubits,
            got: circuit.num_qubits() as usize,
        }));
    }
    Ok(())
}
