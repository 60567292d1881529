//! Backend kinds and the runner capability.
//!
//! A builder is bound to exactly one [`BackendKind`]. Each kind has a
//! [`Runner`] that executes a whole circuit synchronously against its own
//! quantum state and reports a [`MeasurementResult`].
//!
//! | Kind | Names | Gates |
//! |------|-------|-------|
//! | [`BackendKind::StateVector`] | `state_vector`, `statevector`, `qstate` | every catalog gate |
//! | [`BackendKind::Stabilizer`] | `stabilizer`, `stab` | Clifford gates |
//!
//! Measurements run on every backend.

use std::fmt;
use std::str::FromStr;

use qomp_ir::{Circuit, ClassicalMemory, GateOp};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};
use crate::result::MeasurementResult;

/// The simulators a circuit can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Dense state-vector simulation; accepts every gate.
    #[default]
    StateVector,
    /// Stabilizer-tableau simulation; Clifford gates only.
    Stabilizer,
}

impl BackendKind {
    /// Every backend kind.
    pub const ALL: [BackendKind; 2] = [BackendKind::StateVector, BackendKind::Stabilizer];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::StateVector => "state_vector",
            BackendKind::Stabilizer => "stabilizer",
        }
    }

    /// Check if this backend can execute `op`.
    pub fn supports(self, op: &GateOp) -> bool {
        match self {
            BackendKind::StateVector => true,
            BackendKind::Stabilizer => op.is_measurement() || op.kind.is_clifford(),
        }
    }

    /// Fail with [`HalError::UnsupportedGateForBackend`] unless every op is
    /// supported.
    pub fn check_ops<'a>(self, ops: impl IntoIterator<Item = &'a GateOp>) -> HalResult<()> {
        match ops.into_iter().find(|op| !self.supports(op)) {
            Some(op) => Err(HalError::UnsupportedGateForBackend {
                gate: op.name().to_string(),
                backend: self.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state_vector" | "statevector" | "qstate" | "qlazy_qstate_simulator" => {
                Ok(BackendKind::StateVector)
            }
            "stabilizer" | "stab" | "qlazy_stabilizer_simulator" => Ok(BackendKind::Stabilizer),
            _ => Err(HalError::BackendNotSupported(s.to_string())),
        }
    }
}

/// Executes circuits for one [`BackendKind`].
///
/// A runner owns its quantum state and random source. `run` leaves the
/// post-measurement state of the last shot in place, so consecutive runs
/// continue from where the previous one ended unless
/// [`Runner::reset_qubits`] is called in between.
pub trait Runner {
    /// The backend this runner implements.
    fn kind(&self) -> BackendKind;

    /// Check if this runner can execute `op`.
    fn supports(&self, op: &GateOp) -> bool {
        self.kind().supports(op)
    }

    /// Execute `circuit` for `shots` shots.
    ///
    /// `memory` is restored to its incoming value before every shot and
    /// holds the memory of the last shot afterwards.
    fn run(
        &mut self,
        circuit: &Circuit,
        memory: &mut ClassicalMemory,
        shots: u32,
    ) -> HalResult<MeasurementResult>;

    /// Return every qubit to |0⟩.
    fn reset_qubits(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use qomp_ir::{GateKind, QubitId, qubits};

    #[test]
    fn test_from_str() {
        assert_eq!("state_vector".parse::<BackendKind>().unwrap(), BackendKind::StateVector);
        assert_eq!("Stabilizer".parse::<BackendKind>().unwrap(), BackendKind::Stabilizer);
        assert!(matches!(
            "tensor_network".parse::<BackendKind>(),
            Err(HalError::BackendNotSupported(name)) if name == "tensor_network"
        ));
        for kind in BackendKind::ALL {
            assert_eq!(kind.name().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_stabilizer_support() {
        let t = GateOp::single(GateKind::T, QubitId(0));
        let cy = GateOp::two(GateKind::CY, QubitId(0), QubitId(1));
        let mb = GateOp::new(GateKind::MeasureBell, qubits(&[0, 1]));
        let ch = GateOp::two(GateKind::CH, QubitId(0), QubitId(1));

        assert!(BackendKind::StateVector.supports(&t));
        assert!(!BackendKind::Stabilizer.supports(&t));
        assert!(BackendKind::Stabilizer.supports(&cy));
        assert!(BackendKind::Stabilizer.supports(&mb));
        assert!(!BackendKind::Stabilizer.supports(&ch));

        let err = BackendKind::Stabilizer.check_ops([&cy, &t]).unwrap_err();
        assert!(matches!(
            err,
            HalError::UnsupportedGateForBackend { ref gate, .. } if gate == "t"
        ));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BackendKind::StateVector).unwrap();
        assert_eq!(json, "\"state_vector\"");
    }
}
