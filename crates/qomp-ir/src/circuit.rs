//! Circuit: an ordered, validated list of gate ops over fixed registers.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Arity;
use crate::instruction::GateOp;
use crate::qubit::{ClbitId, QubitId};
use crate::synthesis;

/// An ordered sequence of gate ops bound to a qubit register and a
/// classical memory of fixed sizes.
///
/// Every op is validated on the way in. Composite kinds (CCX, CSW, MCX) are
/// synthesized into elementary gates, so a circuit only ever stores
/// catalog gates and measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: u32,
    num_clbits: u32,
    ops: Vec<GateOp>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            num_qubits,
            num_clbits,
            ops: Vec::new(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// The stored ops, in order.
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Number of stored ops.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if no op is stored.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drop every op.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate an op against the registers without storing it.
    pub fn validate(&self, op: &GateOp) -> IrResult<()> {
        self.check_arity(op)?;
        self.check_qubits(op)?;
        self.check_classical(op)
    }

    fn check_arity(&self, op: &GateOp) -> IrResult<()> {
        let got = op.qubits.len();
        let (min, max) = match op.kind.arity() {
            Arity::Fixed(n) => (n, n),
            Arity::Variable => (op.kind.min_qubits(), self.num_qubits as usize),
        };
        if got > max {
            return Err(IrError::TooManyQubitIds {
                gate_name: op.name().to_string(),
                max,
                got,
            });
        }
        if got < min {
            return Err(IrError::InsufficientQubitIds {
                gate_name: op.name().to_string(),
                min,
                got,
            });
        }
        Ok(())
    }

    fn check_qubits(&self, op: &GateOp) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for &qubit in &op.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::OutOfBoundQubitId {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: Some(op.name().to_string()),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubitId {
                    qubit,
                    gate_name: Some(op.name().to_string()),
                });
            }
        }
        Ok(())
    }

    fn check_classical(&self, op: &GateOp) -> IrResult<()> {
        if let Some(clbits) = &op.clbits {
            if clbits.len() != op.qubits.len() {
                return Err(IrError::ClassicalRegisterMismatch {
                    gate_name: op.name().to_string(),
                    qubits: op.qubits.len(),
                    clbits: clbits.len(),
                });
            }
            for &clbit in clbits {
                self.check_clbit(clbit)?;
            }
        }
        if let Some(control) = op.control {
            self.check_clbit(control)?;
        }
        Ok(())
    }

    fn check_clbit(&self, clbit: ClbitId) -> IrResult<()> {
        if clbit.0 >= self.num_clbits {
            return Err(IrError::OutOfBoundClassicalAddress {
                clbit,
                num_clbits: self.num_clbits,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Validate `op`, expand it if composite, and append the result.
    pub fn push(&mut self, op: GateOp) -> IrResult<&mut Self> {
        self.extend(vec![op])
    }

    /// Append several ops atomically: either every op is valid and all are
    /// appended, or nothing is.
    pub fn extend(&mut self, ops: Vec<GateOp>) -> IrResult<&mut Self> {
        let mut elementary = Vec::with_capacity(ops.len());
        for op in &ops {
            self.validate(op)?;
            elementary.extend(synthesis::expand(op));
        }
        for op in &elementary {
            self.validate(op)?;
        }
        self.ops.extend(elementary);
        Ok(self)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Qubits measured anywhere in the circuit, in order of first appearance.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        let mut seen = FxHashSet::default();
        self.ops
            .iter()
            .filter(|op| op.is_measurement())
            .flat_map(|op| op.qubits.iter().copied())
            .filter(|q| seen.insert(*q))
            .collect()
    }

    /// Check if every measurement is unconditioned, comes after the last
    /// gate, and touches qubits no other measurement touches.
    ///
    /// Such circuits can be evolved once and sampled many times.
    pub fn has_terminal_measurements(&self) -> bool {
        let mut seen = FxHashSet::default();
        let mut measuring = false;
        for op in &self.ops {
            if op.is_measurement() {
                if op.is_conditioned() {
                    return false;
                }
                if !op.qubits.iter().all(|q| seen.insert(*q)) {
                    return false;
                }
                measuring = true;
            } else if measuring {
                return false;
            }
        }
        true
    }

    /// Check if the circuit contains a measurement.
    pub fn has_measurements(&self) -> bool {
        self.ops.iter().any(GateOp::is_measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use crate::qubit::{clbits, qubits};

    #[test]
    fn test_push_and_expand() {
        let mut circuit = Circuit::new(3, 0);
        circuit
            .push(GateOp::single(GateKind::H, QubitId(0)))
            .unwrap()
            .push(GateOp::new(GateKind::CCX, qubits(&[0, 1, 2])))
            .unwrap();
        assert_eq!(circuit.len(), 6);
        assert!(circuit.ops().iter().all(|op| !op.kind.is_composite()));
    }

    #[test]
    fn test_arity_errors() {
        let mut circuit = Circuit::new(3, 0);
        let err = circuit
            .push(GateOp::new(GateKind::CX, qubits(&[0, 1, 2])))
            .unwrap_err();
        assert!(matches!(err, IrError::TooManyQubitIds { max: 2, got: 3, .. }));

        let err = circuit
            .push(GateOp::new(GateKind::CX, qubits(&[0])))
            .unwrap_err();
        assert!(matches!(err, IrError::InsufficientQubitIds { min: 2, got: 1, .. }));

        let err = circuit.push(GateOp::measure(Vec::<QubitId>::new())).unwrap_err();
        assert!(matches!(err, IrError::InsufficientQubitIds { .. }));

        let err = circuit
            .push(GateOp::new(GateKind::MCX, qubits(&[0])))
            .unwrap_err();
        assert!(matches!(err, IrError::InsufficientQubitIds { min: 2, .. }));

        let err = circuit
            .push(GateOp::measure(qubits(&[0, 1, 2, 3])))
            .unwrap_err();
        assert!(matches!(err, IrError::TooManyQubitIds { max: 3, .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_id_errors() {
        let mut circuit = Circuit::new(2, 0);
        let err = circuit
            .push(GateOp::single(GateKind::X, QubitId(2)))
            .unwrap_err();
        assert!(matches!(err, IrError::OutOfBoundQubitId { num_qubits: 2, .. }));

        let err = circuit
            .push(GateOp::two(GateKind::CZ, QubitId(1), QubitId(1)))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubitId { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_classical_errors() {
        let mut circuit = Circuit::new(2, 2);
        let err = circuit
            .push(GateOp::measure(qubits(&[0, 1])).with_clbits(clbits(&[0])))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::ClassicalRegisterMismatch { qubits: 2, clbits: 1, .. }
        ));

        let err = circuit
            .push(GateOp::single(GateKind::X, QubitId(0)).with_control(Some(ClbitId(2))))
            .unwrap_err();
        assert!(matches!(err, IrError::OutOfBoundClassicalAddress { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_extend_is_atomic() {
        let mut circuit = Circuit::new(2, 0);
        let ops = vec![
            GateOp::single(GateKind::H, QubitId(0)),
            GateOp::single(GateKind::H, QubitId(5)),
        ];
        assert!(circuit.extend(ops).is_err());
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_measured_qubits_order() {
        let mut circuit = Circuit::new(3, 0);
        circuit.push(GateOp::measure(qubits(&[2]))).unwrap();
        circuit.push(GateOp::measure(qubits(&[0, 2]))).unwrap();
        assert_eq!(circuit.measured_qubits(), qubits(&[2, 0]));
    }

    #[test]
    fn test_terminal_measurements() {
        let mut circuit = Circuit::new(2, 1);
        circuit.push(GateOp::single(GateKind::H, QubitId(0))).unwrap();
        circuit.push(GateOp::measure(qubits(&[0]))).unwrap();
        circuit.push(GateOp::measure(qubits(&[1]))).unwrap();
        assert!(circuit.has_terminal_measurements());

        let mut remeasured = circuit.clone();
        remeasured.push(GateOp::measure(qubits(&[0]))).unwrap();
        assert!(!remeasured.has_terminal_measurements());

        let mut mid = circuit.clone();
        mid.push(GateOp::single(GateKind::X, QubitId(1))).unwrap();
        assert!(!mid.has_terminal_measurements());

        let mut conditioned = Circuit::new(1, 1);
        conditioned
            .push(GateOp::measure(qubits(&[0])).with_control(Some(ClbitId(0))))
            .unwrap();
        assert!(!conditioned.has_terminal_measurements());
    }
}
