//! Circuit instructions.

use serde::{Deserialize, Serialize};

use crate::gate::GateKind;
use crate::qubit::{ClbitId, QubitId};

/// Measurement basis expressed as a Bloch-sphere direction.
///
/// Outcome 0 projects onto `cos(θπ/2)|0⟩ + e^{iφπ}·sin(θπ/2)|1⟩`, where
/// θ is `angle` and φ is `phase`, both in multiples of π.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasisAxis {
    /// Polar angle θ.
    pub angle: f64,
    /// Azimuthal phase φ.
    pub phase: f64,
}

impl BasisAxis {
    /// Computational (Z) basis.
    pub const Z: BasisAxis = BasisAxis { angle: 0.0, phase: 0.0 };
    /// X basis.
    pub const X: BasisAxis = BasisAxis { angle: 0.5, phase: 0.0 };
    /// Y basis.
    pub const Y: BasisAxis = BasisAxis { angle: 0.5, phase: 0.5 };
}

/// One circuit instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    /// The gate kind.
    pub kind: GateKind,
    /// Qubits acted on, in gate order (controls first).
    pub qubits: Vec<QubitId>,
    /// Where measurement outcomes are stored, paired with `qubits`.
    pub clbits: Option<Vec<ClbitId>>,
    /// Phase parameters in multiples of π; unused slots are zero.
    pub phases: [f64; 3],
    /// The op runs only when this classical bit is 1.
    pub control: Option<ClbitId>,
}

impl GateOp {
    /// Create an op with no phases, outcome storage or classical control.
    pub fn new(kind: GateKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
            clbits: None,
            phases: [0.0; 3],
            control: None,
        }
    }

    /// Single-qubit gate.
    pub fn single(kind: GateKind, qubit: QubitId) -> Self {
        Self::new(kind, [qubit])
    }

    /// Two-qubit gate, control first.
    pub fn two(kind: GateKind, q0: QubitId, q1: QubitId) -> Self {
        Self::new(kind, [q0, q1])
    }

    /// Z-basis measurement of `qubits`.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(GateKind::Measure, qubits)
    }

    /// Set the phase parameters. Slots past `phases.len()` stay zero.
    #[must_use]
    pub fn with_phases(mut self, phases: &[f64]) -> Self {
        for (slot, p) in self.phases.iter_mut().zip(phases) {
            *slot = *p;
        }
        self
    }

    /// Store measurement outcomes in `clbits`.
    #[must_use]
    pub fn with_clbits(mut self, clbits: impl IntoIterator<Item = ClbitId>) -> Self {
        self.clbits = Some(clbits.into_iter().collect());
        self
    }

    /// Gate this op on a classical bit.
    #[must_use]
    pub fn with_control(mut self, control: Option<ClbitId>) -> Self {
        self.control = control;
        self
    }

    /// The gate mnemonic.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The phases actually taken by this kind.
    pub fn params(&self) -> &[f64] {
        &self.phases[..self.kind.num_phases()]
    }

    /// Check if this is a measurement.
    pub fn is_measurement(&self) -> bool {
        self.kind.is_measurement()
    }

    /// Check if this op depends on classical memory.
    pub fn is_conditioned(&self) -> bool {
        self.control.is_some()
    }

    /// Basis of a single-qubit-axis measurement; `None` for Bell
    /// measurements and gates.
    pub fn basis_axis(&self) -> Option<BasisAxis> {
        match self.kind {
            GateKind::Measure => Some(BasisAxis::Z),
            GateKind::MeasureX => Some(BasisAxis::X),
            GateKind::MeasureY => Some(BasisAxis::Y),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let op = GateOp::single(GateKind::Rz, QubitId(1))
            .with_phases(&[0.25])
            .with_control(Some(ClbitId(0)));
        assert_eq!(op.name(), "rz");
        assert_eq!(op.params(), &[0.25]);
        assert_eq!(op.phases, [0.25, 0.0, 0.0]);
        assert!(op.is_conditioned());
        assert!(!op.is_measurement());
    }

    #[test]
    fn test_measurement_basis() {
        let m = GateOp::measure([QubitId(0), QubitId(1)]).with_clbits([ClbitId(0), ClbitId(1)]);
        assert!(m.is_measurement());
        assert_eq!(m.basis_axis(), Some(BasisAxis::Z));
        assert_eq!(m.clbits.as_ref().map(Vec::len), Some(2));
        assert_eq!(GateOp::new(GateKind::MeasureBell, [QubitId(0), QubitId(1)]).basis_axis(), None);
    }
}
