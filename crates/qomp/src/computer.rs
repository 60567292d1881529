//! The circuit builder bound to a simulator backend.

use tracing::{debug, instrument};

use qomp_adapter_sim::{StabilizerRunner, StateVectorRunner};
use qomp_channel::DensityOperator;
use qomp_engine::{StateVector, Tableau};
use qomp_hal::{BackendKind, HalError, MeasurementResult, Runner, SimConfig};
use qomp_ir::{Circuit, ClassicalMemory, ClbitId, GateKind, GateOp, IrError, QubitId, synthesis};

use crate::error::QompResult;

/// Which pieces of state [`QuantumComputer::reset`] clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetFlags {
    /// Return every qubit to |0⟩.
    pub qubits: bool,
    /// Zero the classical memory.
    pub classical_memory: bool,
    /// Drop every recorded op.
    pub circuit: bool,
}

impl ResetFlags {
    /// Clear nothing.
    pub const NONE: ResetFlags = ResetFlags {
        qubits: false,
        classical_memory: false,
        circuit: false,
    };

    /// Clear everything.
    pub const ALL: ResetFlags = ResetFlags {
        qubits: true,
        classical_memory: true,
        circuit: true,
    };
}

/// Lifecycle of a [`QuantumComputer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No op recorded.
    Empty,
    /// Ops recorded since the last run or reset.
    Building,
    /// The circuit has been run.
    Dispatched,
}

enum Backend {
    StateVector(StateVectorRunner),
    Stabilizer(StabilizerRunner),
}

impl Backend {
    fn new(kind: BackendKind, num_qubits: u32, seed: Option<u64>) -> QompResult<Self> {
        Ok(match kind {
            BackendKind::StateVector => {
                Backend::StateVector(StateVectorRunner::new(num_qubits, seed)?)
            }
            BackendKind::Stabilizer => Backend::Stabilizer(StabilizerRunner::new(num_qubits, seed)?),
        })
    }

    fn runner(&mut self) -> &mut dyn Runner {
        match self {
            Backend::StateVector(r) => r,
            Backend::Stabilizer(r) => r,
        }
    }
}

/// Records a circuit over a fixed qubit register and classical memory, and
/// runs it on one simulator backend.
///
/// Every add validates the op against the registers and the backend before
/// anything is recorded; a failed add leaves the circuit unchanged.
///
/// ```
/// use qomp::{BackendKind, QuantumComputer, QubitId};
///
/// let mut qc = QuantumComputer::with_seed(2, 0, BackendKind::StateVector, 1).unwrap();
/// qc.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
/// qc.measure(&[QubitId(0), QubitId(1)]).unwrap();
///
/// let result = qc.run(10).unwrap();
/// assert_eq!(result.count("00") + result.count("11"), 10);
/// ```
pub struct QuantumComputer {
    kind: BackendKind,
    backend: Backend,
    circuit: Circuit,
    memory: ClassicalMemory,
    phase: Phase,
    default_shots: u32,
}

impl QuantumComputer {
    /// Create a computer with `num_qubits` qubits and `num_clbits`
    /// classical bits, seeded from OS entropy.
    pub fn new(num_qubits: u32, num_clbits: u32, kind: BackendKind) -> QompResult<Self> {
        let config = SimConfig {
            backend: kind.name().to_string(),
            ..SimConfig::default()
        };
        Self::from_config(num_qubits, num_clbits, &config)
    }

    /// Create a computer whose runner is seeded with `seed`.
    pub fn with_seed(
        num_qubits: u32,
        num_clbits: u32,
        kind: BackendKind,
        seed: u64,
    ) -> QompResult<Self> {
        let config = SimConfig {
            backend: kind.name().to_string(),
            seed: Some(seed),
            ..SimConfig::default()
        };
        Self::from_config(num_qubits, num_clbits, &config)
    }

    /// Create a computer from a configuration.
    pub fn from_config(num_qubits: u32, num_clbits: u32, config: &SimConfig) -> QompResult<Self> {
        config.validate()?;
        if num_qubits > config.max_qubits {
            return Err(HalError::Configuration(format!(
                "{num_qubits} qubits requested, at most {} configured",
                config.max_qubits
            ))
            .into());
        }
        let kind = config.backend_kind()?;
        debug!(
            "Creating {} computer: {} qubits, {} classical bits",
            kind, num_qubits, num_clbits
        );
        Ok(Self {
            kind,
            backend: Backend::new(kind, num_qubits, config.seed)?,
            circuit: Circuit::new(num_qubits, num_clbits),
            memory: ClassicalMemory::new(num_clbits),
            phase: Phase::Empty,
            default_shots: config.default_shots,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The bound backend.
    pub fn backend_kind(&self) -> BackendKind {
        self.kind
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.circuit.num_qubits()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.circuit.num_clbits()
    }

    /// The recorded circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The classical memory.
    pub fn memory(&self) -> &ClassicalMemory {
        &self.memory
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shot count used by [`QuantumComputer::run_default`].
    pub fn default_shots(&self) -> u32 {
        self.default_shots
    }

    /// The quantum state, on a state-vector backend.
    pub fn state_vector(&self) -> Option<&StateVector> {
        match &self.backend {
            Backend::StateVector(r) => Some(r.state()),
            Backend::Stabilizer(_) => None,
        }
    }

    /// The stabilizer tableau, on a stabilizer backend.
    pub fn tableau(&self) -> Option<&Tableau> {
        match &self.backend {
            Backend::Stabilizer(r) => Some(r.tableau()),
            Backend::StateVector(_) => None,
        }
    }

    /// The quantum state as a density operator, on a state-vector backend.
    pub fn density_operator(&self) -> Option<DensityOperator> {
        self.state_vector().map(DensityOperator::from_state)
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Record a gate.
    ///
    /// `phases` are in multiples of π and must match the gate's phase
    /// count; an empty slice sets every phase to zero. `clbits` store
    /// measurement outcomes; `control` makes the op run only when that
    /// classical bit is 1. Composite gates are synthesized and the whole
    /// sequence is recorded at once or not at all.
    pub fn add_gate(
        &mut self,
        kind: GateKind,
        qubits: &[QubitId],
        clbits: Option<&[ClbitId]>,
        phases: &[f64],
        control: Option<ClbitId>,
    ) -> QompResult<&mut Self> {
        let expected = kind.num_phases();
        if !phases.is_empty() && phases.len() != expected {
            return Err(IrError::PhaseCountMismatch {
                gate_name: kind.name().to_string(),
                expected,
                got: phases.len(),
            }
            .into());
        }

        let mut op = GateOp::new(kind, qubits.iter().copied())
            .with_phases(phases)
            .with_control(control);
        if let Some(clbits) = clbits {
            op = op.with_clbits(clbits.iter().copied());
        }

        self.circuit.validate(&op)?;
        self.kind.check_ops([&op])?;
        self.kind.check_ops(&synthesis::expand(&op))?;
        self.circuit.push(op)?;
        self.phase = Phase::Building;
        Ok(self)
    }

    /// Record a Z-basis measurement.
    pub fn add_measurement(
        &mut self,
        qubits: &[QubitId],
        clbits: Option<&[ClbitId]>,
        control: Option<ClbitId>,
    ) -> QompResult<&mut Self> {
        self.add_gate(GateKind::Measure, qubits, clbits, &[], control)
    }

    fn gate(&mut self, kind: GateKind, qubits: &[QubitId], phases: &[f64]) -> QompResult<&mut Self> {
        self.add_gate(kind, qubits, None, phases, None)
    }

    /// Apply identity.
    pub fn i(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::I, &[q], &[])
    }

    /// Apply Pauli-X.
    pub fn x(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::X, &[q], &[])
    }

    /// Apply Pauli-Y.
    pub fn y(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Y, &[q], &[])
    }

    /// Apply Pauli-Z.
    pub fn z(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Z, &[q], &[])
    }

    /// Apply Hadamard.
    pub fn h(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::H, &[q], &[])
    }

    /// Apply √X.
    pub fn xr(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::SX, &[q], &[])
    }

    /// Apply √X†.
    pub fn xr_dg(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::SXdg, &[q], &[])
    }

    /// Apply S.
    pub fn s(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::S, &[q], &[])
    }

    /// Apply S†.
    pub fn s_dg(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Sdg, &[q], &[])
    }

    /// Apply T.
    pub fn t(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::T, &[q], &[])
    }

    /// Apply T†.
    pub fn t_dg(&mut self, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Tdg, &[q], &[])
    }

    /// Apply RX(φ).
    pub fn rx(&mut self, phase: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Rx, &[q], &[phase])
    }

    /// Apply RY(φ).
    pub fn ry(&mut self, phase: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Ry, &[q], &[phase])
    }

    /// Apply RZ(φ).
    pub fn rz(&mut self, phase: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Rz, &[q], &[phase])
    }

    /// Apply the phase gate P(φ).
    pub fn p(&mut self, phase: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::P, &[q], &[phase])
    }

    /// Apply U1(λ).
    pub fn u1(&mut self, lambda: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::U1, &[q], &[lambda])
    }

    /// Apply U2(α, β).
    pub fn u2(&mut self, alpha: f64, beta: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::U2, &[q], &[alpha, beta])
    }

    /// Apply U3(α, β, γ).
    pub fn u3(&mut self, alpha: f64, beta: f64, gamma: f64, q: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::U3, &[q], &[alpha, beta, gamma])
    }

    /// Apply CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CX, &[control, target], &[])
    }

    /// Apply controlled-Y.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CY, &[control, target], &[])
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CZ, &[control, target], &[])
    }

    /// Apply controlled-√X.
    pub fn cxr(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CSX, &[control, target], &[])
    }

    /// Apply controlled-√X†.
    pub fn cxr_dg(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CSXdg, &[control, target], &[])
    }

    /// Apply controlled-Hadamard.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CH, &[control, target], &[])
    }

    /// Apply controlled-S.
    pub fn cs(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CS, &[control, target], &[])
    }

    /// Apply controlled-S†.
    pub fn cs_dg(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CSdg, &[control, target], &[])
    }

    /// Apply controlled-T.
    pub fn ct(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CT, &[control, target], &[])
    }

    /// Apply controlled-T†.
    pub fn ct_dg(&mut self, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CTdg, &[control, target], &[])
    }

    /// Apply SWAP.
    pub fn sw(&mut self, q0: QubitId, q1: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::Swap, &[q0, q1], &[])
    }

    /// Apply controlled-P(φ).
    pub fn cp(&mut self, phase: f64, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CP, &[control, target], &[phase])
    }

    /// Apply controlled-RX(φ).
    pub fn crx(&mut self, phase: f64, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CRx, &[control, target], &[phase])
    }

    /// Apply controlled-RY(φ).
    pub fn cry(&mut self, phase: f64, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CRy, &[control, target], &[phase])
    }

    /// Apply controlled-RZ(φ).
    pub fn crz(&mut self, phase: f64, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CRz, &[control, target], &[phase])
    }

    /// Apply controlled-U1(λ).
    pub fn cu1(&mut self, lambda: f64, control: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CU1, &[control, target], &[lambda])
    }

    /// Apply controlled-U2(α, β).
    pub fn cu2(
        &mut self,
        alpha: f64,
        beta: f64,
        control: QubitId,
        target: QubitId,
    ) -> QompResult<&mut Self> {
        self.gate(GateKind::CU2, &[control, target], &[alpha, beta])
    }

    /// Apply controlled-U3(α, β, γ).
    pub fn cu3(
        &mut self,
        alpha: f64,
        beta: f64,
        gamma: f64,
        control: QubitId,
        target: QubitId,
    ) -> QompResult<&mut Self> {
        self.gate(GateKind::CU3, &[control, target], &[alpha, beta, gamma])
    }

    /// Apply Toffoli.
    pub fn ccx(&mut self, c0: QubitId, c1: QubitId, target: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CCX, &[c0, c1, target], &[])
    }

    /// Apply Fredkin: swap `q1` and `q2` when `control` is 1.
    pub fn csw(&mut self, control: QubitId, q1: QubitId, q2: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::CSwap, &[control, q1, q2], &[])
    }

    /// Apply X on `target` when every control is 1.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> QompResult<&mut Self> {
        let qubits: Vec<QubitId> = controls.iter().copied().chain([target]).collect();
        self.gate(GateKind::MCX, &qubits, &[])
    }

    /// Measure `qubits` in the Z basis.
    pub fn measure(&mut self, qubits: &[QubitId]) -> QompResult<&mut Self> {
        self.gate(GateKind::Measure, qubits, &[])
    }

    /// Measure `qubits` in the Z basis and store the outcomes in `clbits`.
    pub fn measure_into(&mut self, qubits: &[QubitId], clbits: &[ClbitId]) -> QompResult<&mut Self> {
        self.add_gate(GateKind::Measure, qubits, Some(clbits), &[], None)
    }

    /// Measure `qubits` in the X basis.
    pub fn mx(&mut self, qubits: &[QubitId]) -> QompResult<&mut Self> {
        self.gate(GateKind::MeasureX, qubits, &[])
    }

    /// Measure `qubits` in the Y basis.
    pub fn my(&mut self, qubits: &[QubitId]) -> QompResult<&mut Self> {
        self.gate(GateKind::MeasureY, qubits, &[])
    }

    /// Measure a qubit pair in the Bell basis.
    pub fn mb(&mut self, q0: QubitId, q1: QubitId) -> QompResult<&mut Self> {
        self.gate(GateKind::MeasureBell, &[q0, q1], &[])
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run the circuit for `shots` shots.
    ///
    /// Nothing is reset afterwards: the qubits keep the last shot's
    /// post-measurement state, the classical memory keeps its last values
    /// and the circuit stays recorded, so a second `run` replays it on
    /// top. Use [`run_with`](Self::run_with) and [`ResetFlags::ALL`] for a
    /// fresh start after the run.
    pub fn run(&mut self, shots: u32) -> QompResult<MeasurementResult> {
        self.run_with(shots, ResetFlags::NONE)
    }

    /// Run the circuit for the configured default shot count. Like
    /// [`run`](Self::run), nothing is reset.
    pub fn run_default(&mut self) -> QompResult<MeasurementResult> {
        self.run_with(self.default_shots, ResetFlags::NONE)
    }

    /// Run the circuit for `shots` shots, then clear what `reset` asks for.
    #[instrument(skip(self))]
    pub fn run_with(&mut self, shots: u32, reset: ResetFlags) -> QompResult<MeasurementResult> {
        let result = self
            .backend
            .runner()
            .run(&self.circuit, &mut self.memory, shots)?;
        self.phase = Phase::Dispatched;
        debug!(
            "Run finished: {} distinct outcomes, last {}",
            result.frequency_map().len(),
            result.last_bitstring()
        );
        self.reset(reset);
        Ok(result)
    }

    /// Clear the pieces of state selected by `flags`.
    pub fn reset(&mut self, flags: ResetFlags) {
        if flags.qubits {
            self.backend.runner().reset_qubits();
        }
        if flags.classical_memory {
            self.memory.clear();
        }
        if flags.circuit {
            self.circuit.clear();
        }
        if flags != ResetFlags::NONE {
            self.phase = if self.circuit.is_empty() {
                Phase::Empty
            } else {
                Phase::Building
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QompError;
    use qomp_ir::qubits;

    #[test]
    fn test_phase_transitions() {
        let mut qc = QuantumComputer::with_seed(1, 0, BackendKind::StateVector, 0).unwrap();
        assert_eq!(qc.phase(), Phase::Empty);
        qc.x(QubitId(0)).unwrap();
        assert_eq!(qc.phase(), Phase::Building);
        qc.run(1).unwrap();
        assert_eq!(qc.phase(), Phase::Dispatched);
        qc.h(QubitId(0)).unwrap();
        assert_eq!(qc.phase(), Phase::Building);
        qc.reset(ResetFlags::ALL);
        assert_eq!(qc.phase(), Phase::Empty);
        assert!(qc.circuit().is_empty());
    }

    #[test]
    fn test_reset_qubits_only_keeps_circuit() {
        let mut qc = QuantumComputer::with_seed(1, 0, BackendKind::StateVector, 0).unwrap();
        qc.x(QubitId(0)).unwrap();
        qc.run_with(
            1,
            ResetFlags {
                qubits: true,
                ..ResetFlags::NONE
            },
        )
        .unwrap();
        assert_eq!(qc.phase(), Phase::Building);
        assert_eq!(qc.circuit().len(), 1);
        assert_eq!(qc.state_vector().unwrap().probabilities()[0], 1.0);
    }

    #[test]
    fn test_phase_count_checked() {
        let mut qc = QuantumComputer::new(1, 0, BackendKind::StateVector).unwrap();
        let err = qc
            .add_gate(GateKind::U2, &qubits(&[0]), None, &[0.5], None)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            QompError::Ir(IrError::PhaseCountMismatch { expected: 2, got: 1, .. })
        ));
        qc.add_gate(GateKind::U2, &qubits(&[0]), None, &[], None).unwrap();
    }

    #[test]
    fn test_config_limits() {
        let config = SimConfig {
            max_qubits: 3,
            ..SimConfig::default()
        };
        assert!(matches!(
            QuantumComputer::from_config(4, 0, &config),
            Err(QompError::Hal(HalError::Configuration(_)))
        ));
        assert!(QuantumComputer::new(0, 0, BackendKind::StateVector).is_err());
    }

    #[test]
    fn test_backend_views() {
        let sv = QuantumComputer::new(1, 0, BackendKind::StateVector).unwrap();
        assert!(sv.state_vector().is_some() && sv.tableau().is_none());
        assert_eq!(sv.density_operator().unwrap().trace().unwrap(), 1.0);

        let stab = QuantumComputer::new(1, 0, BackendKind::Stabilizer).unwrap();
        assert!(stab.tableau().is_some() && stab.density_operator().is_none());
    }
}
