//! State-vector runner.

use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qomp_engine::StateVector;
use qomp_hal::{BackendKind, HalResult, MeasurementBasis, MeasurementResult, Runner};
use qomp_ir::{Circuit, ClassicalMemory, GateKind, GateOp, Unitary2x2};

use crate::tally::Tally;
use crate::{check_run, ids, make_rng, unsupported};

/// Runs circuits on a dense state vector.
///
/// Accepts every catalog gate. Circuits whose measurements are all
/// terminal are evolved once and sampled `shots` times; every other circuit
/// is simulated shot by shot.
pub struct StateVectorRunner {
    state: StateVector,
    rng: StdRng,
}

impl StateVectorRunner {
    /// Create a runner over `num_qubits` qubits in |0...0⟩.
    pub fn new(num_qubits: u32, seed: Option<u64>) -> HalResult<Self> {
        Ok(Self {
            state: StateVector::new(num_qubits as usize)?,
            rng: make_rng(seed),
        })
    }

    /// The current quantum state.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    fn apply_gate(&mut self, op: &GateOp) -> HalResult<()> {
        let ids = ids(op);
        match (op.kind, ids.as_slice()) {
            (GateKind::Swap, &[a, b]) => self.state.apply_swap(a, b),
            (kind, &[q]) if kind.is_single_qubit() => {
                let u = matrix(op)?;
                self.state.apply_single(&u.data, q);
            }
            (kind, &[c, t]) if kind.controlled_base().is_some() => {
                let u = matrix(op)?;
                self.state.apply_controlled(&u.data, c, t);
            }
            _ => return Err(unsupported(op, BackendKind::StateVector)),
        }
        Ok(())
    }

    /// Measure `op` once, collapsing the state; one bit per qubit of `op`.
    fn measure_once(&mut self, op: &GateOp) -> HalResult<Vec<u8>> {
        let ids = ids(op);
        let freq = match (op.kind, ids.as_slice()) {
            (GateKind::MeasureBell, &[q0, q1]) => {
                self.state.measure_bell(&mut self.rng, 1, q0, q1)?
            }
            _ => {
                let axis = op
                    .basis_axis()
                    .ok_or_else(|| unsupported(op, BackendKind::StateVector))?;
                self.state
                    .measure(&mut self.rng, 1, axis.angle, axis.phase, &ids)?
            }
        };
        Ok((0..ids.len()).map(|pos| freq.last_bit(pos)).collect())
    }

    /// Rotate the qubits of a measurement op so that its outcomes read in
    /// the Z basis, or rotate them back.
    fn rotate_basis(&mut self, op: &GateOp, inverse: bool) -> HalResult<()> {
        let ids = ids(op);
        match (op.kind, ids.as_slice()) {
            (GateKind::MeasureBell, &[q0, q1]) => {
                let x = Unitary2x2::for_gate(GateKind::X, &[]).map(|u| u.data);
                let h = Unitary2x2::for_gate(GateKind::H, &[]).map(|u| u.data);
                let (Some(x), Some(h)) = (x, h) else {
                    return Err(unsupported(op, BackendKind::StateVector));
                };
                if inverse {
                    self.state.apply_single(&h, q0);
                    self.state.apply_controlled(&x, q0, q1);
                } else {
                    self.state.apply_controlled(&x, q0, q1);
                    self.state.apply_single(&h, q0);
                }
            }
            _ => {
                let axis = op
                    .basis_axis()
                    .ok_or_else(|| unsupported(op, BackendKind::StateVector))?;
                for q in ids {
                    self.state.basis_change(q, axis.angle, axis.phase, inverse);
                }
            }
        }
        Ok(())
    }

    /// Evolve once, then sample every terminal measurement jointly.
    fn run_sampled(
        &mut self,
        circuit: &Circuit,
        memory: &mut ClassicalMemory,
        shots: u32,
        basis: MeasurementBasis,
    ) -> HalResult<MeasurementResult> {
        let (gates, measurements): (Vec<&GateOp>, Vec<&GateOp>) =
            circuit.ops().iter().partition(|op| !op.is_measurement());

        for op in gates {
            if let Some(addr) = op.control {
                if !memory.is_set(addr)? {
                    continue;
                }
            }
            self.apply_gate(op)?;
        }

        let measured = circuit.measured_qubits();
        if measured.is_empty() {
            let shots = u64::from(shots);
            return MeasurementResult::from_counts(measured, basis, vec![shots], 0, shots);
        }

        for op in &measurements {
            self.rotate_basis(op, false)?;
        }
        let targets: Vec<usize> = measured.iter().map(|q| q.index()).collect();
        let freq = self.state.measure(&mut self.rng, shots, 0.0, 0.0, &targets)?;
        for op in measurements.iter().rev() {
            self.rotate_basis(op, true)?;
        }

        for op in &measurements {
            if let Some(clbits) = &op.clbits {
                for (q, addr) in op.qubits.iter().zip(clbits) {
                    if let Some(pos) = measured.iter().position(|m| m == q) {
                        memory.set(*addr, freq.last_bit(pos))?;
                    }
                }
            }
        }

        MeasurementResult::from_counts(measured, basis, freq.counts, freq.last, u64::from(shots))
    }

    /// Simulate each shot from the dispatch-time state.
    fn run_per_shot(
        &mut self,
        circuit: &Circuit,
        memory: &mut ClassicalMemory,
        shots: u32,
        basis: MeasurementBasis,
    ) -> HalResult<MeasurementResult> {
        let initial_state = self.state.clone();
        let initial_memory = memory.clone();
        let mut tally = Tally::new(circuit);

        for shot in 0..shots {
            if shot > 0 {
                self.state.clone_from(&initial_state);
                memory.clone_from(&initial_memory);
            }
            for op in circuit.ops() {
                if let Some(addr) = op.control {
                    if !memory.is_set(addr)? {
                        continue;
                    }
                }
                if op.is_measurement() {
                    let bits = self.measure_once(op)?;
                    tally.observe(op, &bits, memory)?;
                } else {
                    self.apply_gate(op)?;
                }
            }
            tally.end_shot();

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }

        tally.finish(basis, shots)
    }
}

impl Runner for StateVectorRunner {
    fn kind(&self) -> BackendKind {
        BackendKind::StateVector
    }

    #[instrument(skip(self, circuit, memory))]
    fn run(
        &mut self,
        circuit: &Circuit,
        memory: &mut ClassicalMemory,
        shots: u32,
    ) -> HalResult<MeasurementResult> {
        check_run(circuit, self.state.num_qubits(), shots)?;
        let basis = MeasurementBasis::for_circuit(circuit);
        let sampled = circuit.has_terminal_measurements();
        debug!(
            "Starting state-vector run: {} qubits, {} ops, {} shots, sampled: {}",
            circuit.num_qubits(),
            circuit.len(),
            shots,
            sampled
        );

        if sampled {
            self.run_sampled(circuit, memory, shots, basis)
        } else {
            self.run_per_shot(circuit, memory, shots, basis)
        }
    }

    fn reset_qubits(&mut self) {
        self.state.reset();
    }
}

fn matrix(op: &GateOp) -> HalResult<Unitary2x2> {
    Unitary2x2::for_gate(op.kind, op.params())
        .ok_or_else(|| unsupported(op, BackendKind::StateVector))
}
