//! Stabilizer runner.

use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qomp_engine::Tableau;
use qomp_hal::{BackendKind, HalResult, MeasurementBasis, MeasurementResult, Runner};
use qomp_ir::{Circuit, ClassicalMemory, GateKind, GateOp};

use crate::tally::Tally;
use crate::{check_run, ids, make_rng, unsupported};

/// Runs Clifford circuits on a CHP tableau.
///
/// Tableau measurements collapse as they go, so every shot is simulated
/// from the dispatch-time state.
pub struct StabilizerRunner {
    tableau: Tableau,
    rng: StdRng,
}

impl StabilizerRunner {
    /// Create a runner over `num_qubits` qubits in |0...0⟩.
    pub fn new(num_qubits: u32, seed: Option<u64>) -> HalResult<Self> {
        Ok(Self {
            tableau: Tableau::new(num_qubits as usize)?,
            rng: make_rng(seed),
        })
    }

    /// The current tableau.
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    fn apply_gate(&mut self, op: &GateOp) -> HalResult<()> {
        let t = &mut self.tableau;
        match (op.kind, ids(op).as_slice()) {
            (GateKind::I, &[_]) => {}
            (GateKind::X, &[q]) => {
                t.x(q)?;
            }
            (GateKind::Y, &[q]) => {
                t.y(q)?;
            }
            (GateKind::Z, &[q]) => {
                t.z(q)?;
            }
            (GateKind::H, &[q]) => {
                t.h(q)?;
            }
            (GateKind::S, &[q]) => {
                t.s(q)?;
            }
            (GateKind::Sdg, &[q]) => {
                t.sdg(q)?;
            }
            (GateKind::CX, &[c, q]) => {
                t.cx(c, q)?;
            }
            (GateKind::CY, &[c, q]) => {
                t.cy(c, q)?;
            }
            (GateKind::CZ, &[c, q]) => {
                t.cz(c, q)?;
            }
            (GateKind::Swap, &[a, b]) => {
                t.swap(a, b)?;
            }
            _ => return Err(unsupported(op, BackendKind::Stabilizer)),
        }
        Ok(())
    }

    /// Measure `op` once; one bit per qubit of `op`.
    fn measure_once(&mut self, op: &GateOp) -> HalResult<Vec<u8>> {
        let ids = ids(op);
        let t = &mut self.tableau;
        let rng = &mut self.rng;
        let mut bits = Vec::with_capacity(ids.len());
        match (op.kind, ids.as_slice()) {
            (GateKind::Measure, _) => {
                for &q in &ids {
                    bits.push(t.measure(q, rng)?.bit());
                }
            }
            (GateKind::MeasureX, _) => {
                for &q in &ids {
                    t.h(q)?;
                    bits.push(t.measure(q, rng)?.bit());
                    t.h(q)?;
                }
            }
            (GateKind::MeasureY, _) => {
                for &q in &ids {
                    t.sdg(q)?.h(q)?;
                    bits.push(t.measure(q, rng)?.bit());
                    t.h(q)?.s(q)?;
                }
            }
            (GateKind::MeasureBell, &[q0, q1]) => {
                t.cx(q0, q1)?.h(q0)?;
                bits.push(t.measure(q0, rng)?.bit());
                bits.push(t.measure(q1, rng)?.bit());
                t.h(q0)?.cx(q0, q1)?;
            }
            _ => return Err(unsupported(op, BackendKind::Stabilizer)),
        }
        Ok(bits)
    }
}

impl Runner for StabilizerRunner {
    fn kind(&self) -> BackendKind {
        BackendKind::Stabilizer
    }

    #[instrument(skip(self, circuit, memory))]
    fn run(
        &mut self,
        circuit: &Circuit,
        memory: &mut ClassicalMemory,
        shots: u32,
    ) -> HalResult<MeasurementResult> {
        check_run(circuit, self.tableau.num_qubits(), shots)?;
        BackendKind::Stabilizer.check_ops(circuit.ops())?;
        debug!(
            "Starting stabilizer run: {} qubits, {} ops, {} shots",
            circuit.num_qubits(),
            circuit.len(),
            shots
        );

        let basis = MeasurementBasis::for_circuit(circuit);
        let initial_tableau = self.tableau.clone();
        let initial_memory = memory.clone();
        let mut tally = Tally::new(circuit);

        for shot in 0..shots {
            if shot > 0 {
                self.tableau.clone_from(&initial_tableau);
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

    fn reset_qubits(&mut self) {
        self.tableau.reset();
    }
}
