//! Per-shot outcome bookkeeping shared by the runners.

use rustc_hash::FxHashMap;

use qomp_hal::{HalResult, MeasurementBasis, MeasurementResult};
use qomp_ir::{Circuit, ClassicalMemory, GateOp, QubitId};

/// Collects shot outcomes over the qubits a circuit measures.
pub(crate) struct Tally {
    qubits: Vec<QubitId>,
    position: FxHashMap<QubitId, usize>,
    frequency: Vec<u64>,
    current: Vec<u8>,
    last: usize,
}

impl Tally {
    pub(crate) fn new(circuit: &Circuit) -> Self {
        let qubits = circuit.measured_qubits();
        let position = qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        Self {
            frequency: vec![0; 1 << qubits.len()],
            current: vec![0; qubits.len()],
            qubits,
            position,
            last: 0,
        }
    }

    /// Record the bits `op` measured, one per qubit of `op`, and store them
    /// in classical memory when the op names target bits.
    pub(crate) fn observe(
        &mut self,
        op: &GateOp,
        bits: &[u8],
        memory: &mut ClassicalMemory,
    ) -> HalResult<()> {
        for (q, bit) in op.qubits.iter().zip(bits) {
            if let Some(&pos) = self.position.get(q) {
                self.current[pos] = *bit;
            }
        }
        if let Some(clbits) = &op.clbits {
            for (addr, bit) in clbits.iter().zip(bits) {
                memory.set(*addr, *bit)?;
            }
        }
        Ok(())
    }

    /// Close the current shot.
    pub(crate) fn end_shot(&mut self) {
        let index = self
            .current
            .iter()
            .fold(0usize, |acc, b| (acc << 1) | usize::from(*b));
        self.frequency[index] += 1;
        self.last = index;
        self.current.fill(0);
    }

    pub(crate) fn finish(self, basis: MeasurementBasis, shots: u32) -> HalResult<MeasurementResult> {
        MeasurementResult::from_counts(
            self.qubits,
            basis,
            self.frequency,
            self.last,
            u64::from(shots),
        )
    }
}
