//! Circuits shared by the demo binaries.

use qomp::{ClbitId, GateKind, QompResult, QuantumComputer, QubitId};

/// Entangle `q0` and `q1` into Φ+.
pub fn bell(qc: &mut QuantumComputer, q0: QubitId, q1: QubitId) -> QompResult<()> {
    qc.h(q0)?.cx(q0, q1)?;
    Ok(())
}

/// Prepare an `n`-qubit GHZ state on qubits `0..n`.
pub fn ghz(qc: &mut QuantumComputer, n: u32) -> QompResult<()> {
    qc.h(QubitId(0))?;
    for i in 1..n {
        qc.cx(QubitId(i - 1), QubitId(i))?;
    }
    Ok(())
}

/// Teleport `Ry(angle·π)|0⟩` from qubit 0 to qubit 2.
///
/// Needs three qubits and two classical bits. The corrections on qubit 2
/// are gated on the measured bits, so the protocol succeeds on every shot.
pub fn teleport(qc: &mut QuantumComputer, angle: f64) -> QompResult<()> {
    let [q0, q1, q2] = [QubitId(0), QubitId(1), QubitId(2)];
    qc.ry(angle, q0)?;
    bell(qc, q1, q2)?;
    qc.cx(q0, q1)?.h(q0)?;
    qc.measure_into(&[q0, q1], &[ClbitId(0), ClbitId(1)])?;
    qc.add_gate(GateKind::X, &[q2], None, &[], Some(ClbitId(1)))?;
    qc.add_gate(GateKind::Z, &[q2], None, &[], Some(ClbitId(0)))?;
    Ok(())
}
