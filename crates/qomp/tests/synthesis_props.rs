//! Truth tables of the synthesized multi-qubit gates.
//!
//! Each case prepares a computational basis state with X gates, applies
//! the composite gate and measures every qubit; the outcome must be the
//! classical image of the input.

use proptest::prelude::*;
use qomp::{BackendKind, QuantumComputer, QubitId};

/// Bit-string of `value` over `width` qubits, qubit 0 first.
fn bits_of(value: usize, width: usize) -> String {
    format!("{value:0width$b}")
}

/// Prepare `input` on `width` qubits, apply `gate`, measure everything and
/// return the single observed outcome.
fn run_on_basis(
    width: u32,
    input: usize,
    gate: impl FnOnce(&mut QuantumComputer),
) -> String {
    let mut qc = QuantumComputer::with_seed(width, 0, BackendKind::StateVector, 9).unwrap();
    for q in 0..width {
        if (input >> (width - 1 - q)) & 1 == 1 {
            qc.x(QubitId(q)).unwrap();
        }
    }
    gate(&mut qc);
    let all: Vec<QubitId> = (0..width).map(QubitId).collect();
    qc.measure(&all).unwrap();

    let result = qc.run(4).unwrap();
    let map = result.frequency_map();
    assert_eq!(map.len(), 1, "outcome not deterministic: {map:?}");
    result.last_bitstring()
}

#[test]
fn toffoli_truth_table() {
    for input in 0..8 {
        let out = run_on_basis(3, input, |qc| {
            qc.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        });
        let expected = if input & 0b110 == 0b110 { input ^ 1 } else { input };
        assert_eq!(out, bits_of(expected, 3), "input {input:03b}");
    }
}

#[test]
fn fredkin_truth_table() {
    for input in 0..8 {
        let out = run_on_basis(3, input, |qc| {
            qc.csw(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        });
        let expected = if input & 0b100 != 0 {
            let (b1, b2) = ((input >> 1) & 1, input & 1);
            0b100 | (b2 << 1) | b1
        } else {
            input
        };
        assert_eq!(out, bits_of(expected, 3), "input {input:03b}");
    }
}

#[test]
fn single_control_mcx_is_cnot() {
    for input in 0..4 {
        let out = run_on_basis(2, input, |qc| {
            qc.mcx(&[QubitId(0)], QubitId(1)).unwrap();
        });
        let expected = if input & 0b10 != 0 { input ^ 1 } else { input };
        assert_eq!(out, bits_of(expected, 2));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn mcx_flips_target_only_when_all_controls_set(
        (m, input) in (2u32..=4).prop_flat_map(|m| (Just(m), 0usize..(1 << (m + 1))))
    ) {
        let width = m + 1;
        let controls: Vec<QubitId> = (0..m).map(QubitId).collect();
        let out = run_on_basis(width, input, |qc| {
            qc.mcx(&controls, QubitId(m)).unwrap();
        });

        let control_mask = ((1usize << m) - 1) << 1;
        let expected = if input & control_mask == control_mask { input ^ 1 } else { input };
        prop_assert_eq!(out, bits_of(expected, width as usize));
    }

    #[test]
    fn mcx_gate_counts(m in 2usize..=5) {
        let controls: Vec<QubitId> = (0..m as u32).map(QubitId).collect();
        let ops = qomp::ir::synthesis::mcx(&controls, QubitId(m as u32));
        let count = |kind| ops.iter().filter(|op| op.kind == kind).count();
        prop_assert_eq!(count(qomp::GateKind::CP), (1 << m) - 1);
        prop_assert_eq!(count(qomp::GateKind::CX), (1 << m) - 2);
        prop_assert_eq!(count(qomp::GateKind::H), 2);
    }
}
