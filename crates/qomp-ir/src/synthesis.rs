//! Composite gate synthesis.
//!
//! Toffoli, Fredkin and multi-controlled X gates are rewritten into the
//! catalog's one- and two-qubit gates:
//!
//!   CCX(a, b, t) = CXR(b, t) · CX(a, b) · CXR†(b, t) · CX(a, b) · CXR(a, t)
//!   CSW(a, b, c) = CX(c, b) · CCX(a, b, c) · CX(c, b)
//!
//! The multi-controlled X walks the reflected binary (Gray) code over the
//! controls, applying a controlled phase of `±π/2^(m-1)` per code word with
//! CNOTs that keep the running parity on the code's most significant bit:
//! `2^m - 1` controlled phases and `2^m - 2` CNOTs for `m` controls.
//!
//! The functions here do not validate their ids; callers validate the
//! composite op first.

use crate::gate::GateKind;
use crate::instruction::GateOp;
use crate::qubit::QubitId;

/// Toffoli as five two-qubit gates.
pub fn ccx(c0: QubitId, c1: QubitId, target: QubitId) -> Vec<GateOp> {
    vec![
        GateOp::two(GateKind::CSX, c1, target),
        GateOp::two(GateKind::CX, c0, c1),
        GateOp::two(GateKind::CSXdg, c1, target),
        GateOp::two(GateKind::CX, c0, c1),
        GateOp::two(GateKind::CSX, c0, target),
    ]
}

/// Fredkin: swap `q1` and `q2` when `control` is set.
pub fn csw(control: QubitId, q1: QubitId, q2: QubitId) -> Vec<GateOp> {
    let mut ops = Vec::with_capacity(7);
    ops.push(GateOp::two(GateKind::CX, q2, q1));
    ops.extend(ccx(control, q1, q2));
    ops.push(GateOp::two(GateKind::CX, q2, q1));
    ops
}

/// Index of the highest set bit. `n` must be non-zero.
#[inline]
fn highest_bit(n: usize) -> usize {
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

/// Multi-controlled X over `controls` onto `target`.
pub fn mcx(controls: &[QubitId], target: QubitId) -> Vec<GateOp> {
    let m = controls.len();
    if m == 0 {
        return vec![GateOp::single(GateKind::X, target)];
    }

    let mut ops = Vec::with_capacity(2usize << m);
    ops.push(GateOp::single(GateKind::H, target));

    let mut psi = 1.0 / f64::from(1u32 << (m - 1));
    let mut previous = 0usize;
    for k in 1..(1usize << m) {
        let gray = k ^ (k >> 1);
        let msb = highest_bit(gray);
        let mut chb = highest_bit(gray ^ previous);
        if gray != 1 {
            if chb == msb {
                chb -= 1;
            }
            ops.push(GateOp::two(GateKind::CX, controls[chb], controls[msb]));
        }
        ops.push(GateOp::two(GateKind::CP, controls[msb], target).with_phases(&[psi]));
        psi = -psi;
        previous = gray;
    }

    ops.push(GateOp::single(GateKind::H, target));
    ops
}

/// Expand a composite op into elementary ops that inherit its classical
/// control. Non-composite ops are returned unchanged.
pub fn expand(op: &GateOp) -> Vec<GateOp> {
    let q = &op.qubits;
    let ops = match op.kind {
        GateKind::CCX => ccx(q[0], q[1], q[2]),
        GateKind::CSwap => csw(q[0], q[1], q[2]),
        GateKind::MCX => match q.split_last() {
            Some((target, controls)) => mcx(controls, *target),
            None => Vec::new(),
        },
        _ => return vec![op.clone()],
    };
    ops.into_iter()
        .map(|o| o.with_control(op.control))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::qubits;

    fn count(ops: &[GateOp], kind: GateKind) -> usize {
        ops.iter().filter(|o| o.kind == kind).count()
    }

    #[test]
    fn test_ccx_sequence() {
        let ops = ccx(QubitId(0), QubitId(1), QubitId(2));
        let kinds: Vec<_> = ops.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GateKind::CSX,
                GateKind::CX,
                GateKind::CSXdg,
                GateKind::CX,
                GateKind::CSX
            ]
        );
        assert_eq!(ops[4].qubits, qubits(&[0, 2]));
    }

    #[test]
    fn test_csw_wraps_toffoli() {
        let ops = csw(QubitId(0), QubitId(1), QubitId(2));
        assert_eq!(ops.len(), 7);
        assert_eq!(ops[0].qubits, qubits(&[2, 1]));
        assert_eq!(ops[6].qubits, qubits(&[2, 1]));
    }

    #[test]
    fn test_mcx_gate_counts() {
        for m in 1..=5u32 {
            let controls: Vec<_> = (0..m).map(QubitId).collect();
            let ops = mcx(&controls, QubitId(m));
            let cp = count(&ops, GateKind::CP);
            let cx = count(&ops, GateKind::CX);
            assert_eq!(cp, (1 << m) - 1, "m = {m}");
            assert_eq!(cx, (1 << m) - 2, "m = {m}");
            assert_eq!(count(&ops, GateKind::H), 2);
        }
    }

    #[test]
    fn test_mcx_phases_alternate() {
        let ops = mcx(&qubits(&[0, 1, 2]), QubitId(3));
        let phases: Vec<f64> = ops
            .iter()
            .filter(|o| o.kind == GateKind::CP)
            .map(|o| o.phases[0])
            .collect();
        assert_eq!(phases.len(), 7);
        for (i, p) in phases.iter().enumerate() {
            let expected = if i % 2 == 0 { 0.25 } else { -0.25 };
            assert!((p - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_expand_propagates_control() {
        use crate::qubit::ClbitId;
        let op = GateOp::new(GateKind::MCX, qubits(&[0, 1, 2])).with_control(Some(ClbitId(1)));
        let ops = expand(&op);
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|o| o.control == Some(ClbitId(1))));

        let h = GateOp::single(GateKind::H, QubitId(0));
        assert_eq!(expand(&h), vec![h]);
    }
}
