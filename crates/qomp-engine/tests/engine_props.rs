//! Property-based tests for the state-vector, density-matrix and tableau
//! engines.

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qomp_engine::gates::hadamard;
use qomp_engine::{DensityMatrix, Outcome, StateVector, Tableau};
use rand::SeedableRng;
use rand::rngs::StdRng;

const WIDTH: usize = 3;

/// A normalized three-qubit pure state.
fn arb_state() -> impl Strategy<Value = StateVector> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << WIDTH).prop_map(|parts| {
        let mut amps: Vec<Complex64> = parts
            .into_iter()
            .map(|(re, im)| Complex64::new(re, im))
            .collect();
        amps[0] += Complex64::new(2.0, 0.0);
        StateVector::from_amplitudes(amps).unwrap()
    })
}

/// A mixture of up to three random pure states.
fn arb_density() -> impl Strategy<Value = DensityMatrix> {
    prop::collection::vec((arb_state(), 0.05f64..1.0), 1..4).prop_map(|ensemble| {
        let total: f64 = ensemble.iter().map(|(_, p)| p).sum();
        let mut rho = DensityMatrix::new(WIDTH).unwrap();
        rho.scale(0.0);
        for (state, p) in &ensemble {
            let mut term = state.to_density();
            term.scale(p / total);
            rho.add(&term).unwrap();
        }
        rho
    })
}

fn pauli_z() -> Array2<Complex64> {
    let o = Complex64::new(1.0, 0.0);
    let z = Complex64::new(0.0, 0.0);
    Array2::from_shape_vec((2, 2), vec![o, z, z, -o]).unwrap()
}

#[derive(Debug, Clone)]
enum Clifford {
    H(usize),
    S(usize),
    X(usize),
    Cx(usize, usize),
}

fn arb_clifford() -> impl Strategy<Value = Clifford> {
    prop_oneof![
        (0..WIDTH).prop_map(Clifford::H),
        (0..WIDTH).prop_map(Clifford::S),
        (0..WIDTH).prop_map(Clifford::X),
        (0..WIDTH, 1..WIDTH).prop_map(|(a, d)| Clifford::Cx(a, (a + d) % WIDTH)),
    ]
}

fn prepare(gates: &[Clifford]) -> Tableau {
    let mut t = Tableau::new(WIDTH).unwrap();
    for gate in gates {
        match *gate {
            Clifford::H(a) => t.h(a),
            Clifford::S(a) => t.s(a),
            Clifford::X(a) => t.x(a),
            Clifford::Cx(a, b) => t.cx(a, b),
        }
        .unwrap();
    }
    t
}

proptest! {
    #[test]
    fn partial_trace_keeps_unit_trace(rho in arb_density(), discard in 0..WIDTH) {
        prop_assert!((rho.trace().re - 1.0).abs() < 1e-9);
        let reduced = rho.partial_trace(&[discard]).unwrap();
        prop_assert_eq!(reduced.num_qubits(), WIDTH - 1);
        prop_assert!((reduced.trace().re - 1.0).abs() < 1e-9);
        prop_assert!(reduced.trace().im.abs() < 1e-9);
    }

    #[test]
    fn z_expectation_matches_marginals(state in arb_state(), q in 0..WIDTH) {
        let p = state.marginal_probabilities(&[q]);
        let z = state.expect(&pauli_z(), &[q]).unwrap();
        prop_assert!((z - (p[0] - p[1])).abs() < 1e-7);
    }

    #[test]
    fn bloch_angles_recover_the_preparation(theta in 0.01f64..0.99, phi in 0.01f64..1.99) {
        let (s, c) = (theta * PI / 2.0).sin_cos();
        let state = StateVector::from_amplitudes(vec![
            Complex64::new(c, 0.0),
            Complex64::from_polar(s, phi * PI),
        ])
        .unwrap();
        let (t, p) = state.bloch(0).unwrap();
        prop_assert!((t - theta).abs() < 1e-6);
        prop_assert!((p - phi).abs() < 1e-6);
    }

    #[test]
    fn hadamard_twice_is_deterministic(
        gates in prop::collection::vec(arb_clifford(), 0..12),
        q in 0..WIDTH,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = prepare(&gates);
        // collapse q, then H·H must leave it determined
        let first = t.measure(q, &mut rng).unwrap().bit();
        t.h(q).unwrap().h(q).unwrap();
        prop_assert_eq!(t.measure(q, &mut rng).unwrap(), Outcome::Determined(first));
    }

    #[test]
    fn tableau_probability_matches_state_vector(
        gates in prop::collection::vec(arb_clifford(), 0..12),
        q in 0..WIDTH,
    ) {
        let t = prepare(&gates);
        let mut sv = StateVector::new(WIDTH).unwrap();
        let o = Complex64::new(1.0, 0.0);
        let z = Complex64::new(0.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let x = [z, o, o, z];
        let s = [o, z, z, i];
        for gate in &gates {
            match *gate {
                Clifford::H(a) => sv.apply_single(&hadamard(), a),
                Clifford::S(a) => sv.apply_single(&s, a),
                Clifford::X(a) => sv.apply_single(&x, a),
                Clifford::Cx(a, b) => sv.apply_controlled(&x, a, b),
            }
        }
        let p_one = sv.marginal_probabilities(&[q])[1];
        prop_assert!((t.probability_of_one(q).unwrap() - p_one).abs() < 1e-9);
    }
}
