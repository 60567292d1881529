//! State-vector engine.

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

use crate::bits::{self, MAX_QUBITS, MIN_DOUBLE};
use crate::density::DensityMatrix;
use crate::error::{EngineError, EngineResult};
use crate::gates::{basis_matrix, hadamard, pauli_x};

/// Outcome counts of a sampled measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    /// Measured qubits; the first is the most significant bit of an outcome.
    pub qubits: Vec<usize>,
    /// Count per outcome, `2^k` entries for `k` qubits.
    pub counts: Vec<u64>,
    /// The last sampled outcome; the state was collapsed onto it.
    pub last: usize,
}

impl Frequency {
    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bit of `qubits[pos]` in the last outcome.
    pub fn last_bit(&self, pos: usize) -> u8 {
        let k = self.qubits.len();
        ((self.last >> (k - 1 - pos)) & 1) as u8
    }
}

/// A pure state of `n` qubits as `2^n` complex amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> EngineResult<Self> {
        if num_qubits == 0 {
            return Err(EngineError::Initialization(
                "a state needs at least one qubit".into(),
            ));
        }
        if num_qubits > MAX_QUBITS {
            return Err(EngineError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Create a state from raw amplitudes, normalizing them.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> EngineResult<Self> {
        let num_qubits = bits::qubits_for_dim(amplitudes.len()).ok_or_else(|| {
            EngineError::Initialization(format!(
                "amplitude count {} is not a power of two",
                amplitudes.len()
            ))
        })?;
        let norm = amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        if norm < MIN_DOUBLE {
            return Err(EngineError::Initialization("zero vector".into()));
        }
        Ok(Self {
            amplitudes: amplitudes.into_iter().map(|a| a / norm).collect(),
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// The raw amplitudes.
    pub fn raw_amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Return to |0...0⟩.
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    // =========================================================================
    // Gate application
    // =========================================================================

    /// Apply a 2x2 matrix (row-major) to qubit `q`.
    pub fn apply_single(&mut self, u: &[Complex64; 4], q: usize) {
        let mask = bits::mask(q, self.num_qubits);
        for i in 0..self.dim() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = u[0] * a + u[1] * b;
                self.amplitudes[j] = u[2] * a + u[3] * b;
            }
        }
    }

    /// Apply a 2x2 matrix to `target` on the branch where `control` is 1.
    pub fn apply_controlled(&mut self, u: &[Complex64; 4], control: usize, target: usize) {
        let ctrl_mask = bits::mask(control, self.num_qubits);
        let tgt_mask = bits::mask(target, self.num_qubits);
        for i in 0..self.dim() {
            if i & ctrl_mask != 0 && i & tgt_mask == 0 {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = u[0] * a + u[1] * b;
                self.amplitudes[j] = u[2] * a + u[3] * b;
            }
        }
    }

    /// Exchange two qubits.
    pub fn apply_swap(&mut self, q0: usize, q1: usize) {
        let m0 = bits::mask(q0, self.num_qubits);
        let m1 = bits::mask(q1, self.num_qubits);
        for i in 0..self.dim() {
            if i & m0 != 0 && i & m1 == 0 {
                let j = (i & !m0) | m1;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Apply a `2^k × 2^k` matrix to the qubits `ids`; empty `ids` means
    /// the whole register.
    pub fn apply_matrix(&mut self, matrix: &Array2<Complex64>, ids: &[usize]) -> EngineResult<()> {
        let all: Vec<usize>;
        let ids = if ids.is_empty() {
            all = (0..self.num_qubits).collect();
            &all
        } else {
            ids
        };
        bits::check_ids(ids, self.num_qubits)?;
        let local = 1usize << ids.len();
        let (rows, cols) = matrix.dim();
        if rows != cols || rows != local {
            return Err(EngineError::DimensionMismatch {
                expected: local,
                got: rows.max(cols),
            });
        }

        let masks = bits::masks(ids, self.num_qubits);
        let target_mask: usize = masks.iter().sum();
        let offsets: Vec<usize> = (0..local).map(|l| bits::deposit(l, &masks)).collect();
        let mut buf = vec![Complex64::new(0.0, 0.0); local];
        for base in (0..self.dim()).filter(|b| b & target_mask == 0) {
            for (l, off) in offsets.iter().enumerate() {
                buf[l] = self.amplitudes[base | off];
            }
            for (r, off) in offsets.iter().enumerate() {
                self.amplitudes[base | off] = (0..local).map(|c| matrix[[r, c]] * buf[c]).sum();
            }
        }
        Ok(())
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Rotate qubit `q` so that the measurement axis (`angle`, `phase`, in
    /// multiples of π) lines up with Z, or back again when `inverse` is set.
    pub fn basis_change(&mut self, q: usize, angle: f64, phase: f64, inverse: bool) {
        if angle.abs() < MIN_DOUBLE && phase.abs() < MIN_DOUBLE {
            return;
        }
        let v = basis_matrix(angle, phase);
        if inverse {
            self.apply_single(&v, q);
        } else {
            let v_dg = [v[0].conj(), v[2].conj(), v[1].conj(), v[3].conj()];
            self.apply_single(&v_dg, q);
        }
    }

    /// Marginal Z-basis distribution of `ids`, first id most significant.
    pub fn marginal_probabilities(&self, ids: &[usize]) -> Vec<f64> {
        let masks = bits::masks(ids, self.num_qubits);
        let mut probs = vec![0.0; 1 << ids.len()];
        for (i, amp) in self.amplitudes.iter().enumerate() {
            probs[bits::extract(i, &masks)] += amp.norm_sqr();
        }
        probs
    }

    /// Z-basis probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Sample `shots` outcomes of measuring `ids` along the axis (`angle`,
    /// `phase`), then collapse the state onto the last outcome.
    ///
    /// Empty `ids` measures the whole register.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        shots: u32,
        angle: f64,
        phase: f64,
        ids: &[usize],
    ) -> EngineResult<Frequency> {
        let ids: Vec<usize> = if ids.is_empty() {
            (0..self.num_qubits).collect()
        } else {
            ids.to_vec()
        };
        bits::check_ids(&ids, self.num_qubits)?;

        for &q in &ids {
            self.basis_change(q, angle, phase, false);
        }
        let probs = self.marginal_probabilities(&ids);
        let mut counts = vec![0u64; probs.len()];
        let mut last = 0;
        for _ in 0..shots {
            last = sample(&probs, rng);
            counts[last] += 1;
        }
        if shots > 0 {
            self.collapse(&ids, last);
        }
        for &q in &ids {
            self.basis_change(q, angle, phase, true);
        }

        Ok(Frequency {
            qubits: ids,
            counts,
            last,
        })
    }

    /// Measure a qubit pair in the Bell basis.
    ///
    /// Outcomes: 0 = Φ+, 1 = Ψ+, 2 = Φ−, 3 = Ψ−.
    pub fn measure_bell<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        shots: u32,
        q0: usize,
        q1: usize,
    ) -> EngineResult<Frequency> {
        bits::check_ids(&[q0, q1], self.num_qubits)?;
        let (x, h) = (pauli_x(), hadamard());
        self.apply_controlled(&x, q0, q1);
        self.apply_single(&h, q0);
        let freq = self.measure(rng, shots, 0.0, 0.0, &[q0, q1])?;
        self.apply_single(&h, q0);
        self.apply_controlled(&x, q0, q1);
        Ok(freq)
    }

    /// Project `ids` onto the local outcome `outcome` and renormalize.
    pub fn collapse(&mut self, ids: &[usize], outcome: usize) {
        let masks = bits::masks(ids, self.num_qubits);
        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if bits::extract(i, &masks) == outcome {
                norm_sq += amp.norm_sqr();
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Amplitudes rounded to 8 digits.
    ///
    /// With `ids`, returns the state of those qubits (in the given order)
    /// when they are not entangled with the rest of the register.
    pub fn amplitudes(&self, ids: Option<&[usize]>) -> EngineResult<Vec<Complex64>> {
        let Some(ids) = ids.filter(|ids| !ids.is_empty()) else {
            return Ok(self.amplitudes.iter().copied().map(bits::round_complex).collect());
        };
        bits::check_ids(ids, self.num_qubits)?;

        let masks = bits::masks(ids, self.num_qubits);
        let target_mask: usize = masks.iter().sum();
        let local = 1usize << ids.len();

        // Reduced density matrix of `ids`; the factor exists iff it is pure.
        let mut rho = vec![Complex64::new(0.0, 0.0); local * local];
        for base in (0..self.dim()).filter(|b| b & target_mask == 0) {
            for a in 0..local {
                let amp_a = self.amplitudes[base | bits::deposit(a, &masks)];
                for b in 0..local {
                    let amp_b = self.amplitudes[base | bits::deposit(b, &masks)];
                    rho[a * local + b] += amp_a * amp_b.conj();
                }
            }
        }
        let purity: f64 = (0..local)
            .flat_map(|a| (0..local).map(move |b| (a, b)))
            .map(|(a, b)| (rho[a * local + b] * rho[b * local + a]).re)
            .sum();
        if (purity - 1.0).abs() > MIN_DOUBLE {
            return Err(EngineError::NotSeparable(ids.to_vec()));
        }

        // Read the factor off the dominant slice of the rest.
        let best = (0..self.dim())
            .max_by(|&i, &j| {
                self.amplitudes[i]
                    .norm_sqr()
                    .total_cmp(&self.amplitudes[j].norm_sqr())
            })
            .unwrap_or(0);
        let base = best & !target_mask;
        let slice: Vec<Complex64> = (0..local)
            .map(|l| self.amplitudes[base | bits::deposit(l, &masks)])
            .collect();
        let norm = slice.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        // Fix the global phase so the first non-zero component is real.
        let anchor = slice
            .iter()
            .find(|a| a.norm() > MIN_DOUBLE)
            .map_or(Complex64::new(1.0, 0.0), |a| a / a.norm());
        Ok(slice
            .into_iter()
            .map(|a| bits::round_complex(a / (norm * anchor)))
            .collect())
    }

    /// `⟨self|other⟩`.
    pub fn inner_product(&self, other: &StateVector) -> EngineResult<Complex64> {
        if self.dim() != other.dim() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// `|⟨self|other⟩|²`.
    pub fn fidelity(&self, other: &StateVector) -> EngineResult<f64> {
        self.inner_product(other).map(|ip| bits::round(ip.norm_sqr()))
    }

    /// `⟨ψ|M|ψ⟩` for a Hermitian `matrix` on `ids` (empty = every qubit),
    /// rounded to 8 digits.
    pub fn expect(&self, matrix: &Array2<Complex64>, ids: &[usize]) -> EngineResult<f64> {
        let mut image = self.clone();
        image.apply_matrix(matrix, ids)?;
        let value = self.inner_product(&image)?;
        if value.im.abs() > MIN_DOUBLE {
            return Err(EngineError::NotHermitian { imag: value.im });
        }
        Ok(bits::round(value.re))
    }

    /// Bloch angles `(θ, φ)` of qubit `q` in multiples of π, with
    /// `θ ∈ [0, 1]` and `φ ∈ [0, 2)`, so that the qubit is
    /// `cos(θπ/2)|0⟩ + e^{iφπ} sin(θπ/2)|1⟩` up to a global phase.
    ///
    /// Fails with `NotSeparable` when `q` is entangled. At the poles φ is 0.
    pub fn bloch(&self, q: usize) -> EngineResult<(f64, f64)> {
        let factor = self.amplitudes(Some(&[q]))?;
        let (a, b) = (factor[0], factor[1]);
        let theta = bits::round(2.0 * a.norm().min(1.0).acos() / PI);
        if a.norm() < MIN_DOUBLE || b.norm() < MIN_DOUBLE {
            return Ok((theta, 0.0));
        }
        let phi = bits::round((b.arg() - a.arg()).rem_euclid(2.0 * PI) / PI);
        Ok((theta, if phi >= 2.0 { 0.0 } else { phi }))
    }

    /// `num` copies of the state joined by tensor product. `num` of 0 or 1
    /// gives a copy.
    pub fn composite(&self, num: usize) -> EngineResult<StateVector> {
        let requested = self.num_qubits.saturating_mul(num);
        if requested > MAX_QUBITS {
            return Err(EngineError::TooManyQubits {
                requested,
                max: MAX_QUBITS,
            });
        }
        let mut joined = self.clone();
        for _ in 1..num {
            joined = joined.tensor_product(self)?;
        }
        Ok(joined)
    }

    /// `self ⊗ other`; the qubits of `self` come first.
    pub fn tensor_product(&self, other: &StateVector) -> EngineResult<StateVector> {
        let num_qubits = self.num_qubits + other.num_qubits;
        if num_qubits > MAX_QUBITS {
            return Err(EngineError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let amplitudes = self
            .amplitudes
            .iter()
            .flat_map(|a| other.amplitudes.iter().map(move |b| a * b))
            .collect();
        Ok(StateVector {
            amplitudes,
            num_qubits,
        })
    }

    /// `|ψ⟩⟨ψ|`.
    pub fn to_density(&self) -> DensityMatrix {
        let dim = self.dim();
        let matrix = Array2::from_shape_fn((dim, dim), |(i, j)| {
            self.amplitudes[i] * self.amplitudes[j].conj()
        });
        DensityMatrix::from_parts(matrix, self.num_qubits)
    }
}

/// Draw an index from a (possibly unnormalized) distribution.
pub fn sample<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
    let total: f64 = probs.iter().sum();
    let r = rng.r#gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Rounding can leave r at the very top; fall back to the last
    // outcome with weight.
    probs.iter().rposition(|p| *p > 0.0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn bell() -> StateVector {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_single(&hadamard(), 0);
        sv.apply_controlled(&pauli_x(), 0, 1);
        sv
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2).unwrap();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, Complex64::new(0.0, 0.0))));
        assert!(StateVector::new(0).is_err());
    }

    #[test]
    fn test_qubit_zero_is_msb() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_single(&pauli_x(), 0);
        // |10⟩ is index 2
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let sv = bell();
        let s = FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(s, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(s, 0.0)));
    }

    #[test]
    fn test_apply_matrix_matches_controlled() {
        let o = Complex64::new(1.0, 0.0);
        let z = Complex64::new(0.0, 0.0);
        let cnot = Array2::from_shape_vec(
            (4, 4),
            vec![o, z, z, z, z, o, z, z, z, z, z, o, z, z, o, z],
        )
        .unwrap();
        let mut a = StateVector::new(3).unwrap();
        a.apply_single(&hadamard(), 2);
        let mut b = a.clone();
        a.apply_matrix(&cnot, &[2, 0]).unwrap();
        b.apply_controlled(&pauli_x(), 2, 0);
        assert_eq!(a.amplitudes(None).unwrap(), b.amplitudes(None).unwrap());

        let bad = Array2::<Complex64>::eye(2);
        assert!(matches!(
            a.apply_matrix(&bad, &[0, 1]),
            Err(EngineError::DimensionMismatch { expected: 4, got: 2 })
        ));
    }

    #[test]
    fn test_swap() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_single(&pauli_x(), 0);
        sv.apply_swap(0, 1);
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_measure_bell_state_correlated() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sv = bell();
        let freq = sv.measure(&mut rng, 100, 0.0, 0.0, &[0, 1]).unwrap();
        assert_eq!(freq.total(), 100);
        assert_eq!(freq.counts[1] + freq.counts[2], 0);
        // collapsed onto the last outcome
        let p = sv.probabilities();
        assert!((p[freq.last] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_measure_x_and_y_bases() {
        let mut rng = StdRng::seed_from_u64(11);
        let freq = bell().measure(&mut rng, 200, 0.5, 0.0, &[0, 1]).unwrap();
        assert_eq!(freq.counts[1] + freq.counts[2], 0);

        let freq = bell().measure(&mut rng, 200, 0.5, 0.5, &[0, 1]).unwrap();
        assert_eq!(freq.counts[0] + freq.counts[3], 0);
    }

    #[test]
    fn test_measure_plus_in_x_basis_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sv = StateVector::new(1).unwrap();
        sv.apply_single(&hadamard(), 0);
        let freq = sv.measure(&mut rng, 50, 0.5, 0.0, &[]).unwrap();
        assert_eq!(freq.counts, vec![50, 0]);
        // state restored to |+⟩ after measuring along its own axis
        let s = FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(s, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(s, 0.0)));
    }

    #[test]
    fn test_measure_bell_basis() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sv = bell();
        let freq = sv.measure_bell(&mut rng, 10, 0, 1).unwrap();
        assert_eq!(freq.counts, vec![10, 0, 0, 0]);
        assert_eq!(sv.amplitudes(None).unwrap(), bell().amplitudes(None).unwrap());
    }

    #[test]
    fn test_separable_amplitudes() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_single(&hadamard(), 1);
        let q1 = sv.amplitudes(Some(&[1])).unwrap();
        let s = bits::round(FRAC_1_SQRT_2);
        assert_eq!(q1, vec![Complex64::new(s, 0.0), Complex64::new(s, 0.0)]);
        assert!(matches!(
            bell().amplitudes(Some(&[0])),
            Err(EngineError::NotSeparable(_))
        ));
    }

    #[test]
    fn test_inner_product_and_tensor() {
        let zero = StateVector::new(1).unwrap();
        let mut one = StateVector::new(1).unwrap();
        one.apply_single(&pauli_x(), 0);
        assert!(approx_eq(zero.inner_product(&one).unwrap(), Complex64::new(0.0, 0.0)));
        assert_eq!(zero.fidelity(&zero).unwrap(), 1.0);

        let joined = one.tensor_product(&zero).unwrap();
        assert_eq!(joined.num_qubits(), 2);
        assert!(approx_eq(joined.amplitudes[2], Complex64::new(1.0, 0.0)));
        assert!(zero.inner_product(&joined).is_err());
    }

    fn z_matrix() -> Array2<Complex64> {
        let o = Complex64::new(1.0, 0.0);
        let z = Complex64::new(0.0, 0.0);
        Array2::from_shape_vec((2, 2), vec![o, z, z, -o]).unwrap()
    }

    #[test]
    fn test_bloch_angles() {
        let mut sv = StateVector::new(3).unwrap();
        sv.apply_single(&pauli_x(), 1);
        sv.apply_single(&hadamard(), 2);
        assert_eq!(sv.bloch(0).unwrap(), (0.0, 0.0));
        assert_eq!(sv.bloch(1).unwrap(), (1.0, 0.0));
        assert_eq!(sv.bloch(2).unwrap(), (0.5, 0.0));

        // V(½, ½)|0⟩ = |+i⟩
        let mut plus_i = StateVector::new(1).unwrap();
        plus_i.apply_single(&basis_matrix(0.5, 0.5), 0);
        assert_eq!(plus_i.bloch(0).unwrap(), (0.5, 0.5));

        // |−i⟩ sits at φ = 3/2
        let mut minus_i = StateVector::new(1).unwrap();
        minus_i.apply_single(&basis_matrix(0.5, 1.5), 0);
        assert_eq!(minus_i.bloch(0).unwrap(), (0.5, 1.5));

        assert!(matches!(bell().bloch(0), Err(EngineError::NotSeparable(_))));
        assert!(sv.bloch(3).is_err());
    }

    #[test]
    fn test_expect() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply_single(&pauli_x(), 1);
        assert_eq!(sv.expect(&z_matrix(), &[0]).unwrap(), 1.0);
        assert_eq!(sv.expect(&z_matrix(), &[1]).unwrap(), -1.0);

        let zz = crate::density::kron(&z_matrix(), &z_matrix());
        assert_eq!(bell().expect(&zz, &[0, 1]).unwrap(), 1.0);
        assert_eq!(bell().expect(&zz, &[]).unwrap(), 1.0);
        assert_eq!(bell().expect(&z_matrix(), &[0]).unwrap(), 0.0);

        let i_times_identity = Array2::from_diag_elem(2, Complex64::new(0.0, 1.0));
        assert!(matches!(
            sv.expect(&i_times_identity, &[0]),
            Err(EngineError::NotHermitian { .. })
        ));
        assert!(sv.expect(&zz, &[0]).is_err());
    }

    #[test]
    fn test_composite() {
        let mut plus = StateVector::new(1).unwrap();
        plus.apply_single(&hadamard(), 0);
        let three = plus.composite(3).unwrap();
        assert_eq!(three.num_qubits(), 3);
        let amp = bits::round(1.0 / 8f64.sqrt());
        assert!(three
            .amplitudes(None)
            .unwrap()
            .iter()
            .all(|a| *a == Complex64::new(amp, 0.0)));
        assert_eq!(plus.composite(0).unwrap(), plus);
        assert_eq!(plus.composite(1).unwrap(), plus);
        assert!(matches!(
            plus.composite(MAX_QUBITS + 1),
            Err(EngineError::TooManyQubits { .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_normalizes() {
        let sv = StateVector::from_amplitudes(vec![Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)])
            .unwrap();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.6, 0.0)));
        assert!(StateVector::from_amplitudes(vec![Complex64::new(0.0, 0.0); 2]).is_err());
        assert!(StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).is_err());
    }

    #[test]
    fn test_sample_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(sample(&[0.0, 1.0], &mut rng), 1);
        }
    }
}
