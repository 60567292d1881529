//! Stabilizer tableau (Aaronson–Gottesman CHP).
//!
//! Rows `0..n` are destabilizers, rows `n..2n` stabilizers and row `2n` is
//! scratch space for deterministic measurements. Each row stores the X and
//! Z bits of an `n`-qubit Pauli operator plus a sign bit. Clifford gates
//! update the tableau column-wise in `O(n)`; measurement is `O(n²)`.

use rand::Rng;

use crate::bits;
use crate::error::{EngineError, EngineResult};

/// How a Z-basis measurement on a tableau was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Deterministic result.
    Determined(u8),
    /// Uniformly random result.
    Random(u8),
}

impl Outcome {
    /// The measured bit.
    pub fn bit(self) -> u8 {
        match self {
            Outcome::Determined(b) | Outcome::Random(b) => b,
        }
    }
}

/// Stabilizer state of `n` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tableau {
    n: usize,
    x: Vec<bool>,
    z: Vec<bool>,
    r: Vec<bool>,
}

impl Tableau {
    /// Create a tableau for |0...0⟩.
    pub fn new(num_qubits: usize) -> EngineResult<Self> {
        if num_qubits == 0 {
            return Err(EngineError::Initialization(
                "a tableau needs at least one qubit".into(),
            ));
        }
        let n = num_qubits;
        let rows = 2 * n + 1;
        let mut tableau = Self {
            n,
            x: vec![false; rows * n],
            z: vec![false; rows * n],
            r: vec![false; rows],
        };
        for i in 0..n {
            tableau.x[i * n + i] = true;
            tableau.z[(i + n) * n + i] = true;
        }
        Ok(tableau)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.n
    }

    /// Return to |0...0⟩.
    pub fn reset(&mut self) {
        let n = self.n;
        self.x.fill(false);
        self.z.fill(false);
        self.r.fill(false);
        for i in 0..n {
            self.x[i * n + i] = true;
            self.z[(i + n) * n + i] = true;
        }
    }

    #[inline]
    fn xi(&self, row: usize, q: usize) -> bool {
        self.x[row * self.n + q]
    }

    #[inline]
    fn zi(&self, row: usize, q: usize) -> bool {
        self.z[row * self.n + q]
    }

    fn check(&self, ids: &[usize]) -> EngineResult<()> {
        bits::check_ids(ids, self.n)
    }

    // =========================================================================
    // Generators
    // =========================================================================

    /// Hadamard on `a`.
    pub fn h(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.check(&[a])?;
        let n = self.n;
        for i in 0..2 * n {
            let (xa, za) = (self.xi(i, a), self.zi(i, a));
            self.r[i] ^= xa && za;
            self.x[i * n + a] = za;
            self.z[i * n + a] = xa;
        }
        Ok(self)
    }

    /// Phase gate S on `a`.
    pub fn s(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.check(&[a])?;
        let n = self.n;
        for i in 0..2 * n {
            let (xa, za) = (self.xi(i, a), self.zi(i, a));
            self.r[i] ^= xa && za;
            self.z[i * n + a] = za ^ xa;
        }
        Ok(self)
    }

    /// CNOT with control `a` and target `b`.
    pub fn cx(&mut self, a: usize, b: usize) -> EngineResult<&mut Self> {
        self.check(&[a, b])?;
        let n = self.n;
        for i in 0..2 * n {
            let (xa, za) = (self.xi(i, a), self.zi(i, a));
            let (xb, zb) = (self.xi(i, b), self.zi(i, b));
            self.r[i] ^= xa && zb && !(xb ^ za);
            self.x[i * n + b] = xb ^ xa;
            self.z[i * n + a] = za ^ zb;
        }
        Ok(self)
    }

    // =========================================================================
    // Derived Clifford gates
    // =========================================================================

    /// Pauli Z = S².
    pub fn z(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.s(a)?.s(a)
    }

    /// Pauli X = H·Z·H.
    pub fn x(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.h(a)?.z(a)?.h(a)
    }

    /// Pauli Y, equal to X·Z up to a global phase.
    pub fn y(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.z(a)?.x(a)
    }

    /// S† = S³.
    pub fn sdg(&mut self, a: usize) -> EngineResult<&mut Self> {
        self.s(a)?.s(a)?.s(a)
    }

    /// Controlled-Z.
    pub fn cz(&mut self, a: usize, b: usize) -> EngineResult<&mut Self> {
        self.check(&[a, b])?;
        self.h(b)?.cx(a, b)?.h(b)
    }

    /// Controlled-Y.
    pub fn cy(&mut self, a: usize, b: usize) -> EngineResult<&mut Self> {
        self.check(&[a, b])?;
        self.sdg(b)?.cx(a, b)?.s(b)
    }

    /// SWAP.
    pub fn swap(&mut self, a: usize, b: usize) -> EngineResult<&mut Self> {
        self.check(&[a, b])?;
        self.cx(a, b)?.cx(b, a)?.cx(a, b)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure qubit `a` in the Z basis, collapsing the tableau.
    pub fn measure<R: Rng + ?Sized>(&mut self, a: usize, rng: &mut R) -> EngineResult<Outcome> {
        self.check(&[a])?;
        let n = self.n;

        if let Some(p) = (n..2 * n).find(|&p| self.xi(p, a)) {
            for i in 0..2 * n {
                if i != p && self.xi(i, a) {
                    self.rowsum(i, p);
                }
            }
            self.copy_row(p, p - n);
            for q in 0..n {
                self.x[p * n + q] = false;
                self.z[p * n + q] = q == a;
            }
            let bit = rng.r#gen::<bool>();
            self.r[p] = bit;
            return Ok(Outcome::Random(u8::from(bit)));
        }
        Ok(Outcome::Determined(u8::from(self.determined_bit(a))))
    }

    /// Probability that measuring `a` in the Z basis yields 1, without
    /// disturbing the state. Always 0, 1/2 or 1.
    pub fn probability_of_one(&self, a: usize) -> EngineResult<f64> {
        self.check(&[a])?;
        if (self.n..2 * self.n).any(|p| self.xi(p, a)) {
            return Ok(0.5);
        }
        let mut scratch = self.clone();
        Ok(if scratch.determined_bit(a) { 1.0 } else { 0.0 })
    }

    /// Outcome of a Z measurement on `a` when no stabilizer anticommutes
    /// with it. Only the scratch row changes.
    fn determined_bit(&mut self, a: usize) -> bool {
        let n = self.n;
        let scratch = 2 * n;
        for q in 0..n {
            self.x[scratch * n + q] = false;
            self.z[scratch * n + q] = false;
        }
        self.r[scratch] = false;
        for i in 0..n {
            if self.xi(i, a) {
                self.rowsum(scratch, i + n);
            }
        }
        self.r[scratch]
    }

    fn copy_row(&mut self, dst: usize, src: usize) {
        let n = self.n;
        for q in 0..n {
            self.x[dst * n + q] = self.x[src * n + q];
            self.z[dst * n + q] = self.z[src * n + q];
        }
        self.r[dst] = self.r[src];
    }

    /// Left-multiply row `h` by row `i`.
    fn rowsum(&mut self, h: usize, i: usize) {
        let n = self.n;
        let mut sum: i32 = 2 * i32::from(self.r[h]) + 2 * i32::from(self.r[i]);
        for q in 0..n {
            sum += g(self.xi(i, q), self.zi(i, q), self.xi(h, q), self.zi(h, q));
        }
        self.r[h] = sum.rem_euclid(4) == 2;
        for q in 0..n {
            self.x[h * n + q] ^= self.x[i * n + q];
            self.z[h * n + q] ^= self.z[i * n + q];
        }
    }
}

/// Exponent of `i` picked up when multiplying the single-qubit Paulis
/// `(x1, z1)·(x2, z2)`.
fn g(x1: bool, z1: bool, x2: bool, z2: bool) -> i32 {
    let (x2, z2) = (i32::from(x2), i32::from(z2));
    match (x1, z1) {
        (false, false) => 0,
        (true, true) => z2 - x2,
        (true, false) => z2 * (2 * x2 - 1),
        (false, true) => x2 * (1 - 2 * z2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_initial_measurements_are_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut t = Tableau::new(3).unwrap();
        for q in 0..3 {
            assert_eq!(t.measure(q, &mut rng).unwrap(), Outcome::Determined(0));
        }
    }

    #[test]
    fn test_x_flips() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut t = Tableau::new(2).unwrap();
        t.x(1).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap(), Outcome::Determined(0));
        assert_eq!(t.measure(1, &mut rng).unwrap(), Outcome::Determined(1));

        t.y(1).unwrap();
        assert_eq!(t.measure(1, &mut rng).unwrap().bit(), 0);
    }

    #[test]
    fn test_bell_pair_is_correlated() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let mut t = Tableau::new(2).unwrap();
            t.h(0).unwrap().cx(0, 1).unwrap();
            let first = t.measure(0, &mut rng).unwrap();
            assert!(matches!(first, Outcome::Random(_)));
            let second = t.measure(1, &mut rng).unwrap();
            assert_eq!(second, Outcome::Determined(first.bit()));
        }
    }

    #[test]
    fn test_hzh_is_x() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = Tableau::new(1).unwrap();
        t.h(0).unwrap().z(0).unwrap().h(0).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap(), Outcome::Determined(1));
    }

    #[test]
    fn test_s_twice_on_plus_gives_minus() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = Tableau::new(1).unwrap();
        t.h(0).unwrap().s(0).unwrap().s(0).unwrap().h(0).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap(), Outcome::Determined(1));

        let mut t = Tableau::new(1).unwrap();
        t.h(0).unwrap().s(0).unwrap().sdg(0).unwrap().h(0).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap(), Outcome::Determined(0));
    }

    #[test]
    fn test_swap_and_cz() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = Tableau::new(2).unwrap();
        t.x(0).unwrap().swap(0, 1).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap().bit(), 0);
        assert_eq!(t.measure(1, &mut rng).unwrap().bit(), 1);

        // CZ on |+⟩|1⟩ gives |−⟩|1⟩
        let mut t = Tableau::new(2).unwrap();
        t.h(0).unwrap().x(1).unwrap().cz(0, 1).unwrap().h(0).unwrap();
        assert_eq!(t.measure(0, &mut rng).unwrap(), Outcome::Determined(1));
    }

    #[test]
    fn test_cy_on_control_one() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut t = Tableau::new(2).unwrap();
        t.x(0).unwrap().cy(0, 1).unwrap();
        assert_eq!(t.measure(1, &mut rng).unwrap().bit(), 1);
    }

    #[test]
    fn test_probability_does_not_collapse() {
        let mut t = Tableau::new(1).unwrap();
        t.h(0).unwrap();
        let before = t.clone();
        assert_eq!(t.probability_of_one(0).unwrap(), 0.5);
        assert_eq!(t, before);
    }

    #[test]
    fn test_probability_of_determined_qubits() {
        let mut t = Tableau::new(3).unwrap();
        t.x(0).unwrap().cx(0, 2).unwrap();
        let before = t.clone();
        assert_eq!(t.probability_of_one(0).unwrap(), 1.0);
        assert_eq!(t.probability_of_one(1).unwrap(), 0.0);
        assert_eq!(t.probability_of_one(2).unwrap(), 1.0);
        assert_eq!(t, before);
        assert!(t.probability_of_one(3).is_err());
    }

    #[test]
    fn test_invalid_ids() {
        let mut t = Tableau::new(2).unwrap();
        assert!(t.h(2).is_err());
        assert!(t.cx(1, 1).is_err());
    }
}
