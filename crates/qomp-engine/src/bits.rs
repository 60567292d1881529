//! Index arithmetic shared by the state-vector and density-matrix engines.
//!
//! Qubit `q` of an `n`-qubit register lives at bit `n - 1 - q` of a basis
//! index, so qubit 0 is the most significant bit. A local operator acting
//! on `ids` sees `ids[0]` as its own most significant bit.

use num_complex::Complex64;
use rustc_hash::FxHashSet;

use crate::error::{EngineError, EngineResult};

/// Values below this magnitude are treated as zero.
pub const MIN_DOUBLE: f64 = 1e-8;

/// Decimal digits kept when returning numbers to callers.
pub const ROUND_DIGITS: i32 = 8;

/// Largest register the engines will allocate.
pub const MAX_QUBITS: usize = 30;

/// Check that every id is in range and no id repeats.
pub fn check_ids(ids: &[usize], num_qubits: usize) -> EngineResult<()> {
    let mut seen = FxHashSet::default();
    for &q in ids {
        if q >= num_qubits {
            return Err(EngineError::InvalidQubitId {
                qubit: q,
                num_qubits,
            });
        }
        if !seen.insert(q) {
            return Err(EngineError::DuplicateQubitId(q));
        }
    }
    Ok(())
}

/// Bit mask of qubit `q` in an `n`-qubit basis index.
#[inline]
pub fn mask(q: usize, num_qubits: usize) -> usize {
    1 << (num_qubits - 1 - q)
}

/// Masks of `ids`, in the order given.
pub fn masks(ids: &[usize], num_qubits: usize) -> Vec<usize> {
    ids.iter().map(|&q| mask(q, num_qubits)).collect()
}

/// Gather the bits of `index` selected by `masks` into a local index, the
/// first mask becoming the most significant bit.
#[inline]
pub fn extract(index: usize, masks: &[usize]) -> usize {
    masks
        .iter()
        .fold(0, |acc, &m| (acc << 1) | usize::from(index & m != 0))
}

/// Scatter the bits of `local` onto the positions selected by `masks`.
#[inline]
pub fn deposit(local: usize, masks: &[usize]) -> usize {
    let k = masks.len();
    masks
        .iter()
        .enumerate()
        .filter(|(i, _)| (local >> (k - 1 - i)) & 1 == 1)
        .fold(0, |acc, (_, &m)| acc | m)
}

/// Qubits of an `n`-qubit register not listed in `ids`, ascending.
pub fn complement(ids: &[usize], num_qubits: usize) -> Vec<usize> {
    (0..num_qubits).filter(|q| !ids.contains(q)).collect()
}

/// `log2(dim)` when `dim` is a power of two greater than one.
pub fn qubits_for_dim(dim: usize) -> Option<usize> {
    (dim >= 2 && dim.is_power_of_two()).then(|| dim.trailing_zeros() as usize)
}

/// Round to [`ROUND_DIGITS`] decimals.
#[inline]
pub fn round(x: f64) -> f64 {
    let scale = 10f64.powi(ROUND_DIGITS);
    let r = (x * scale).round() / scale;
    if r == 0.0 { 0.0 } else { r }
}

/// Round both parts of a complex number.
#[inline]
pub fn round_complex(c: Complex64) -> Complex64 {
    Complex64::new(round(c.re), round(c.im))
}

/// Outcome bit-string of a local index over `width` qubits.
pub fn bitstring(index: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{index:0width$b}")
}
