//! Qomp numerical engine
//!
//! Low-level state representations used by the Qomp simulators and the
//! channel algebra:
//!
//! - [`StateVector`]: `2^n` amplitudes with gate application, basis-rotated
//!   sampling and collapse
//! - [`DensityMatrix`]: a `2^n × 2^n` operator with local left/right/both
//!   products and partial trace
//! - [`Tableau`]: a CHP stabilizer tableau for Clifford circuits
//!
//! # Conventions
//!
//! Qubit 0 is the most significant bit of a basis index. A local operator
//! acting on qubits `[a, b]` treats `a` as its own most significant bit.
//! Values handed back to callers are rounded to eight decimals and
//! magnitudes below [`bits::MIN_DOUBLE`] count as zero.
//!
//! # Example
//!
//! ```
//! use qomp_engine::StateVector;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut sv = StateVector::new(2).unwrap();
//! let h = qomp_engine::gates::hadamard();
//! let x = qomp_engine::gates::pauli_x();
//! sv.apply_single(&h, 0);
//! sv.apply_controlled(&x, 0, 1);
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let freq = sv.measure(&mut rng, 100, 0.0, 0.0, &[]).unwrap();
//! assert_eq!(freq.counts[1] + freq.counts[2], 0);
//! ```

pub mod bits;
pub mod density;
pub mod error;
pub mod gates;
pub mod stabilizer;
pub mod statevector;

pub use density::{DensityMatrix, Direction, kron};
pub use error::{EngineError, EngineResult};
pub use stabilizer::{Outcome, Tableau};
pub use statevector::{Frequency, StateVector, sample};
