//! Qomp channel algebra
//!
//! Mixed states as [`DensityOperator`]s and the operations quantum channels
//! are built from: statistical mixing, local unitary and Kraus products,
//! partial trace, POVM/Kraus outcome probabilities and measurement
//! instruments.
//!
//! All numbers handed back (traces, probabilities, matrix elements) are
//! rounded to eight decimals. Qubit ids follow the engine convention:
//! qubit 0 is the most significant bit of a basis index.
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use num_complex::Complex64;
//! use qomp_channel::{DensityOperator, OperatorKind};
//! use qomp_engine::StateVector;
//!
//! let zero = StateVector::new(1).unwrap();
//! let one = StateVector::from_amplitudes(vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)])
//!     .unwrap();
//! let rho = DensityOperator::from_states(&[zero, one], &[0.25, 0.75]).unwrap();
//!
//! let p0 = array![[Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
//!                 [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)]];
//! let p1 = array![[Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
//!                 [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]];
//! let probs = rho.probability(&[p0, p1], &[0], OperatorKind::Kraus).unwrap();
//! assert_eq!(probs, vec![0.25, 0.75]);
//! ```

pub mod error;
pub mod measurement;
pub mod operator;

pub use error::{ChannelError, ChannelResult};
pub use measurement::OperatorKind;
pub use operator::DensityOperator;
pub use qomp_engine::Direction;
