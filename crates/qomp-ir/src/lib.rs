//! Qomp Circuit Representation
//!
//! This crate holds everything a circuit is made of before it reaches a
//! simulator: the gate catalog, the instruction type, classical memory, the
//! circuit container with its validation rules, and the synthesis of
//! composite gates into elementary ones.
//!
//! # Conventions
//!
//! - Qubit 0 is the most significant bit of a basis index; outcome strings
//!   list qubit 0 first.
//! - Phases are real numbers in multiples of π.
//! - Two-qubit controlled gates take the control first.
//!
//! # Example: Toffoli via synthesis
//!
//! ```rust
//! use qomp_ir::{Circuit, GateKind, GateOp, qubits};
//!
//! let mut circuit = Circuit::new(3, 3);
//! circuit.push(GateOp::new(GateKind::CCX, qubits(&[0, 1, 2]))).unwrap();
//!
//! // Five two-qubit gates, no three-qubit op stored.
//! assert_eq!(circuit.len(), 5);
//! ```
//!
//! # Gate Catalog
//!
//! | Gate | Qubits | Phases | Clifford |
//! |------|--------|--------|----------|
//! | `i`, `x`, `y`, `z`, `h`, `s`, `s_dg` | 1 | 0 | yes |
//! | `xr`, `xr_dg`, `t`, `t_dg` | 1 | 0 | no |
//! | `rx`, `ry`, `rz`, `p`, `u1` | 1 | 1 | no |
//! | `u2` / `u3` | 1 | 2 / 3 | no |
//! | `cx`, `cy`, `cz`, `sw` | 2 | 0 | yes |
//! | `cxr`, `cxr_dg`, `ch`, `cs`, `cs_dg`, `ct`, `ct_dg` | 2 | 0 | no |
//! | `cp`, `crx`, `cry`, `crz`, `cu1` | 2 | 1 | no |
//! | `cu2` / `cu3` | 2 | 2 / 3 | no |
//! | `ccx`, `csw` | 3 | 0 | synthesized |
//! | `mcx` | ≥ 2 | 0 | synthesized |
//! | `measure`, `mx`, `my` | any | 0 | measurement |
//! | `mb` | 2 | 0 | measurement |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod memory;
pub mod qubit;
pub mod synthesis;
pub mod unitary;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Arity, GateKind};
pub use instruction::{BasisAxis, GateOp};
pub use memory::ClassicalMemory;
pub use qubit::{ClbitId, QubitId, clbits, qubits};
pub use unitary::Unitary2x2;
