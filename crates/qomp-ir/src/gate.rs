//! Gate catalog.
//!
//! Every operation a circuit can hold is a [`GateKind`]. The catalog knows a
//! kind's arity, how many phase parameters it takes, whether it is Clifford,
//! and whether it is a measurement or a composite that must be synthesized
//! into elementary gates before it reaches a circuit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Number of qubit ids a gate kind takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Any non-empty, duplicate-free subset of the register.
    Variable,
    /// Exactly this many qubits.
    Fixed(usize),
}

/// Enumerated gate identifiers.
///
/// Phases of parameterized gates are expressed in multiples of π.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum GateKind {
    // Single-qubit gates
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// Root-X, sqrt(X).
    SX,
    /// Root-X dagger.
    SXdg,
    /// S gate, sqrt(Z).
    S,
    /// S-dagger.
    Sdg,
    /// T gate, fourth root of Z.
    T,
    /// T-dagger.
    Tdg,
    /// Rotation around X by `phase[0]·π`.
    Rx,
    /// Rotation around Y by `phase[0]·π`.
    Ry,
    /// Rotation around Z by `phase[0]·π`.
    Rz,
    /// Phase shift `diag(1, e^{iφπ})`.
    P,
    /// IBM U1, identical to `P`.
    U1,
    /// IBM U2(α, β).
    U2,
    /// IBM U3(α, β, γ).
    U3,

    // Two-qubit gates, first id is the control
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled root-X.
    CSX,
    /// Controlled root-X dagger.
    CSXdg,
    /// Controlled-Hadamard.
    CH,
    /// Controlled-S.
    CS,
    /// Controlled-S-dagger.
    CSdg,
    /// Controlled-T.
    CT,
    /// Controlled-T-dagger.
    CTdg,
    /// SWAP.
    Swap,
    /// Controlled phase.
    CP,
    /// Controlled RX.
    CRx,
    /// Controlled RY.
    CRy,
    /// Controlled RZ.
    CRz,
    /// Controlled U1.
    CU1,
    /// Controlled U2.
    CU2,
    /// Controlled U3.
    CU3,

    // Composite gates, synthesized before reaching a circuit
    /// Toffoli.
    CCX,
    /// Fredkin.
    CSwap,
    /// Multi-controlled X; the last id is the target.
    MCX,

    // Measurements
    /// Z-basis measurement.
    Measure,
    /// X-basis measurement.
    MeasureX,
    /// Y-basis measurement.
    MeasureY,
    /// Bell-basis measurement of a qubit pair.
    MeasureBell,
}

impl GateKind {
    /// Every kind in the catalog.
    pub const ALL: [GateKind; 43] = [
        GateKind::I,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::H,
        GateKind::SX,
        GateKind::SXdg,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::P,
        GateKind::U1,
        GateKind::U2,
        GateKind::U3,
        GateKind::CX,
        GateKind::CY,
        GateKind::CZ,
        GateKind::CSX,
        GateKind::CSXdg,
        GateKind::CH,
        GateKind::CS,
        GateKind::CSdg,
        GateKind::CT,
        GateKind::CTdg,
        GateKind::Swap,
        GateKind::CP,
        GateKind::CRx,
        GateKind::CRy,
        GateKind::CRz,
        GateKind::CU1,
        GateKind::CU2,
        GateKind::CU3,
        GateKind::CCX,
        GateKind::CSwap,
        GateKind::MCX,
        GateKind::Measure,
        GateKind::MeasureX,
        GateKind::MeasureY,
        GateKind::MeasureBell,
    ];

    /// Get the mnemonic of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateKind::I => "i",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::H => "h",
            GateKind::SX => "xr",
            GateKind::SXdg => "xr_dg",
            GateKind::S => "s",
            GateKind::Sdg => "s_dg",
            GateKind::T => "t",
            GateKind::Tdg => "t_dg",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::P => "p",
            GateKind::U1 => "u1",
            GateKind::U2 => "u2",
            GateKind::U3 => "u3",
            GateKind::CX => "cx",
            GateKind::CY => "cy",
            GateKind::CZ => "cz",
            GateKind::CSX => "cxr",
            GateKind::CSXdg => "cxr_dg",
            GateKind::CH => "ch",
            GateKind::CS => "cs",
            GateKind::CSdg => "cs_dg",
            GateKind::CT => "ct",
            GateKind::CTdg => "ct_dg",
            GateKind::Swap => "sw",
            GateKind::CP => "cp",
            GateKind::CRx => "crx",
            GateKind::CRy => "cry",
            GateKind::CRz => "crz",
            GateKind::CU1 => "cu1",
            GateKind::CU2 => "cu2",
            GateKind::CU3 => "cu3",
            GateKind::CCX => "ccx",
            GateKind::CSwap => "csw",
            GateKind::MCX => "mcx",
            GateKind::Measure => "measure",
            GateKind::MeasureX => "mx",
            GateKind::MeasureY => "my",
            GateKind::MeasureBell => "mb",
        }
    }

    /// Number of qubit ids this kind takes.
    pub fn arity(self) -> Arity {
        match self {
            GateKind::MCX
            | GateKind::Measure
            | GateKind::MeasureX
            | GateKind::MeasureY => Arity::Variable,
            GateKind::CCX | GateKind::CSwap => Arity::Fixed(3),
            GateKind::MeasureBell => Arity::Fixed(2),
            k if k.controlled_base().is_some() || k == GateKind::Swap => Arity::Fixed(2),
            _ => Arity::Fixed(1),
        }
    }

    /// Smallest number of ids accepted.
    pub fn min_qubits(self) -> usize {
        match self.arity() {
            Arity::Fixed(n) => n,
            Arity::Variable if self == GateKind::MCX => 2,
            Arity::Variable => 1,
        }
    }

    /// Number of phase parameters (multiples of π) this kind takes.
    pub fn num_phases(self) -> usize {
        match self {
            GateKind::Rx
            | GateKind::Ry
            | GateKind::Rz
            | GateKind::P
            | GateKind::U1
            | GateKind::CP
            | GateKind::CRx
            | GateKind::CRy
            | GateKind::CRz
            | GateKind::CU1 => 1,
            GateKind::U2 | GateKind::CU2 => 2,
            GateKind::U3 | GateKind::CU3 => 3,
            _ => 0,
        }
    }

    /// Whether the gate maps Pauli operators to Pauli operators and can be
    /// tracked on a stabilizer tableau.
    pub fn is_clifford(self) -> bool {
        matches!(
            self,
            GateKind::I
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::H
                | GateKind::S
                | GateKind::Sdg
                | GateKind::CX
                | GateKind::CY
                | GateKind::CZ
                | GateKind::Swap
        )
    }

    /// Whether this kind is a measurement.
    pub fn is_measurement(self) -> bool {
        matches!(
            self,
            GateKind::Measure | GateKind::MeasureX | GateKind::MeasureY | GateKind::MeasureBell
        )
    }

    /// Whether this kind is expanded into elementary gates before it is stored.
    pub fn is_composite(self) -> bool {
        matches!(self, GateKind::CCX | GateKind::CSwap | GateKind::MCX)
    }

    /// For a controlled two-qubit gate, the single-qubit gate applied to the
    /// target when the control is set.
    pub fn controlled_base(self) -> Option<GateKind> {
        let base = match self {
            GateKind::CX => GateKind::X,
            GateKind::CY => GateKind::Y,
            GateKind::CZ => GateKind::Z,
            GateKind::CSX => GateKind::SX,
            GateKind::CSXdg => GateKind::SXdg,
            GateKind::CH => GateKind::H,
            GateKind::CS => GateKind::S,
            GateKind::CSdg => GateKind::Sdg,
            GateKind::CT => GateKind::T,
            GateKind::CTdg => GateKind::Tdg,
            GateKind::CP => GateKind::P,
            GateKind::CRx => GateKind::Rx,
            GateKind::CRy => GateKind::Ry,
            GateKind::CRz => GateKind::Rz,
            GateKind::CU1 => GateKind::U1,
            GateKind::CU2 => GateKind::U2,
            GateKind::CU3 => GateKind::U3,
            _ => return None,
        };
        Some(base)
    }

    /// Whether this kind acts on a single qubit with a 2x2 unitary.
    pub fn is_single_qubit(self) -> bool {
        !self.is_measurement() && self.arity() == Arity::Fixed(1)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = IrError;

    fn from_str(s: &str) -> IrResult<Self> {
        let lower = s.to_ascii_lowercase();
        if let Some(kind) = GateKind::ALL.iter().find(|k| k.name() == lower) {
            return Ok(*kind);
        }
        let kind = match lower.as_str() {
            "id" => GateKind::I,
            "sx" => GateKind::SX,
            "sxdg" => GateKind::SXdg,
            "sdg" => GateKind::Sdg,
            "tdg" => GateKind::Tdg,
            "csx" => GateKind::CSX,
            "swap" => GateKind::Swap,
            "cswap" | "fredkin" => GateKind::CSwap,
            "toffoli" => GateKind::CCX,
            "m" | "mz" => GateKind::Measure,
            _ => return Err(IrError::UnknownGateKind(s.to_string())),
        };
        Ok(kind)
    }
}

impl From<GateKind> for &'static str {
    fn from(kind: GateKind) -> Self {
        kind.name()
    }
}

impl TryFrom<String> for GateKind {
    type Error = IrError;

    fn try_from(value: String) -> IrResult<Self> {
        value.parse()
    }
}
