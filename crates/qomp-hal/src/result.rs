//! Measurement results.

use std::collections::BTreeMap;

use qomp_engine::bits;
use qomp_ir::{BasisAxis, Circuit, GateKind, GateOp, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// The basis a circuit's measurements were taken in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementBasis {
    /// Single-qubit measurements along one Bloch-sphere axis.
    Axis(BasisAxis),
    /// Two-qubit Bell-basis measurement.
    Bell,
    /// Measurements in more than one basis.
    Mixed,
}

impl MeasurementBasis {
    /// Basis of a single measurement op, or `None` for a gate.
    pub fn of(op: &GateOp) -> Option<Self> {
        match op.kind {
            GateKind::MeasureBell => Some(MeasurementBasis::Bell),
            _ => op.basis_axis().map(MeasurementBasis::Axis),
        }
    }

    /// Common basis of every measurement in `circuit`; Z when it has none.
    pub fn for_circuit(circuit: &Circuit) -> Self {
        let mut bases = circuit.ops().iter().filter_map(Self::of);
        let Some(first) = bases.next() else {
            return MeasurementBasis::Axis(BasisAxis::Z);
        };
        if bases.all(|b| b == first) {
            first
        } else {
            MeasurementBasis::Mixed
        }
    }
}

/// Outcome statistics of one run.
///
/// `frequency[i]` counts how often the measured qubits were found in the
/// basis state `i`, the first measured qubit being the most significant
/// bit. The table always has `2^k` entries for `k` measured qubits and its
/// counts sum to the shot count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    qubits: Vec<QubitId>,
    basis: MeasurementBasis,
    frequency: Vec<u64>,
    last: usize,
    shots: u64,
}

impl MeasurementResult {
    /// Build a result from raw counts, checking its shape.
    pub fn from_counts(
        qubits: Vec<QubitId>,
        basis: MeasurementBasis,
        frequency: Vec<u64>,
        last: usize,
        shots: u64,
    ) -> HalResult<Self> {
        if qubits.len() >= usize::BITS as usize {
            return Err(HalError::Aggregation(format!(
                "{} measured qubits cannot be tabulated",
                qubits.len()
            )));
        }
        let expected = 1usize << qubits.len();
        if frequency.len() != expected {
            return Err(HalError::Aggregation(format!(
                "frequency table has {} entries, expected {expected}",
                frequency.len()
            )));
        }
        let total: u64 = frequency.iter().sum();
        if total != shots {
            return Err(HalError::Aggregation(format!(
                "counts sum to {total}, expected {shots} shots"
            )));
        }
        if last >= expected {
            return Err(HalError::Aggregation(format!(
                "last outcome {last} outside {expected} outcomes"
            )));
        }
        Ok(Self {
            qubits,
            basis,
            frequency,
            last,
            shots,
        })
    }

    /// Measured qubits, most significant first.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Measurement basis.
    pub fn basis(&self) -> MeasurementBasis {
        self.basis
    }

    /// The full `2^k` frequency table.
    pub fn frequency(&self) -> &[u64] {
        &self.frequency
    }

    /// Index of the last sampled outcome.
    pub fn last(&self) -> usize {
        self.last
    }

    /// Number of shots.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Count of the outcome `bitstring`; zero for strings that are not a
    /// valid outcome.
    pub fn count(&self, bitstring: &str) -> u64 {
        if bitstring.len() != self.qubits.len() {
            return 0;
        }
        if bitstring.is_empty() {
            return self.frequency[0];
        }
        usize::from_str_radix(bitstring, 2)
            .ok()
            .and_then(|i| self.frequency.get(i).copied())
            .unwrap_or(0)
    }

    /// Observed outcomes and their counts, zero counts omitted.
    pub fn frequency_map(&self) -> BTreeMap<String, u64> {
        let width = self.qubits.len();
        self.frequency
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(i, c)| (bits::bitstring(i, width), *c))
            .collect()
    }

    /// The last sampled outcome as a bit-string.
    pub fn last_bitstring(&self) -> String {
        bits::bitstring(self.last, self.qubits.len())
    }

    /// Most frequent outcome and its count.
    pub fn most_frequent(&self) -> Option<(String, u64)> {
        self.frequency
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .max_by_key(|(_, c)| **c)
            .map(|(i, c)| (bits::bitstring(i, self.qubits.len()), *c))
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> HalResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
