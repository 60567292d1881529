//! Classical memory.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::ClbitId;

/// Fixed-size array of classical bits written by measurements and read by
/// classically controlled ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalMemory {
    bits: Vec<u8>,
}

impl ClassicalMemory {
    /// Memory of `size` bits, all zero.
    pub fn new(size: u32) -> Self {
        Self {
            bits: vec![0; size as usize],
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if the memory has no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn check(&self, addr: ClbitId) -> IrResult<usize> {
        let i = addr.index();
        if i < self.bits.len() {
            Ok(i)
        } else {
            Err(IrError::OutOfBoundClassicalAddress {
                clbit: addr,
                num_clbits: self.bits.len() as u32,
            })
        }
    }

    /// Read one bit.
    pub fn get(&self, addr: ClbitId) -> IrResult<u8> {
        self.check(addr).map(|i| self.bits[i])
    }

    /// Whether the bit at `addr` is 1.
    pub fn is_set(&self, addr: ClbitId) -> IrResult<bool> {
        self.get(addr).map(|b| b == 1)
    }

    /// Write one bit; any non-zero value is stored as 1.
    pub fn set(&mut self, addr: ClbitId, value: u8) -> IrResult<()> {
        let i = self.check(addr)?;
        self.bits[i] = u8::from(value != 0);
        Ok(())
    }

    /// Zero every bit.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// The raw bits.
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Bits as a string, address 0 first.
    pub fn to_bitstring(&self) -> String {
        self.bits.iter().map(|b| if *b == 1 { '1' } else { '0' }).collect()
    }
}
