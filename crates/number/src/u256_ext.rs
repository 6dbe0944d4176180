//! Extension trait for the Cairo `u256` calldata layout.

use alloy_primitives::U256;

/// A 256-bit integer is passed to Cairo contracts as two 128-bit words, the
/// low word first.
pub trait U256Ext {
    /// The lower 128 bits, i.e. `self mod 2^128`.
    fn low(&self) -> u128;

    /// The upper 128 bits, i.e. `self div 2^128`.
    fn high(&self) -> u128;

    /// Returns `(low, high)`.
    fn split(&self) -> (u128, u128) {
        (self.low(), self.high())
    }
}

impl U256Ext for U256 {
    fn low(&self) -> u128 {
        (*self & U256::from(u128::MAX)).to::<u128>()
    }

    fn high(&self) -> u128 {
        (*self >> 128usize).to::<u128>()
    }
}
