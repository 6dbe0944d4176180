//! Number handling shared by the distribution crates: conversions between
//! 256-bit integers and arbitrary precision numbers, token unit scaling and
//! the Cairo `u256` representation.

pub mod conversions;
pub mod u256_ext;
pub mod units;

pub use alloy_primitives::U256;
