//! Conversion between display amounts (e.g. `"10.5"` STRK) and the integer
//! amount in the token's smallest unit.

use {
    crate::conversions::big_decimal_to_u256,
    alloy_primitives::U256,
    bigdecimal::{BigDecimal, Zero, num_bigint::BigInt},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("amount is negative")]
    Negative,
    #[error("amount has more than {0} decimal places")]
    Precision(u8),
    #[error("amount does not fit into 256 bits")]
    Overflow,
}

/// Scales a display amount by `10^decimals`. The result must be integral:
/// amounts with more fractional digits than the token supports are rejected
/// instead of being silently truncated.
pub fn to_smallest_unit(amount: &BigDecimal, decimals: u8) -> Result<U256, Error> {
    if *amount < BigDecimal::zero() {
        return Err(Error::Negative);
    }
    let scaled = amount * BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    if !scaled.is_integer() {
        return Err(Error::Precision(decimals));
    }
    big_decimal_to_u256(&scaled).ok_or(Error::Overflow)
}

/// Formats a smallest unit amount as an exact decimal string without
/// trailing fractional zeros, e.g. `20500000000000000000` with 18 decimals
/// becomes `"20.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    join(integer, fraction)
}

/// Like [`format_units`] but rounds down to at most `places` fractional
/// digits. Used for human confirmation only, never for on-chain values.
pub fn format_units_rounded(value: U256, decimals: u8, places: usize) -> String {
    let exact = format_units(value, decimals);
    match exact.split_once('.') {
        Some((integer, fraction)) if fraction.len() > places => {
            join(integer, &fraction[..places])
        }
        _ => exact,
    }
}

fn join(integer: &str, fraction: &str) -> String {
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}
