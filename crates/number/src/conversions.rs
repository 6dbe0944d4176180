use {
    alloy_primitives::U256,
    anyhow::{Result, ensure},
    bigdecimal::{
        BigDecimal,
        num_bigint::{BigInt, BigUint, Sign, ToBigInt},
    },
};

pub fn big_uint_to_u256(input: &BigUint) -> Result<U256> {
    let bytes = input.to_bytes_be();
    ensure!(bytes.len() <= 32, "too large");
    Ok(U256::from_be_slice(&bytes))
}

pub fn big_int_to_u256(input: &BigInt) -> Result<U256> {
    ensure!(input.sign() != Sign::Minus, "negative");
    big_uint_to_u256(input.magnitude())
}

/// Converts an integral, non-negative decimal into a `U256`. Returns `None`
/// for fractional, negative or too large values.
pub fn big_decimal_to_u256(big_decimal: &BigDecimal) -> Option<U256> {
    if !big_decimal.is_integer() {
        return None;
    }
    let big_int = big_decimal.to_bigint()?;
    big_int_to_u256(&big_int).ok()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        bigdecimal::{One, Zero},
        std::str::FromStr,
    };

    const MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn big_int_to_u256_() {
        assert_eq!(big_int_to_u256(&BigInt::zero()).unwrap(), U256::ZERO);
        assert_eq!(big_int_to_u256(&BigInt::one()).unwrap(), U256::from(1));
        let max = BigInt::from_str(MAX).unwrap();
        assert_eq!(big_int_to_u256(&max).unwrap(), U256::MAX);
        assert!(big_int_to_u256(&(max + BigInt::one())).is_err());
        assert!(big_int_to_u256(&BigInt::from(-1)).is_err());
    }

    #[test]
    fn big_decimal_to_u256_() {
        assert_eq!(big_decimal_to_u256(&BigDecimal::zero()), Some(U256::ZERO));
        assert_eq!(big_decimal_to_u256(&BigDecimal::one()), Some(U256::from(1)));
        assert_eq!(
            big_decimal_to_u256(&BigDecimal::from_str("1500.000").unwrap()),
            Some(U256::from(1500))
        );
        assert!(big_decimal_to_u256(&BigDecimal::from(-1)).is_none());
        assert!(big_decimal_to_u256(&BigDecimal::from_str("0.5").unwrap()).is_none());

        let max = BigDecimal::from_str(MAX).unwrap();
        assert_eq!(big_decimal_to_u256(&max), Some(U256::MAX));
        assert!(big_decimal_to_u256(&(max + BigDecimal::one())).is_none());
    }
}
