//! Protocol fee and the totals shown to the user before submission.

use {
    super::{recipient::Recipient, starknet::U256, token::Token, validation},
    bigdecimal::BigDecimal,
    number::units,
    serde::Serialize,
};

/// Fractional digits shown in the confirmation summary.
const DISPLAY_PLACES: usize = 6;

/// A protocol fee in basis points, at most 100%.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FeeBps(u16);

impl FeeBps {
    pub const MAX: u16 = 10_000;

    pub fn get(&self) -> u16 {
        self.0
    }

    /// Applies the fee to an amount, rounding down. The amount is split at
    /// 10000 so that no intermediate product is wider than the result.
    pub fn apply(&self, base: U256) -> Option<U256> {
        let bps = U256::from(self.0);
        let max = U256::from(Self::MAX);
        let whole = (base / max).checked_mul(bps)?;
        let rest = base % max * bps / max;
        whole.checked_add(rest)
    }
}

impl TryFrom<U256> for FeeBps {
    type Error = Error;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value > U256::from(Self::MAX) {
            return Err(Error::FeeOutOfRange(value));
        }
        Ok(Self(value.to::<u16>()))
    }
}

impl TryFrom<u64> for FeeBps {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_from(U256::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("protocol fee of {0} bps exceeds 100%")]
    FeeOutOfRange(U256),
    #[error("invalid amount {0:?}")]
    InvalidAmount(String),
    #[error(transparent)]
    Amount(#[from] units::Error),
    #[error("total amount does not fit into 256 bits")]
    Overflow,
}

/// Amounts in the token's smallest unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of all recipient amounts.
    pub base: U256,
    /// `floor(base * fee / 10000)`.
    pub fee: U256,
    /// What the distribution contract pulls from the sender.
    pub total: U256,
}

/// Sums the recipient amounts exactly and adds the protocol fee. The sum is
/// computed on the decimal values and scaled to the smallest unit once.
pub fn compute_totals(
    recipients: &[Recipient],
    token: &Token,
    fee: FeeBps,
) -> Result<Totals, Error> {
    let sum = recipients
        .iter()
        .map(|recipient| {
            validation::parse_amount(&recipient.amount)
                .ok_or_else(|| Error::InvalidAmount(recipient.amount.clone()))
        })
        .sum::<Result<BigDecimal, _>>()?;
    let base = units::to_smallest_unit(&sum, token.decimals)?;
    let fee = fee.apply(base).ok_or(Error::Overflow)?;
    let total = base.checked_add(fee).ok_or(Error::Overflow)?;
    Ok(Totals { base, fee, total })
}

/// Human readable rendering of [`Totals`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Formatted {
    pub base: String,
    pub fee: String,
    pub total: String,
}

impl Totals {
    /// Exact decimal strings, as stored in distribution records.
    pub fn exact(&self, token: &Token) -> Formatted {
        self.render(|value| units::format_units(value, token.decimals))
    }

    /// Rounded down for the confirmation summary.
    pub fn rounded(&self, token: &Token) -> Formatted {
        self.render(|value| {
            units::format_units_rounded(value, token.decimals, DISPLAY_PLACES)
        })
    }

    fn render(&self, format: impl Fn(U256) -> String) -> Formatted {
        Formatted {
            base: format(self.base),
            fee: format(self.fee),
            total: format(self.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::token::{Network, Tokens},
    };

    fn token(symbol: &str) -> Token {
        Tokens::supported(Network::Mainnet)
            .get(symbol)
            .unwrap()
            .clone()
    }

    fn eth(value: u128) -> U256 {
        U256::from(value) * U256::from(10u128.pow(18))
    }

    fn bps(value: u64) -> FeeBps {
        FeeBps::try_from(value).unwrap()
    }

    #[test]
    fn adds_protocol_fee() {
        let recipients = [Recipient::new("0xA", "10"), Recipient::new("0xB", "10")];
        let totals = compute_totals(&recipients, &token("STRK"), bps(250)).unwrap();
        assert_eq!(totals.base, eth(20));
        assert_eq!(totals.fee, eth(1) / U256::from(2));
        assert_eq!(totals.total, eth(41) / U256::from(2));

        let display = totals.rounded(&token("STRK"));
        assert_eq!(display.total, "20.5");
        assert_eq!(display.fee, "0.5");
    }

    #[test]
    fn zero_fee() {
        let recipients = [Recipient::new("0xA", "1.5"), Recipient::new("0xB", "3")];
        let totals = compute_totals(&recipients, &token("ETH"), FeeBps::default()).unwrap();
        assert_eq!(totals.fee, U256::ZERO);
        assert_eq!(totals.total, totals.base);
        assert_eq!(totals.base, eth(9) / U256::from(2));
    }

    #[test]
    fn idempotent() {
        let recipients = [Recipient::new("0xA", "0.1"), Recipient::new("0xB", "0.2")];
        let a = compute_totals(&recipients, &token("USDC"), bps(30)).unwrap();
        let b = compute_totals(&recipients, &token("USDC"), bps(30)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.base, U256::from(300_000));
        assert_eq!(a.fee, U256::from(900));
    }

    #[test]
    fn fee_rounds_down() {
        let recipients = [Recipient::new("0xA", "0.000001")];
        let totals = compute_totals(&recipients, &token("USDC"), bps(9_999)).unwrap();
        assert_eq!(totals.base, U256::from(1));
        assert_eq!(totals.fee, U256::ZERO);
        assert!(totals.total >= totals.base);
    }

    #[test]
    fn display_variants() {
        let totals = Totals {
            base: U256::from(1_234_567_891_234_567_891u128),
            fee: U256::ZERO,
            total: U256::from(1_234_567_891_234_567_891u128),
        };
        assert_eq!(totals.exact(&token("ETH")).total, "1.234567891234567891");
        assert_eq!(totals.rounded(&token("ETH")).total, "1.234567");
        assert_eq!(totals.rounded(&token("ETH")).fee, "0");
    }

    #[test]
    fn rejects_fees_above_hundred_percent() {
        assert!(FeeBps::try_from(10_000u64).is_ok());
        assert!(matches!(
            FeeBps::try_from(10_001u64),
            Err(Error::FeeOutOfRange(_))
        ));
    }

    #[test]
    fn reports_invalid_amounts() {
        let recipients = [Recipient::new("0xA", "abc")];
        assert_eq!(
            compute_totals(&recipients, &token("ETH"), bps(0)),
            Err(Error::InvalidAmount("abc".to_owned()))
        );
        let recipients = [Recipient::new("0xA", "0.0000001")];
        assert_eq!(
            compute_totals(&recipients, &token("USDC"), bps(0)),
            Err(Error::Amount(units::Error::Precision(6)))
        );
    }

    #[test]
    fn large_amounts_do_not_overflow_the_fee() {
        let base: U256 = U256::from(1) << 250;
        let recipients = [Recipient::new("0xA", base.to_string())];
        let mut token = token("ETH");
        token.decimals = 0;
        let totals = compute_totals(&recipients, &token, bps(100)).unwrap();
        assert_eq!(totals.fee, base / U256::from(100));
        assert_eq!(totals.total, base + base / U256::from(100));

        assert_eq!(
            bps(9_999).apply(U256::from(123_456_789)),
            Some(U256::from(123_456_789u64 * 9_999 / 10_000))
        );
        assert_eq!(bps(10_000).apply(U256::MAX), Some(U256::MAX));
    }

    #[test]
    fn overflow_is_an_error() {
        let max = U256::MAX.to_string();
        let recipients = [Recipient::new("0xA", &max), Recipient::new("0xB", "1")];
        let mut token = token("ETH");
        token.decimals = 0;
        assert_eq!(
            compute_totals(&recipients, &token, bps(0)),
            Err(Error::Amount(units::Error::Overflow))
        );
    }
}
