//! Validation of a distribution before anything is sent on-chain. All
//! problems are collected and reported together so that the user can fix
//! every row in one go.

use {
    super::{
        recipient::{Mode, Recipient},
        starknet::U256,
        token::Token,
    },
    bigdecimal::{BigDecimal, Zero},
    itertools::Itertools,
    regex::Regex,
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
        sync::LazyLock,
    },
};

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{1,64}$").expect("valid regex"));
static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*|\.\d+)$").expect("valid regex"));

/// Checks the format of a single recipient row.
#[cfg_attr(test, mockall::automock)]
pub trait FormatValidator: Send + Sync {
    /// Returns a human readable reason if the row is invalid.
    fn validate(&self, address: &str, amount: &str) -> Result<(), String>;
}

/// Format rules for Starknet recipients: addresses are `0x` prefixed hex
/// below `2^251`, amounts are plain positive decimals.
#[derive(Clone, Copy, Debug, Default)]
pub struct StarknetFormat;

impl FormatValidator for StarknetFormat {
    fn validate(&self, address: &str, amount: &str) -> Result<(), String> {
        if !is_account_address(address) {
            return Err("Invalid Starknet address".to_owned());
        }
        match parse_amount(amount) {
            None => Err("Invalid amount".to_owned()),
            Some(amount) if amount.is_zero() => Err("Amount must be greater than 0".to_owned()),
            Some(_) => Ok(()),
        }
    }
}

fn is_account_address(address: &str) -> bool {
    ADDRESS.is_match(address)
        && address
            .parse::<U256>()
            .is_ok_and(|value| value < U256::from(1) << 251)
}

/// Parses an amount as entered by the user. Only plain decimal notation is
/// accepted: no sign, no exponent, no thousands separators.
pub fn parse_amount(amount: &str) -> Option<BigDecimal> {
    if !AMOUNT.is_match(amount) {
        return None;
    }
    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let integer = if integer.is_empty() { "0" } else { integer };
    if fraction.is_empty() {
        BigDecimal::from_str(integer).ok()
    } else {
        BigDecimal::from_str(&format!("{integer}.{fraction}")).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Problem {
    /// Every address that occurs more than once, each listed once.
    #[error("duplicate addresses found: {}", .0.join(", "))]
    DuplicateAddresses(Vec<String>),
    #[error("all recipients must receive the same amount for equal distribution")]
    InconsistentAmounts,
    /// `row` is 1-based.
    #[error("row {row}: {reason}")]
    InvalidEntry { row: usize, reason: String },
}

/// A non-empty collection of problems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report(Vec<Problem>);

impl Report {
    pub fn problems(&self) -> &[Problem] {
        &self.0
    }

    pub fn duplicates(&self) -> Option<&[String]> {
        self.0.iter().find_map(|problem| match problem {
            Problem::DuplicateAddresses(addresses) => Some(addresses.as_slice()),
            _ => None,
        })
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("; "))
    }
}

/// Validates a distribution, returning every problem found.
pub fn validate(
    recipients: &[Recipient],
    mode: Mode,
    token: &Token,
    validator: &dyn FormatValidator,
) -> Result<(), Report> {
    let mut problems = Vec::new();

    let duplicates = recipients
        .iter()
        .map(|recipient| recipient.address.as_str())
        .duplicates()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !duplicates.is_empty() {
        problems.push(Problem::DuplicateAddresses(duplicates));
    }

    // Amounts are compared as entered, "1.0" and "1.00" are different.
    if mode == Mode::Equal && !recipients.iter().map(|r| &r.amount).all_equal() {
        problems.push(Problem::InconsistentAmounts);
    }

    for (i, recipient) in recipients.iter().enumerate() {
        let reason = validator
            .validate(&recipient.address, &recipient.amount)
            .err()
            .or_else(|| representable(&recipient.amount, token).err());
        if let Some(reason) = reason {
            problems.push(Problem::InvalidEntry { row: i + 1, reason });
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Report(problems))
    }
}

/// Checks that an amount can be expressed in the token's smallest unit.
fn representable(amount: &str, token: &Token) -> Result<(), String> {
    let amount = parse_amount(amount).ok_or_else(|| "Invalid amount".to_owned())?;
    number::units::to_smallest_unit(&amount, token.decimals)
        .map(|_| ())
        .map_err(|err| format!("{err} for {}", token.symbol))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::token::{Network, Tokens},
    };

    fn strk() -> Token {
        Tokens::supported(Network::Mainnet)
            .get("STRK")
            .unwrap()
            .clone()
    }

    fn usdc() -> Token {
        Tokens::supported(Network::Mainnet)
            .get("USDC")
            .unwrap()
            .clone()
    }

    fn recipients(rows: &[(&str, &str)]) -> Vec<Recipient> {
        rows.iter()
            .map(|(address, amount)| Recipient::new(*address, *amount))
            .collect()
    }

    #[test]
    fn accepts_valid_distribution() {
        let recipients = recipients(&[("0xa", "10"), ("0xb", "10")]);
        assert!(validate(&recipients, Mode::Equal, &strk(), &StarknetFormat).is_ok());
        assert!(validate(&recipients, Mode::Weighted, &strk(), &StarknetFormat).is_ok());
    }

    #[test]
    fn lists_each_duplicate_once() {
        let recipients = recipients(&[
            ("0xa", "1"),
            ("0xb", "1"),
            ("0xa", "1"),
            ("0xc", "1"),
            ("0xa", "1"),
            ("0xc", "1"),
        ]);
        let report = validate(&recipients, Mode::Equal, &strk(), &StarknetFormat).unwrap_err();
        assert_eq!(report.duplicates().unwrap(), ["0xa", "0xc"]);
        assert_eq!(report.problems().len(), 1);
    }

    #[test]
    fn duplicates_are_case_sensitive() {
        let recipients = recipients(&[("0xab", "1"), ("0xAB", "1")]);
        assert!(validate(&recipients, Mode::Equal, &strk(), &StarknetFormat).is_ok());
    }

    #[test]
    fn duplicate_addresses_with_different_amounts() {
        let recipients = recipients(&[("0xA", "1"), ("0xA", "2")]);
        let report = validate(&recipients, Mode::Weighted, &strk(), &StarknetFormat).unwrap_err();
        assert_eq!(
            report.problems(),
            [Problem::DuplicateAddresses(vec!["0xA".to_owned()])]
        );
    }

    #[test]
    fn equal_mode_compares_amount_strings() {
        let recipients = recipients(&[("0xa", "1.0"), ("0xb", "1.00")]);
        let report = validate(&recipients, Mode::Equal, &strk(), &StarknetFormat).unwrap_err();
        assert_eq!(report.problems(), [Problem::InconsistentAmounts]);

        assert!(validate(&recipients, Mode::Weighted, &strk(), &StarknetFormat).is_ok());
    }

    #[test]
    fn collects_all_problems() {
        let recipients = recipients(&[
            ("0xa", "1"),
            ("not an address", "1"),
            ("0xa", "2"),
            ("0xb", "-3"),
            ("0xc", "0"),
            ("0xd", "0.1234567"),
        ]);
        let report = validate(&recipients, Mode::Equal, &usdc(), &StarknetFormat).unwrap_err();
        assert_eq!(
            report.problems(),
            [
                Problem::DuplicateAddresses(vec!["0xa".to_owned()]),
                Problem::InconsistentAmounts,
                Problem::InvalidEntry {
                    row: 2,
                    reason: "Invalid Starknet address".to_owned()
                },
                Problem::InvalidEntry {
                    row: 4,
                    reason: "Invalid amount".to_owned()
                },
                Problem::InvalidEntry {
                    row: 5,
                    reason: "Amount must be greater than 0".to_owned()
                },
                Problem::InvalidEntry {
                    row: 6,
                    reason: "amount has more than 6 decimal places for USDC".to_owned()
                },
            ]
        );
    }

    #[test]
    fn delegates_format_checks() {
        let mut validator = MockFormatValidator::new();
        validator
            .expect_validate()
            .withf(|address, _| address == "0xb")
            .returning(|_, _| Err("blocked".to_owned()));
        validator
            .expect_validate()
            .withf(|address, _| address != "0xb")
            .returning(|_, _| Ok(()));

        let recipients = recipients(&[("0xa", "1"), ("0xb", "1")]);
        let report = validate(&recipients, Mode::Equal, &strk(), &validator).unwrap_err();
        assert_eq!(
            report.problems(),
            [Problem::InvalidEntry {
                row: 2,
                reason: "blocked".to_owned()
            }]
        );
    }

    #[test]
    fn starknet_format() {
        let format = StarknetFormat;
        assert!(format.validate("0x1", "1").is_ok());
        assert!(format.validate("0x0ABCdef", ".5").is_ok());
        assert!(format.validate("0x1", "2.").is_ok());
        assert!(
            format
                .validate(&format!("0x8{}", "0".repeat(62)), "1")
                .is_err(),
            "address must be below 2^251"
        );
        assert!(format.validate(&format!("0x{}", "1".repeat(65)), "1").is_err());
        assert!(format.validate("1234", "1").is_err());
        assert!(format.validate("0x1", "1e3").is_err());
        assert!(format.validate("0x1", "").is_err());
        assert!(format.validate("0x1", "1,000").is_err());
    }
}
