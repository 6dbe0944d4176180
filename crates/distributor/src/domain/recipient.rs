use {
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// A recipient as entered by the user. Both fields are kept verbatim, they
/// only get parsed when the distribution is validated and encoded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    pub amount: String,
}

impl Recipient {
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// Editable fields of a [`Recipient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Address,
    Amount,
}

/// How the distributed amount is split between recipients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Every recipient receives the same amount.
    #[default]
    Equal,
    /// Every recipient receives an individual amount.
    Weighted,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "EQUAL",
            Self::Weighted => "WEIGHTED",
        })
    }
}

/// A row of a manual entry or bulk import. The amount may be omitted, in
/// which case the session's equal amount is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub address: String,
    pub amount: Option<String>,
}

/// Parses a bulk import: one `address[,amount]` row per line. Rows without an
/// address are skipped, an empty amount column counts as missing.
pub fn parse_rows(input: &str) -> Vec<Row> {
    input
        .lines()
        .filter_map(|line| {
            let mut columns = line.split(',').map(str::trim);
            let address = columns.next().filter(|address| !address.is_empty())?;
            let amount = columns.next().filter(|amount| !amount.is_empty());
            Some(Row {
                address: address.to_owned(),
                amount: amount.map(str::to_owned),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_column_rows() {
        let rows = parse_rows("0xa,10\r\n0xb\n\n,5\n 0xc , 2.5 ,ignored\n0xd,\n");
        assert_eq!(
            rows,
            vec![
                Row {
                    address: "0xa".into(),
                    amount: Some("10".into())
                },
                Row {
                    address: "0xb".into(),
                    amount: None
                },
                Row {
                    address: "0xc".into(),
                    amount: Some("2.5".into())
                },
                Row {
                    address: "0xd".into(),
                    amount: None
                },
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(parse_rows("").is_empty());
    }
}
