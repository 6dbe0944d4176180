pub use number::U256;
use {
    alloy_primitives::keccak256,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

/// The Starknet field prime, `2^251 + 17 * 2^192 + 1`.
const PRIME: U256 = U256::from_limbs([1, 0, 0, 0x0800_0000_0000_0011]);

/// A Starknet field element. Addresses, calldata words and transaction hashes
/// are all felts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt(U256);

impl Felt {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Creates a felt, returning `None` if the value is not below the field
    /// prime.
    pub fn new(value: U256) -> Option<Self> {
        (value < PRIME).then_some(Self(value))
    }

    pub fn get(&self) -> U256 {
        self.0
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<usize> for Felt {
    fn from(value: usize) -> Self {
        Self(U256::from(value))
    }
}

impl Display for Felt {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseFeltError {
    #[error("invalid number: {0}")]
    Number(String),
    #[error("value is not a field element")]
    OutOfRange,
}

impl FromStr for Felt {
    type Err = ParseFeltError;

    /// Parses `0x` prefixed hex or decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<U256>()
            .map_err(|err| ParseFeltError::Number(err.to_string()))?;
        Self::new(value).ok_or(ParseFeltError::OutOfRange)
    }
}

impl Serialize for Felt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A deployed contract address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAddress(pub Felt);

impl Display for ContractAddress {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ContractAddress> for Felt {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}

impl FromStr for ContractAddress {
    type Err = ParseFeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A transaction hash as returned by the account on submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub Felt);

impl Display for TransactionHash {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The selector of a contract entry point: the starknet keccak of its name,
/// that is keccak256 truncated to its lowest 250 bits.
pub fn selector(name: &str) -> Felt {
    let hash = U256::from_be_bytes(keccak256(name.as_bytes()).0);
    let mask = (U256::from(1) << 250) - U256::from(1);
    Felt(hash & mask)
}

/// A single contract invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Call {
    pub contract: ContractAddress,
    pub entrypoint: &'static str,
    pub calldata: Vec<Felt>,
}
