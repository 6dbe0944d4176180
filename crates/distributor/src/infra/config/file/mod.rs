pub use load::load;
use {
    crate::domain::{starknet::ContractAddress, token::Network},
    serde::Deserialize,
    std::time::Duration,
    url::Url,
};

mod load;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    /// The network to distribute on. Optional when a node is configured, the
    /// network is then derived from the node's chain ID.
    network: Option<Network>,

    /// Starknet JSON-RPC node used for reads and receipts.
    node_url: Option<Url>,

    /// Wallet endpoint speaking the Starknet wallet API. Required for
    /// submitting distributions.
    wallet_url: Option<Url>,

    /// Base URL of the API storing completed distributions.
    records_url: Option<Url>,

    /// Distribution contract addresses.
    #[serde(default)]
    contracts: ContractsConfig,

    /// How often to poll for the receipt of a submitted transaction.
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    confirmation_poll_interval: Duration,

    /// How long to wait for the receipt of a submitted transaction.
    #[serde(with = "humantime_serde", default = "default_confirmation_timeout")]
    confirmation_timeout: Duration,

    /// Tokens in addition to, or replacing, the built-in ones.
    #[serde(rename = "token", default)]
    tokens: Vec<TokenConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ContractsConfig {
    mainnet: Option<ContractAddress>,
    testnet: Option<ContractAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TokenConfig {
    network: Network,
    symbol: String,
    address: ContractAddress,
    decimals: u8,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_confirmation_timeout() -> Duration {
    Duration::from_secs(300)
}
