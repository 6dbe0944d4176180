use {
    crate::{
        domain::token::Token,
        infra::{self, account, config::file},
    },
    std::path::Path,
    tokio::fs,
};

/// Load the distributor configuration from a TOML file.
///
/// # Panics
///
/// This method panics if the config is invalid or on I/O errors.
pub async fn load(path: &Path) -> infra::Config {
    let data = fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("I/O error while reading {path:?}: {e:?}"));
    let config: file::Config = toml::de::from_str(&data)
        .unwrap_or_else(|e| panic!("TOML syntax error while reading {path:?}: {e}"));

    assert!(
        config.network.is_some() || config.node_url.is_some(),
        "either network or node-url must be configured"
    );

    infra::Config {
        network: config.network,
        node_url: config.node_url,
        wallet_url: config.wallet_url,
        records_url: config.records_url,
        contracts: infra::config::Contracts {
            mainnet: config.contracts.mainnet,
            testnet: config.contracts.testnet,
        },
        confirmation: account::Confirmation {
            poll_interval: config.confirmation_poll_interval,
            timeout: config.confirmation_timeout,
        },
        tokens: config
            .tokens
            .into_iter()
            .map(|token| {
                (
                    token.network,
                    Token {
                        symbol: token.symbol,
                        address: token.address,
                        decimals: token.decimals,
                    },
                )
            })
            .collect(),
    }
}
