use {
    crate::{
        domain::{
            starknet::ContractAddress,
            token::{Network, Token, Tokens},
        },
        infra::account,
    },
    url::Url,
};

pub mod file;

/// Configuration of infrastructural components.
#[derive(Debug)]
pub struct Config {
    /// The network to use. Must match the node's chain if both are known.
    pub network: Option<Network>,
    pub node_url: Option<Url>,
    pub wallet_url: Option<Url>,
    pub records_url: Option<Url>,
    pub contracts: Contracts,
    pub confirmation: account::Confirmation,
    /// Tokens in addition to the built-in ones.
    pub tokens: Vec<(Network, Token)>,
}

impl Config {
    /// The supported tokens on a network, including configured ones.
    pub fn tokens(&self, network: Network) -> Tokens {
        let mut tokens = Tokens::supported(network);
        for (_, token) in self.tokens.iter().filter(|(n, _)| *n == network) {
            tokens.insert(token.clone());
        }
        tokens
    }
}

/// Distribution contract per network.
#[derive(Debug, Default, Clone, Copy)]
pub struct Contracts {
    pub mainnet: Option<ContractAddress>,
    pub testnet: Option<ContractAddress>,
}

impl Contracts {
    pub fn get(&self, network: Network) -> Option<ContractAddress> {
        match network {
            Network::Mainnet => self.mainnet,
            Network::Testnet => self.testnet,
        }
    }
}
