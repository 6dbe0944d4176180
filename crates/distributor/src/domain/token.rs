use {
    super::starknet::{ContractAddress, Felt},
    serde::{Deserialize, Serialize},
    std::fmt::{self, Display, Formatter},
};

/// The Starknet network the distribution is executed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Chain IDs are short strings packed into a felt.
    const MAINNET_CHAIN_ID: u128 = u128::from_be_bytes(*b"\0\0\0\0\0\0\0\0\0SN_MAIN");
    const SEPOLIA_CHAIN_ID: u128 = u128::from_be_bytes(*b"\0\0\0\0\0\0SN_SEPOLIA");

    /// Identifies the network from the chain ID reported by a node. Sepolia
    /// is the only supported testnet.
    pub fn from_chain_id(chain_id: Felt) -> Option<Self> {
        if chain_id == Felt::from(Self::MAINNET_CHAIN_ID) {
            Some(Self::Mainnet)
        } else if chain_id == Felt::from(Self::SEPOLIA_CHAIN_ID) {
            Some(Self::Testnet)
        } else {
            None
        }
    }

    /// Block explorer link for a transaction.
    pub fn explorer_url(&self, hash: &impl Display) -> String {
        match self {
            Self::Mainnet => format!("https://voyager.online/tx/{hash}"),
            Self::Testnet => format!("https://sepolia.voyager.online/tx/{hash}"),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Mainnet => "MAINNET",
            Self::Testnet => "TESTNET",
        })
    }
}

/// A fungible token that can be distributed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub symbol: String,
    pub address: ContractAddress,
    pub decimals: u8,
}

impl Token {
    fn new(symbol: &str, address: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_owned(),
            address: address
                .parse()
                .expect("reference token addresses are valid felts"),
            decimals,
        }
    }
}

/// The tokens supported on a network, in display order.
#[derive(Clone, Debug)]
pub struct Tokens(Vec<Token>);

impl Tokens {
    /// The built-in reference table for a network.
    pub fn supported(network: Network) -> Self {
        const STRK: &str = "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d";
        const ETH: &str = "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";

        Self(match network {
            Network::Mainnet => vec![
                Token::new("STRK", STRK, 18),
                Token::new("ETH", ETH, 18),
                Token::new(
                    "USDC",
                    "0x053c91253bc9682c04929ca02ed00b3e423f6710d2ee7e0d5ebb06f3ecf368a8",
                    6,
                ),
                Token::new(
                    "USDT",
                    "0x068f5c6a61780768455de69077e07e89787839bf8166decfbf92b645209c0fb8",
                    6,
                ),
            ],
            Network::Testnet => vec![
                Token::new("STRK", STRK, 18),
                Token::new("ETH", ETH, 18),
                Token::new(
                    "USDC",
                    "0x053b40a647cedfca6ca84f542a0fe36736031905a9639a7f19a3c1e66bfd5080",
                    6,
                ),
            ],
        })
    }

    /// Adds a token to the table, replacing any token with the same symbol.
    pub fn insert(&mut self, token: Token) {
        match self.0.iter_mut().find(|t| t.symbol == token.symbol) {
            Some(existing) => *existing = token,
            None => self.0.push(token),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.0.iter().find(|token| token.symbol == symbol)
    }

    /// The token selected when a session starts.
    pub fn default_token(&self) -> Option<&Token> {
        self.get("STRK").or(self.0.first())
    }
}
