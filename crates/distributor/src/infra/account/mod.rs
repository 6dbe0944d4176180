//! The account that signs and pays for the distribution, together with read
//! access to the chain.

use {
    crate::{
        domain::starknet::{Call, ContractAddress, Felt, TransactionHash},
        infra::observe,
    },
    std::time::Duration,
};

mod dto;
pub mod jsonrpc;
mod node;
mod wallet;

pub use {node::Node, wallet::Wallet};

/// Execution result of an included transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receipt {
    Succeeded,
    Reverted { reason: Option<String> },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Account: Send + Sync {
    /// The connected account, if any.
    fn address(&self) -> Option<ContractAddress>;

    /// Calls a view function.
    async fn call_contract(
        &self,
        contract: ContractAddress,
        entrypoint: &'static str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, Error>;

    /// Submits all calls atomically in one transaction.
    async fn execute(&self, calls: Vec<Call>) -> Result<TransactionHash, Error>;

    /// Waits until the transaction is included and returns how it executed.
    async fn wait_for_transaction(&self, hash: TransactionHash) -> Result<Receipt, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no account connected")]
    NotConnected,
    #[error(transparent)]
    Rpc(#[from] jsonrpc::Error),
    #[error("transaction {0} was not confirmed within {1:?}")]
    Timeout(TransactionHash, Duration),
}

/// How receipts are polled after submission.
#[derive(Clone, Copy, Debug)]
pub struct Confirmation {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

/// An [`Account`] that reads through a Starknet node and writes through a
/// wallet endpoint. Without a wallet it can only read.
#[derive(Debug)]
pub struct Rpc {
    node: Node,
    wallet: Option<(Wallet, ContractAddress)>,
    confirmation: Confirmation,
}

impl Rpc {
    /// Connects to the wallet, if one is configured, and selects its active
    /// account.
    pub async fn connect(
        node: Node,
        wallet: Option<Wallet>,
        confirmation: Confirmation,
    ) -> Result<Self, Error> {
        let wallet = match wallet {
            Some(wallet) => {
                let address = wallet
                    .request_accounts()
                    .await?
                    .first()
                    .copied()
                    .ok_or(Error::NotConnected)?;
                observe::connected(address);
                Some((wallet, address))
            }
            None => None,
        };
        Ok(Self {
            node,
            wallet,
            confirmation,
        })
    }
}

#[async_trait::async_trait]
impl Account for Rpc {
    fn address(&self) -> Option<ContractAddress> {
        self.wallet.as_ref().map(|(_, address)| *address)
    }

    async fn call_contract(
        &self,
        contract: ContractAddress,
        entrypoint: &'static str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, Error> {
        Ok(self.node.call(contract, entrypoint, calldata).await?)
    }

    async fn execute(&self, calls: Vec<Call>) -> Result<TransactionHash, Error> {
        let (wallet, _) = self.wallet.as_ref().ok_or(Error::NotConnected)?;
        Ok(wallet.add_invoke_transaction(calls).await?)
    }

    async fn wait_for_transaction(&self, hash: TransactionHash) -> Result<Receipt, Error> {
        let poll = async {
            loop {
                if let Some(receipt) = self.node.receipt(hash).await? {
                    return Ok::<_, Error>(receipt);
                }
                tracing::debug!(%hash, "transaction not yet known");
                tokio::time::sleep(self.confirmation.poll_interval).await;
            }
        };
        tokio::time::timeout(self.confirmation.timeout, poll)
            .await
            .map_err(|_| Error::Timeout(hash, self.confirmation.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::mock::{self, http::Expectation},
        serde_json::json,
    };

    fn confirmation() -> Confirmation {
        Confirmation {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_millis(500),
        }
    }

    async fn rpc(node: Vec<Expectation>, wallet: Option<Vec<Expectation>>) -> Rpc {
        let node = Node::new(mock::http::jsonrpc(node).await);
        let wallet = match wallet {
            Some(expectations) => Some(Wallet::new(mock::http::jsonrpc(expectations).await)),
            None => None,
        };
        Rpc::connect(node, wallet, confirmation()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_through_the_node() {
        let account = rpc(
            vec![Expectation::Rpc {
                method: "starknet_call",
                params: json!({
                    "request": {
                        "contract_address": "0xc0ffee",
                        "entry_point_selector": crate::domain::starknet::selector(
                            "get_protocol_fee_percent"
                        ),
                        "calldata": [],
                    },
                    "block_id": "latest",
                }),
                result: Ok(json!(["0xfa"])),
            }],
            None,
        )
        .await;

        assert_eq!(account.address(), None);
        let result = account
            .call_contract("0xc0ffee".parse().unwrap(), "get_protocol_fee_percent", vec![])
            .await
            .unwrap();
        assert_eq!(result, vec![Felt::from(250u64)]);
    }

    #[tokio::test]
    async fn executes_through_the_wallet() {
        let account = rpc(
            vec![],
            Some(vec![
                Expectation::Rpc {
                    method: "wallet_requestAccounts",
                    params: json!({ "silent_mode": true }),
                    result: Ok(json!(["0xabc", "0xdef"])),
                },
                Expectation::Rpc {
                    method: "wallet_addInvokeTransaction",
                    params: json!({
                        "calls": [{
                            "contract_address": "0x1",
                            "entry_point": "approve",
                            "calldata": ["0x2", "0x3", "0x0"],
                        }],
                    }),
                    result: Ok(json!({ "transaction_hash": "0x123" })),
                },
            ]),
        )
        .await;

        assert_eq!(account.address(), Some("0xabc".parse().unwrap()));
        let hash = account
            .execute(vec![Call {
                contract: "0x1".parse().unwrap(),
                entrypoint: "approve",
                calldata: vec![Felt::from(2u64), Felt::from(3u64), Felt::ZERO],
            }])
            .await
            .unwrap();
        assert_eq!(hash.to_string(), "0x123");
    }

    #[tokio::test]
    async fn cannot_execute_without_wallet() {
        let account = rpc(vec![], None).await;
        assert!(matches!(
            account.execute(vec![]).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn polls_until_the_receipt_is_known() {
        let not_found = || Expectation::Rpc {
            method: "starknet_getTransactionReceipt",
            params: json!({ "transaction_hash": "0x123" }),
            result: Err((29, "Transaction hash not found".to_owned())),
        };
        let account = rpc(
            vec![
                not_found(),
                not_found(),
                Expectation::Rpc {
                    method: "starknet_getTransactionReceipt",
                    params: json!({ "transaction_hash": "0x123" }),
                    result: Ok(json!({
                        "execution_status": "REVERTED",
                        "finality_status": "ACCEPTED_ON_L2",
                        "revert_reason": "u256_sub Overflow",
                    })),
                },
            ],
            None,
        )
        .await;

        let receipt = account
            .wait_for_transaction(TransactionHash(Felt::from(0x123u64)))
            .await
            .unwrap();
        assert_eq!(
            receipt,
            Receipt::Reverted {
                reason: Some("u256_sub Overflow".to_owned())
            }
        );
    }

    #[tokio::test]
    async fn surfaces_node_errors() {
        let account = rpc(
            vec![Expectation::Rpc {
                method: "starknet_getTransactionReceipt",
                params: json!({ "transaction_hash": "0x1" }),
                result: Err((-32603, "Internal error".to_owned())),
            }],
            None,
        )
        .await;

        let err = account
            .wait_for_transaction(TransactionHash(Felt::from(1u64)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Rpc(jsonrpc::Error::Rpc { code: -32603, .. })
        ));
    }

    #[tokio::test]
    async fn gives_up_after_the_timeout() {
        let account = rpc(
            (0..100)
                .map(|_| Expectation::Rpc {
                    method: "starknet_getTransactionReceipt",
                    params: json!({ "transaction_hash": "0x1" }),
                    result: Err((29, "Transaction hash not found".to_owned())),
                })
                .collect(),
            None,
        )
        .await;

        let err = account
            .wait_for_transaction(TransactionHash(Felt::from(1u64)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_, _)));
    }
}
