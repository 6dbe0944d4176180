use {
    super::{
        dto,
        jsonrpc::{self, Client},
    },
    crate::domain::starknet::{Call, ContractAddress, TransactionHash},
};

/// A wallet endpoint speaking the Starknet wallet API. The wallet owns the
/// keys, signs and broadcasts.
#[derive(Debug)]
pub struct Wallet {
    rpc: Client,
}

impl Wallet {
    pub fn new(rpc: Client) -> Self {
        Self { rpc }
    }

    /// The accounts the wallet exposes, the first one is the active account.
    pub async fn request_accounts(&self) -> Result<Vec<ContractAddress>, jsonrpc::Error> {
        self.rpc
            .call(
                "wallet_requestAccounts",
                dto::RequestAccountsParams { silent_mode: true },
            )
            .await
    }

    /// Submits all calls as one atomic multicall.
    pub async fn add_invoke_transaction(
        &self,
        calls: Vec<Call>,
    ) -> Result<TransactionHash, jsonrpc::Error> {
        let params = dto::InvokeParams {
            calls: calls.into_iter().map(Into::into).collect(),
        };
        let result: dto::InvokeResult = self
            .rpc
            .call("wallet_addInvokeTransaction", params)
            .await?;
        Ok(result.transaction_hash)
    }
}
