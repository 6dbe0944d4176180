use {
    super::{
        Receipt,
        dto,
        jsonrpc::{self, Client},
    },
    crate::domain::starknet::{self, ContractAddress, Felt, TransactionHash},
};

/// Node error code for a transaction hash it does not know (yet).
const TXN_HASH_NOT_FOUND: i64 = 29;

/// Read access to the chain through a Starknet node.
#[derive(Debug)]
pub struct Node {
    rpc: Client,
}

impl Node {
    pub fn new(rpc: Client) -> Self {
        Self { rpc }
    }

    pub async fn chain_id(&self) -> Result<Felt, jsonrpc::Error> {
        self.rpc.call("starknet_chainId", [(); 0]).await
    }

    pub async fn call(
        &self,
        contract: ContractAddress,
        entrypoint: &str,
        calldata: Vec<Felt>,
    ) -> Result<Vec<Felt>, jsonrpc::Error> {
        let params = dto::CallParams {
            request: dto::FunctionCall {
                contract_address: contract,
                entry_point_selector: starknet::selector(entrypoint),
                calldata,
            },
            block_id: "latest",
        };
        self.rpc.call("starknet_call", params).await
    }

    /// Returns `None` while the node does not know the transaction.
    pub async fn receipt(&self, hash: TransactionHash) -> Result<Option<Receipt>, jsonrpc::Error> {
        let params = dto::ReceiptParams {
            transaction_hash: hash,
        };
        match self
            .rpc
            .call::<_, dto::Receipt>("starknet_getTransactionReceipt", params)
            .await
        {
            Ok(receipt) => Ok(Some(match receipt.execution_status {
                dto::ExecutionStatus::Succeeded => Receipt::Succeeded,
                dto::ExecutionStatus::Reverted => Receipt::Reverted {
                    reason: receipt.revert_reason,
                },
            })),
            Err(jsonrpc::Error::Rpc {
                code: TXN_HASH_NOT_FOUND,
                ..
            }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
