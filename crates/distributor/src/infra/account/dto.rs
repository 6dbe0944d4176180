//! Wire types of the Starknet node and wallet JSON-RPC APIs.

use {
    crate::domain::starknet::{self, ContractAddress, Felt, TransactionHash},
    serde::{Deserialize, Serialize},
};

#[derive(Serialize)]
pub struct CallParams {
    pub request: FunctionCall,
    pub block_id: &'static str,
}

#[derive(Serialize)]
pub struct FunctionCall {
    pub contract_address: ContractAddress,
    pub entry_point_selector: Felt,
    pub calldata: Vec<Felt>,
}

#[derive(Serialize)]
pub struct ReceiptParams {
    pub transaction_hash: TransactionHash,
}

#[derive(Debug, Deserialize)]
pub struct Receipt {
    pub execution_status: ExecutionStatus,
    #[serde(default)]
    pub revert_reason: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Succeeded,
    Reverted,
}

#[derive(Serialize)]
pub struct InvokeParams {
    pub calls: Vec<InvokeCall>,
}

#[derive(Serialize)]
pub struct InvokeCall {
    pub contract_address: ContractAddress,
    pub entry_point: &'static str,
    pub calldata: Vec<Felt>,
}

impl From<starknet::Call> for InvokeCall {
    fn from(call: starknet::Call) -> Self {
        Self {
            contract_address: call.contract,
            entry_point: call.entrypoint,
            calldata: call.calldata,
        }
    }
}

#[derive(Deserialize)]
pub struct InvokeResult {
    pub transaction_hash: TransactionHash,
}

#[derive(Serialize)]
pub struct RequestAccountsParams {
    pub silent_mode: bool,
}
