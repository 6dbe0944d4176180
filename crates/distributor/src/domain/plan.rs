//! Encoding of a distribution into the two calls executed in one multicall:
//! an allowance for the distribution contract on the token, and the
//! distribution itself.

use {
    super::{
        recipient::{Mode, Recipient},
        starknet::{Call, ContractAddress, Felt, U256},
        token::Token,
        validation,
    },
    number::{u256_ext::U256Ext, units},
    serde::Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no token selected")]
    NoTokenSelected,
    #[error("recipient list is empty")]
    EmptyRecipientList,
    #[error("row {row}: invalid recipient address")]
    Address { row: usize },
    #[error("row {row}: invalid amount")]
    Amount { row: usize },
    #[error("row {row}: {source}")]
    Units { row: usize, source: units::Error },
}

/// The calls of a distribution, in execution order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallPlan {
    pub approve: Call,
    pub distribute: Call,
}

impl CallPlan {
    pub fn calls(&self) -> Vec<Call> {
        vec![self.approve.clone(), self.distribute.clone()]
    }
}

/// Builds the call plan for an already validated distribution. `total` is the
/// amount including the protocol fee that the contract is allowed to pull.
pub fn build(
    recipients: &[Recipient],
    mode: Mode,
    token: Option<&Token>,
    total: U256,
    contract: ContractAddress,
) -> Result<CallPlan, Error> {
    let token = token.ok_or(Error::NoTokenSelected)?;
    let first = recipients.first().ok_or(Error::EmptyRecipientList)?;

    let addresses = recipients
        .iter()
        .enumerate()
        .map(|(i, recipient)| {
            recipient
                .address
                .parse::<Felt>()
                .map_err(|_| Error::Address { row: i + 1 })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let approve = Call {
        contract: token.address,
        entrypoint: "approve",
        calldata: [vec![contract.into()], uint256(total)].concat(),
    };

    let distribute = match mode {
        Mode::Equal => {
            let amount = amount(1, first, token)?;
            Call {
                contract,
                entrypoint: "distribute",
                calldata: [
                    uint256(amount),
                    vec![Felt::from(addresses.len())],
                    addresses,
                    vec![token.address.into()],
                ]
                .concat(),
            }
        }
        Mode::Weighted => {
            let mut amounts = Vec::with_capacity(recipients.len() * 2);
            for (i, recipient) in recipients.iter().enumerate() {
                amounts.extend(uint256(amount(i + 1, recipient, token)?));
            }
            Call {
                contract,
                entrypoint: "distribute_weighted",
                calldata: [
                    vec![Felt::from(recipients.len())],
                    amounts,
                    vec![Felt::from(addresses.len())],
                    addresses,
                    vec![token.address.into()],
                ]
                .concat(),
            }
        }
    };

    Ok(CallPlan {
        approve,
        distribute,
    })
}

fn amount(row: usize, recipient: &Recipient, token: &Token) -> Result<U256, Error> {
    let amount = validation::parse_amount(&recipient.amount).ok_or(Error::Amount { row })?;
    units::to_smallest_unit(&amount, token.decimals).map_err(|source| Error::Units { row, source })
}

/// A uint256 is passed as two felts, low half first.
fn uint256(value: U256) -> Vec<Felt> {
    let (low, high) = value.split();
    vec![Felt::from(low), Felt::from(high)]
}
