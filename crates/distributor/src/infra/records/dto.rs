use {
    crate::domain::{distribution, recipient::Recipient},
    serde::Serialize,
};

/// Body of `POST /distributions`.
#[derive(Debug, Serialize)]
pub struct Distribution {
    user_address: String,
    transaction_hash: String,
    token_address: String,
    token_symbol: String,
    token_decimals: u8,
    /// Sum of the recipient amounts, without the protocol fee.
    total_amount: String,
    fee_amount: String,
    total_recipients: usize,
    distribution_type: String,
    network: String,
    status: &'static str,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
struct Metadata {
    recipients: Vec<Recipient>,
}

impl From<&distribution::Record> for Distribution {
    fn from(record: &distribution::Record) -> Self {
        let review = &record.review;
        let amounts = review.totals.exact(&review.token);
        Self {
            user_address: record.sender.to_string(),
            transaction_hash: record.hash.to_string(),
            token_address: review.token.address.to_string(),
            token_symbol: review.token.symbol.clone(),
            token_decimals: review.token.decimals,
            total_amount: amounts.base,
            fee_amount: amounts.fee,
            total_recipients: review.recipients.len(),
            distribution_type: review.mode.to_string(),
            network: record.network.to_string(),
            status: "COMPLETED",
            metadata: Metadata {
                recipients: review.recipients.clone(),
            },
        }
    }
}
