//! This module implements the observability for the distributor. It exposes
//! functions which represent events that are meaningful to the system. These
//! functions are called when the corresponding events occur and log the
//! event.

use crate::{
    domain::{
        fee::FeeBps,
        session::Review,
        starknet::{ContractAddress, TransactionHash},
        token::Network,
        validation::Report,
    },
    util::http,
};

/// Setup the observability. The log argument configures the tokio tracing
/// framework.
pub fn init(log: &str, json: bool) {
    ::observe::tracing::initialize(&::observe::Config::new(log).with_json_format(json));
}

/// Observe the network the node is connected to.
pub fn network(network: Network) {
    tracing::info!(%network, "connected to node");
}

/// Observe the account selected in the wallet.
pub fn connected(address: ContractAddress) {
    tracing::info!(%address, "wallet connected");
}

/// Observe the protocol fee read from the distribution contract.
pub fn protocol_fee(fee: FeeBps) {
    tracing::debug!(bps = fee.get(), "fetched protocol fee");
}

/// Observe that a distribution failed validation.
pub fn invalid(report: &Report) {
    tracing::info!(%report, "distribution is invalid");
}

/// Observe a distribution that is ready for confirmation.
pub fn reviewed(review: &Review) {
    tracing::debug!(
        token = %review.token.symbol,
        mode = %review.mode,
        recipients = review.recipients.len(),
        totals = ?review.totals,
        "distribution ready for confirmation"
    );
}

/// Observe that the calls are about to be handed to the account.
pub fn submitting(review: &Review) {
    tracing::info!(calls = ?review.plan.calls(), "submitting distribution");
}

/// Observe the transaction hash returned by the account.
pub fn submitted(hash: TransactionHash, network: Network) {
    tracing::info!(%hash, url = %network.explorer_url(&hash), "distribution submitted");
}

/// Observe that the account could not submit the transaction.
pub fn submission_failed(reason: &str) {
    tracing::warn!(%reason, "failed to submit distribution");
}

/// Observe a successful distribution.
pub fn confirmed(hash: TransactionHash) {
    tracing::info!(%hash, "distribution confirmed");
}

/// Observe a distribution whose transaction reverted or was never confirmed.
pub fn failed(hash: TransactionHash, reason: &str) {
    tracing::warn!(%hash, %reason, "distribution failed");
}

/// Observe that the distribution record was stored.
pub fn recorded(hash: TransactionHash) {
    tracing::info!(%hash, "saved distribution record");
}

/// Observe that the distribution record could not be stored. The
/// distribution itself succeeded.
pub fn recording_failed(hash: TransactionHash, err: &http::Error) {
    tracing::warn!(%hash, ?err, "failed to save distribution record");
}

/// Observe that the record write task died before finishing.
pub fn recording_aborted(hash: TransactionHash, err: &tokio::task::JoinError) {
    tracing::warn!(%hash, ?err, "distribution record write aborted");
}
