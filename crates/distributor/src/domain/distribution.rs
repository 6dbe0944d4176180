//! Submission of a reviewed distribution: fee lookup, confirmation,
//! execution and the off-chain record.

use {
    super::{
        fee::FeeBps,
        session::{self, Outcome, Review, Session},
        starknet::{ContractAddress, TransactionHash},
        token::Network,
        validation::{FormatValidator, Report},
    },
    crate::infra::{
        account::{Account, Receipt},
        observe,
        records::RecordStore,
    },
    std::sync::Arc,
    tokio::task::JoinHandle,
    tracing::Instrument,
};

/// Entry point of the distribution contract returning the fee in basis
/// points.
const PROTOCOL_FEE: &str = "get_protocol_fee_percent";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no wallet connected")]
    Connection,
    #[error("no token selected")]
    NoTokenSelected,
    #[error("recipient list is empty")]
    EmptyRecipientList,
    #[error("invalid distribution: {0}")]
    Invalid(Report),
    #[error("contract call failed: {0}")]
    ContractCall(String),
    #[error("transaction {hash} failed: {reason}")]
    TransactionFailed {
        hash: TransactionHash,
        reason: String,
    },
    #[error(transparent)]
    Session(session::Error),
}

impl From<session::Error> for Error {
    fn from(err: session::Error) -> Self {
        match err {
            session::Error::NoTokenSelected => Self::NoTokenSelected,
            session::Error::EmptyRecipientList => Self::EmptyRecipientList,
            session::Error::Invalid(report) => Self::Invalid(report),
            err => Self::Session(err),
        }
    }
}

/// A successful distribution, as stored off-chain.
#[derive(Clone, Debug)]
pub struct Record {
    pub sender: ContractAddress,
    pub hash: TransactionHash,
    pub network: Network,
    pub review: Review,
}

/// A confirmed distribution.
#[derive(Debug)]
pub struct Submitted {
    pub hash: TransactionHash,
    /// Block explorer link for the transaction.
    pub url: String,
    /// The background write of the distribution record. Its result never
    /// affects the distribution, awaiting it only makes sure that the write
    /// had a chance to finish.
    pub record: JoinHandle<()>,
}

impl Submitted {
    /// Waits for the background record write to finish. Its outcome is only
    /// logged.
    pub async fn record_written(self) {
        if let Err(err) = self.record.await {
            observe::recording_aborted(self.hash, &err);
        }
    }
}

pub struct Distributor {
    account: Arc<dyn Account>,
    records: Arc<dyn RecordStore>,
    validator: Arc<dyn FormatValidator>,
    network: Network,
    contract: ContractAddress,
}

impl Distributor {
    pub fn new(
        account: Arc<dyn Account>,
        records: Arc<dyn RecordStore>,
        validator: Arc<dyn FormatValidator>,
        network: Network,
        contract: ContractAddress,
    ) -> Self {
        Self {
            account,
            records,
            validator,
            network,
            contract,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Reads the protocol fee from the distribution contract.
    pub async fn protocol_fee(&self) -> Result<FeeBps, Error> {
        let result = self
            .account
            .call_contract(self.contract, PROTOCOL_FEE, vec![])
            .await
            .map_err(|err| Error::ContractCall(err.to_string()))?;
        let fee = result
            .first()
            .ok_or_else(|| Error::ContractCall(format!("{PROTOCOL_FEE} returned nothing")))?;
        let fee =
            FeeBps::try_from(fee.get()).map_err(|err| Error::ContractCall(err.to_string()))?;
        observe::protocol_fee(fee);
        Ok(fee)
    }

    /// Validates the session's distribution with the current protocol fee
    /// and moves it to confirmation. Requires a connected account.
    pub async fn review(&self, session: &mut Session) -> Result<Review, Error> {
        if self.account.address().is_none() {
            return Err(Error::Connection);
        }
        self.preview(session, None).await
    }

    /// Like [`Self::review`] but does not require an account to be connected.
    /// The protocol fee is read from the contract unless `fee` overrides it.
    pub async fn preview(
        &self,
        session: &mut Session,
        fee: Option<FeeBps>,
    ) -> Result<Review, Error> {
        let fee = match fee {
            Some(fee) => fee,
            None => self.protocol_fee().await?,
        };
        session.set_protocol_fee(fee)?;
        let review = session
            .review(self.validator.as_ref(), self.contract)
            .inspect_err(|err| {
                if let session::Error::Invalid(report) = err {
                    observe::invalid(report);
                }
            })?;
        observe::reviewed(&review);
        Ok(review)
    }

    /// Submits the confirmed distribution and waits for its receipt. On
    /// success the session's recipient list is cleared and the distribution
    /// record is written in the background.
    pub async fn submit(&self, session: &mut Session) -> Result<Submitted, Error> {
        let sender = self.account.address().ok_or(Error::Connection)?;
        let review = session.begin_submission()?;
        observe::submitting(&review);

        let hash = match self.account.execute(review.plan.calls()).await {
            Ok(hash) => hash,
            Err(err) => {
                let reason = err.to_string();
                observe::submission_failed(&reason);
                session.settle(Outcome::Failure {
                    hash: None,
                    reason: reason.clone(),
                })?;
                return Err(Error::ContractCall(reason));
            }
        };
        observe::submitted(hash, self.network);

        let err = match self.account.wait_for_transaction(hash).await {
            Ok(Receipt::Succeeded) => None,
            Ok(Receipt::Reverted { reason }) => Some(Error::TransactionFailed {
                hash,
                reason: reason.unwrap_or_else(|| "reverted".to_owned()),
            }),
            Err(err) => Some(Error::ContractCall(err.to_string())),
        };
        if let Some(err) = err {
            let reason = err.to_string();
            observe::failed(hash, &reason);
            session.settle(Outcome::Failure {
                hash: Some(hash),
                reason,
            })?;
            return Err(err);
        }

        observe::confirmed(hash);
        session.settle(Outcome::Success(hash))?;
        let record = self.save(Record {
            sender,
            hash,
            network: self.network,
            review,
        });
        Ok(Submitted {
            hash,
            url: self.network.explorer_url(&hash),
            record,
        })
    }

    /// Writes the distribution record with fire and forget mentality.
    fn save(&self, record: Record) -> JoinHandle<()> {
        let records = self.records.clone();
        tokio::spawn(
            async move {
                match records.save(&record).await {
                    Ok(()) => observe::recorded(record.hash),
                    Err(err) => observe::recording_failed(record.hash, &err),
                }
            }
            .instrument(tracing::Span::current()),
        )
    }
}
