//! The editable state of one distribution: the recipient list, the user's
//! selections and where the distribution is in its lifecycle.
//!
//! ```text
//! Empty <-> Building -> AwaitingConfirmation -> Submitting -> Settled
//!              ^                |                              |
//!              +---- cancel ----+                              |
//!              +----------------- edit ------------------------+
//! ```

use {
    super::{
        fee::{self, FeeBps, Totals},
        plan::{self, CallPlan},
        recipient::{Field, Mode, Recipient, Row},
        starknet::{ContractAddress, TransactionHash},
        token::Token,
        validation::{self, FormatValidator, Report},
    },
    bigdecimal::{BigDecimal, RoundingMode, Zero},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// No recipients.
    Empty,
    /// Recipients are being entered or edited.
    Building,
    /// The distribution passed validation and waits for the user.
    AwaitingConfirmation(Box<Review>),
    /// The transaction has been handed to the account.
    Submitting(Box<Review>),
    /// The last submission finished.
    Settled(Outcome),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Building => "building",
            Self::AwaitingConfirmation(_) => "awaiting confirmation",
            Self::Submitting(_) => "submitting",
            Self::Settled(_) => "settled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The transaction was included and executed successfully.
    Success(TransactionHash),
    /// The transaction reverted or could not be submitted.
    Failure {
        hash: Option<TransactionHash>,
        reason: String,
    },
}

/// Everything the user confirms. Captured when the distribution is
/// reviewed so that the submitted calls match exactly what was shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Review {
    pub recipients: Vec<Recipient>,
    pub mode: Mode,
    pub token: Token,
    pub fee: FeeBps,
    pub totals: Totals,
    pub plan: CallPlan,
}

/// Whether imported rows replace or extend the current list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Import {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("no recipient at row {0}")]
    NoSuchRow(usize),
    #[error("invalid lump sum {0:?}")]
    InvalidLumpSum(String),
    #[error("no token selected")]
    NoTokenSelected,
    #[error("recipient list is empty")]
    EmptyRecipientList,
    #[error("{0}")]
    Invalid(Report),
    #[error(transparent)]
    Totals(#[from] fee::Error),
    #[error(transparent)]
    Plan(#[from] plan::Error),
}

#[derive(Clone, Debug)]
pub struct Session {
    recipients: Vec<Recipient>,
    mode: Mode,
    equal_amount: String,
    token: Option<Token>,
    fee: FeeBps,
    state: State,
}

impl Session {
    pub fn new(token: Option<Token>) -> Self {
        Self {
            recipients: Vec::new(),
            mode: Mode::default(),
            equal_amount: String::new(),
            token,
            fee: FeeBps::default(),
            state: State::Empty,
        }
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn equal_amount(&self) -> &str {
        &self.equal_amount
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn fee(&self) -> FeeBps {
        self.fee
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Appends a manually entered recipient.
    pub fn add(&mut self, row: Row) -> Result<(), Error> {
        self.import(vec![row], Import::Append)
    }

    /// Adds imported rows. Rows without an amount get the current equal
    /// amount.
    pub fn import(&mut self, rows: Vec<Row>, import: Import) -> Result<(), Error> {
        self.edit("import recipients", |session| {
            if import == Import::Replace {
                session.recipients.clear();
            }
            let equal_amount = &session.equal_amount;
            session.recipients.extend(rows.into_iter().map(|row| Recipient {
                address: row.address,
                amount: row.amount.unwrap_or_else(|| equal_amount.clone()),
            }));
            Ok(())
        })
    }

    /// Changes one field of a recipient. `index` is 0-based.
    pub fn update(&mut self, index: usize, field: Field, value: String) -> Result<(), Error> {
        self.edit("update a recipient", |session| {
            let recipient = session
                .recipients
                .get_mut(index)
                .ok_or(Error::NoSuchRow(index + 1))?;
            match field {
                Field::Address => recipient.address = value,
                Field::Amount => recipient.amount = value,
            }
            Ok(())
        })
    }

    /// Removes a recipient. `index` is 0-based.
    pub fn remove(&mut self, index: usize) -> Result<Recipient, Error> {
        let mut removed = None;
        self.edit("remove a recipient", |session| {
            if index >= session.recipients.len() {
                return Err(Error::NoSuchRow(index + 1));
            }
            removed = Some(session.recipients.remove(index));
            Ok(())
        })?;
        removed.ok_or(Error::NoSuchRow(index + 1))
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.edit("clear recipients", |session| {
            session.recipients.clear();
            Ok(())
        })
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.edit("change the distribution mode", |session| {
            session.mode = mode;
            Ok(())
        })
    }

    /// Sets the amount every recipient receives and applies it to every row.
    pub fn set_equal_amount(&mut self, amount: String) -> Result<(), Error> {
        self.edit("change the amount", |session| {
            for recipient in &mut session.recipients {
                recipient.amount.clone_from(&amount);
            }
            session.equal_amount = amount;
            Ok(())
        })
    }

    /// Splits a total evenly across the current recipients. The amount per
    /// recipient is rounded half-up to two decimals and becomes the equal
    /// amount, so the distributed total can differ slightly from `lump_sum`.
    pub fn split_lump_sum(&mut self, lump_sum: &str) -> Result<String, Error> {
        let invalid = || Error::InvalidLumpSum(lump_sum.to_owned());
        let total = validation::parse_amount(lump_sum)
            .filter(|total| !total.is_zero())
            .ok_or_else(invalid)?;
        if self.recipients.is_empty() {
            return Err(Error::EmptyRecipientList);
        }
        let per_recipient = (total / BigDecimal::from(self.recipients.len() as u64))
            .with_scale_round(2, RoundingMode::HalfUp)
            .to_string();
        self.set_equal_amount(per_recipient.clone())?;
        Ok(per_recipient)
    }

    pub fn select_token(&mut self, token: Token) -> Result<(), Error> {
        self.edit("change the token", |session| {
            session.token = Some(token);
            Ok(())
        })
    }

    pub fn set_protocol_fee(&mut self, fee: FeeBps) -> Result<(), Error> {
        self.edit("change the protocol fee", |session| {
            session.fee = fee;
            Ok(())
        })
    }

    /// Validates the distribution and computes what will be submitted. On
    /// success the session waits for confirmation, otherwise nothing
    /// changes.
    pub fn review(
        &mut self,
        validator: &dyn FormatValidator,
        contract: ContractAddress,
    ) -> Result<Review, Error> {
        self.ensure_editable("review the distribution")?;
        let token = self.token.clone().ok_or(Error::NoTokenSelected)?;
        if self.recipients.is_empty() {
            return Err(Error::EmptyRecipientList);
        }
        validation::validate(&self.recipients, self.mode, &token, validator)
            .map_err(Error::Invalid)?;
        let totals = fee::compute_totals(&self.recipients, &token, self.fee)?;
        let plan = plan::build(
            &self.recipients,
            self.mode,
            Some(&token),
            totals.total,
            contract,
        )?;

        let review = Review {
            recipients: self.recipients.clone(),
            mode: self.mode,
            token,
            fee: self.fee,
            totals,
            plan,
        };
        self.state = State::AwaitingConfirmation(Box::new(review.clone()));
        Ok(review)
    }

    /// Returns to editing without submitting.
    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.state {
            State::AwaitingConfirmation(_) => {
                self.state = State::Building;
                Ok(())
            }
            _ => Err(self.invalid("cancel")),
        }
    }

    /// Confirms the reviewed distribution and returns what to submit.
    pub fn begin_submission(&mut self) -> Result<Review, Error> {
        match std::mem::replace(&mut self.state, State::Building) {
            State::AwaitingConfirmation(review) => {
                self.state = State::Submitting(review.clone());
                Ok(*review)
            }
            other => {
                self.state = other;
                Err(self.invalid("submit"))
            }
        }
    }

    /// Records the result of a submission. A successful distribution clears
    /// the recipient list, a failed one keeps it for correction.
    pub fn settle(&mut self, outcome: Outcome) -> Result<(), Error> {
        if !matches!(self.state, State::Submitting(_)) {
            return Err(self.invalid("settle"));
        }
        if matches!(outcome, Outcome::Success(_)) {
            self.recipients.clear();
        }
        self.state = State::Settled(outcome);
        Ok(())
    }

    /// Clears the recipient list from any state except while submitting.
    pub fn reset(&mut self) -> Result<(), Error> {
        if matches!(self.state, State::Submitting(_)) {
            return Err(self.invalid("reset"));
        }
        self.recipients.clear();
        self.state = State::Empty;
        Ok(())
    }

    fn edit(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.ensure_editable(action)?;
        f(self)?;
        self.state = if self.recipients.is_empty() {
            State::Empty
        } else {
            State::Building
        };
        Ok(())
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), Error> {
        match self.state {
            State::Empty | State::Building | State::Settled(_) => Ok(()),
            State::AwaitingConfirmation(_) | State::Submitting(_) => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> Error {
        Error::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
