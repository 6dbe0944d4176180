//! CLI arguments for the `distributor` binary.

use {
    crate::domain::recipient,
    clap::{Parser, Subcommand, ValueEnum},
    std::path::PathBuf,
};

/// Distribute tokens to many Starknet addresses in one transaction.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[arg(long, env, default_value = "warn,distributor=info")]
    pub log: String,

    /// Output logs as JSON.
    #[arg(long, env)]
    pub log_json: bool,

    /// Path to the distributor configuration file. This file should be in
    /// TOML format.
    #[arg(long, env)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the recipient list and print every problem found.
    Validate(Distribution),
    /// Print the totals and the calls that would be submitted.
    Plan {
        #[command(flatten)]
        distribution: Distribution,
        /// Use this protocol fee in basis points instead of reading it from
        /// the contract.
        #[arg(long)]
        fee_bps: Option<u64>,
    },
    /// Submit the distribution and wait for it to be confirmed.
    Distribute {
        #[command(flatten)]
        distribution: Distribution,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct Distribution {
    /// File with one `address[,amount]` row per line.
    #[arg(long)]
    pub recipients: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Equal)]
    pub mode: Mode,

    /// Symbol of the token to distribute. Defaults to STRK.
    #[arg(long)]
    pub token: Option<String>,

    /// Amount for every recipient. Used for rows without an amount.
    #[arg(long, conflicts_with = "lump_sum")]
    pub equal_amount: Option<String>,

    /// Total to split evenly between all recipients.
    #[arg(long)]
    pub lump_sum: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Equal,
    Weighted,
}

impl From<Mode> for recipient::Mode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Equal => Self::Equal,
            Mode::Weighted => Self::Weighted,
        }
    }
}
