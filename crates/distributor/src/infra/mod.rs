pub mod account;
pub mod cli;
pub mod config;
pub mod observe;
pub mod records;

pub use {
    account::Account,
    config::Config,
    records::RecordStore,
};
