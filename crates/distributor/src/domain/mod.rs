pub mod distribution;
pub mod fee;
pub mod plan;
pub mod recipient;
pub mod session;
pub mod starknet;
pub mod token;
pub mod validation;

pub use {
    distribution::Distributor,
    recipient::{Mode, Recipient},
    session::Session,
};
