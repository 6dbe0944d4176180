//! This crate contains the code required to make the distributor observable:
//! initialization of the logging setup shared between the binary and the
//! tests.
pub mod config;
pub mod tracing;

pub use config::Config;
