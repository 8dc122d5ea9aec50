//! Sign and broadcast a bank transfer to a Cosmos SDK chain.

pub mod blockchain;
pub mod config;
pub mod keyring;
pub mod observability;
pub mod prompt;
pub mod transfer;

pub use config::TransferConfig;
pub use keyring::Keyring;
pub use transfer::{execute, TransferError, TransferReceipt};
