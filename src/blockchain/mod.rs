//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! keyring (encrypted key)
//!     → wallet.rs (signing key, bech32 address)
//!     → transaction.rs (build, validate, sign, encode)
//!     → client.rs (account lookup, broadcast with commit wait)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Signatures are bound to the configured chain id

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainNode, NodeClient};
pub use transaction::{SignedTx, TransferBuilder};
pub use types::{AccountInfo, BroadcastOutcome, ChainError, ChainResult};
pub use wallet::SigningWallet;
