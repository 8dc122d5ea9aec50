//! Chain-specific types and error definitions.

use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Account state needed to sign: the on-chain account number and the
/// next expected sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Result of a transaction that was included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Uppercase hex transaction hash.
    pub hash: String,
    /// Height of the block that included the transaction.
    pub height: u64,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("rpc timeout after {0} seconds")]
    Timeout(u64),

    /// The node has no record of the account.
    #[error("account {0} not found")]
    AccountNotFound(String),

    /// The node returned an account of a type we cannot sign for.
    #[error("unsupported account type '{0}'")]
    UnsupportedAccount(String),

    /// ABCI query returned a non-zero code.
    #[error("query failed with code {code}: {log}")]
    Query { code: u32, log: String },

    /// Transaction was rejected by the mempool check.
    #[error("CheckTx failed with code {code}: {log}")]
    CheckTx { code: u32, log: String },

    /// Transaction was included but failed during execution.
    #[error("DeliverTx failed with code {code}: {log}")]
    DeliverTx { code: u32, log: String },

    /// Address could not be parsed or has the wrong prefix.
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// Message failed stateless validation.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Protobuf encoding or decoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid private key format or signing failure.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: String, actual: String },
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;
