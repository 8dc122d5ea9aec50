//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit > 0, amounts > 0)
//! - Check that URLs and denominations are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TransferConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Addresses are checked later by message validation, against the prefix

use std::fmt;
use std::str::FromStr;

use cosmrs::Denom;

use crate::config::schema::{CoinConfig, TransferConfig};

/// Longest memo accepted by the default auth module parameters.
pub const MAX_MEMO_BYTES: usize = 256;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. "transfer.gas_limit").
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &TransferConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.chain;
    if chain.chain_id.trim().is_empty() {
        errors.push(ValidationError::new("chain.chain_id", "must not be empty"));
    }
    match url::Url::parse(&chain.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("invalid URL '{}': {}", chain.rpc_url, e),
        )),
    }
    if chain.account_prefix.is_empty() {
        errors.push(ValidationError::new("chain.account_prefix", "must not be empty"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.keyring.dir.is_empty() {
        errors.push(ValidationError::new("keyring.dir", "must not be empty"));
    }

    let transfer = &config.transfer;
    if transfer.key_name.is_empty() {
        errors.push(ValidationError::new("transfer.key_name", "must not be empty"));
    }
    if transfer.recipient.is_empty() {
        errors.push(ValidationError::new("transfer.recipient", "must not be empty"));
    }
    check_coin("transfer.amount", &transfer.amount, false, &mut errors);
    check_coin("transfer.fee", &transfer.fee, true, &mut errors);
    if transfer.gas_limit == 0 {
        errors.push(ValidationError::new("transfer.gas_limit", "must be greater than 0"));
    }
    if transfer.memo.len() > MAX_MEMO_BYTES {
        errors.push(ValidationError::new(
            "transfer.memo",
            format!("{} bytes exceeds the {} byte limit", transfer.memo.len(), MAX_MEMO_BYTES),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_coin(field: &str, coin: &CoinConfig, allow_zero: bool, errors: &mut Vec<ValidationError>) {
    if Denom::from_str(&coin.denom).is_err() {
        errors.push(ValidationError::new(
            field,
            format!("invalid denomination '{}'", coin.denom),
        ));
    }
    if !allow_zero && coin.amount == 0 {
        errors.push(ValidationError::new(field, "amount must be greater than 0"));
    }
}
