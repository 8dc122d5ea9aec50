//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a transfer.
//! All types derive Serde traits for deserialization from config files, and
//! every default reproduces the one-shot transfer to the Osmosis testnet.

use serde::{Deserialize, Serialize};

/// Root configuration for a single transfer run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TransferConfig {
    /// Target chain and node endpoint.
    pub chain: ChainConfig,

    /// Local key store settings.
    pub keyring: KeyringConfig,

    /// What to send, to whom, and what to pay for it.
    pub transfer: TransferParams,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain ID the transaction is signed for (e.g., "osmo-test-5").
    pub chain_id: String,

    /// Tendermint RPC endpoint URL.
    pub rpc_url: String,

    /// Bech32 human-readable prefix for account addresses.
    pub account_prefix: String,

    /// RPC request timeout in seconds. Also bounds the commit wait.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: "osmo-test-5".to_string(),
            rpc_url: "https://rpc.testnet.osmosis.zone:443".to_string(),
            account_prefix: "osmo".to_string(),
            rpc_timeout_secs: 60,
        }
    }
}

/// Keyring configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyringConfig {
    /// Directory holding one encrypted record per key.
    pub dir: String,

    /// Environment variable consulted for the keyring password before
    /// falling back to an interactive prompt.
    pub password_env: String,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            dir: "/home/go/".to_string(),
            password_env: "KEYRING_PASSWORD".to_string(),
        }
    }
}

/// A coin amount as written in config files.
///
/// TOML integers are signed 64-bit, so `amount` is a `u64` and is widened
/// when it becomes an SDK coin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoinConfig {
    pub denom: String,
    pub amount: u64,
}

impl CoinConfig {
    pub fn new(denom: &str, amount: u64) -> Self {
        Self {
            denom: denom.to_string(),
            amount,
        }
    }
}

/// Transfer parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferParams {
    /// Keyring entry used to sign.
    pub key_name: String,

    /// Bech32 recipient address.
    pub recipient: String,

    /// Amount to send.
    pub amount: CoinConfig,

    /// Fee paid for the transaction.
    pub fee: CoinConfig,

    /// Gas limit for the transaction.
    pub gas_limit: u64,

    /// Free-form memo attached to the transaction body.
    pub memo: String,
}

impl Default for TransferParams {
    fn default() -> Self {
        Self {
            key_name: "bot-1".to_string(),
            recipient: "osmo1ys5lj28zrvpm9cjj0958awqmjt8aa8vpdflqc2".to_string(),
            amount: CoinConfig::new("uosmo", 50_000),
            fee: CoinConfig::new("uosmo", 100_000),
            gas_limit: 200_000,
            memo: "test transaction".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
