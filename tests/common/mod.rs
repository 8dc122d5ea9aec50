//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use cosmos_transfer::blockchain::transaction::tx_hash;
use cosmos_transfer::blockchain::{AccountInfo, BroadcastOutcome, ChainError, ChainNode, ChainResult};
use cosmos_transfer::config::TransferConfig;
use cosmos_transfer::keyring::Keyring;
use cosmrs::AccountId;

pub const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
/// Address of `TEST_MNEMONIC` at m/44'/118'/0'/0/0 with the `osmo` prefix.
pub const TEST_ADDRESS: &str = "osmo19rl4cm2hmr8afy4kldpxz3fka4jguq0a5m7df8";
pub const PASSWORD: &str = "correct horse battery staple";
pub const RECIPIENT: &str = "osmo1ys5lj28zrvpm9cjj0958awqmjt8aa8vpdflqc2";

/// Keyring in `dir` holding the test mnemonic as `bot-1`, with cheap PBKDF2.
pub fn keyring_with_bot(dir: &std::path::Path) -> Keyring {
    let keyring = Keyring::open(dir).unwrap().with_rounds(1_000);
    keyring.add("bot-1", TEST_MNEMONIC, PASSWORD, "osmo").unwrap();
    keyring
}

/// Default transfer config pointed at a keyring directory and a dead node.
pub fn test_config(keyring_dir: &std::path::Path) -> TransferConfig {
    let mut config = TransferConfig::default();
    config.keyring.dir = keyring_dir.display().to_string();
    // Nothing listens on port 1; connections are refused immediately.
    config.chain.rpc_url = "http://127.0.0.1:1".to_string();
    config.chain.rpc_timeout_secs = 5;
    config
}

/// How the mock node answers a broadcast.
#[derive(Debug, Clone, Copy)]
pub enum BroadcastBehavior {
    Commit { height: u64 },
    RejectCheckTx { code: u32 },
    FailDeliverTx { code: u32 },
}

/// In-process node that records what it was asked to broadcast.
pub struct MockNode {
    pub account: Option<AccountInfo>,
    pub behavior: BroadcastBehavior,
    pub lookups: Mutex<Vec<String>>,
    pub broadcasts: Mutex<Vec<Vec<u8>>>,
}

impl MockNode {
    pub fn with_account(account_number: u64, sequence: u64) -> Self {
        Self {
            account: Some(AccountInfo {
                account_number,
                sequence,
            }),
            behavior: BroadcastBehavior::Commit { height: 100 },
            lookups: Mutex::new(Vec::new()),
            broadcasts: Mutex::new(Vec::new()),
        }
    }

    pub fn without_account() -> Self {
        Self {
            account: None,
            ..Self::with_account(0, 0)
        }
    }

    pub fn behaving(mut self, behavior: BroadcastBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainNode for MockNode {
    async fn account(&self, address: &AccountId) -> ChainResult<AccountInfo> {
        self.lookups.lock().unwrap().push(address.to_string());
        self.account
            .ok_or_else(|| ChainError::AccountNotFound(address.to_string()))
    }

    async fn broadcast_commit(&self, tx_bytes: Vec<u8>) -> ChainResult<BroadcastOutcome> {
        let hash = tx_hash(&tx_bytes);
        self.broadcasts.lock().unwrap().push(tx_bytes);
        match self.behavior {
            BroadcastBehavior::Commit { height } => Ok(BroadcastOutcome { hash, height }),
            BroadcastBehavior::RejectCheckTx { code } => Err(ChainError::CheckTx {
                code,
                log: "insufficient fees".to_string(),
            }),
            BroadcastBehavior::FailDeliverTx { code } => Err(ChainError::DeliverTx {
                code,
                log: "insufficient funds".to_string(),
            }),
        }
    }
}
