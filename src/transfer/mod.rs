//! The transfer pipeline.
//!
//! # Data Flow
//! ```text
//! TransferConfig + Keyring + password + ChainNode
//!     → get sender key
//!     → parse recipient, build MsgSend, validate_basic
//!     → prepare (account number, sequence)
//!     → sign → encode → broadcast (commit)
//!     → TransferReceipt
//! ```
//!
//! # Design Decisions
//! - Fail fast: the first error ends the run
//! - Every error is tagged with the step that produced it
//! - No retries

use std::fmt;

use thiserror::Error;

use crate::blockchain::client::ChainNode;
use crate::blockchain::transaction::{build_msg, coin_from_config, parse_address, tx_hash, validate_basic, TransferBuilder};
use crate::blockchain::types::ChainError;
use crate::config::{ConfigError, TransferConfig};
use crate::keyring::{Keyring, KeyringError};

/// A stage of a transfer run, named the way it appears in failure output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadConfig,
    CreateKeyring,
    GetSenderKey,
    CreateNodeClient,
    ReadPassword,
    ParseRecipient,
    BuildMessage,
    ValidateMessage,
    PrepareTransaction,
    SignTransaction,
    EncodeTransaction,
    BroadcastTransaction,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::LoadConfig => "load config",
            Step::CreateKeyring => "create keyring",
            Step::GetSenderKey => "get sender key",
            Step::CreateNodeClient => "create node client",
            Step::ReadPassword => "read keyring password",
            Step::ParseRecipient => "parse recipient address",
            Step::BuildMessage => "build message",
            Step::ValidateMessage => "validate message",
            Step::PrepareTransaction => "prepare transaction",
            Step::SignTransaction => "sign transaction",
            Step::EncodeTransaction => "encode transaction",
            Step::BroadcastTransaction => "broadcast transaction",
        };
        f.write_str(s)
    }
}

/// Underlying cause of a failed step.
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Keyring(#[from] KeyringError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("{0}")]
    Prompt(String),
}

/// A transfer failure: which step failed and why.
#[derive(Debug, Error)]
#[error("failed to {step}: {cause}")]
pub struct TransferError {
    pub step: Step,
    #[source]
    pub cause: Cause,
}

/// Tag a result with the step it belongs to.
pub trait AtStep<T> {
    fn at(self, step: Step) -> Result<T, TransferError>;
}

impl<T, E: Into<Cause>> AtStep<T> for Result<T, E> {
    fn at(self, step: Step) -> Result<T, TransferError> {
        self.map_err(|e| TransferError {
            step,
            cause: e.into(),
        })
    }
}

/// What a successful transfer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: String,
    pub height: u64,
    pub sender: String,
    pub recipient: String,
}

/// Run one transfer described by `config`.
///
/// Keys come from `keyring` (unlocked with `password`); account state and
/// broadcast go through `node`.
pub async fn execute<N>(
    config: &TransferConfig,
    keyring: &Keyring,
    password: &str,
    node: &N,
) -> Result<TransferReceipt, TransferError>
where
    N: ChainNode + ?Sized,
{
    let prefix = config.chain.account_prefix.as_str();
    let params = &config.transfer;

    let wallet = keyring
        .get(&params.key_name, password, prefix)
        .at(Step::GetSenderKey)?;
    let recipient = parse_address(&params.recipient, prefix).at(Step::ParseRecipient)?;

    let amount = coin_from_config(&params.amount).at(Step::BuildMessage)?;
    let msg = build_msg(wallet.address(), &recipient, vec![amount]);
    validate_basic(&msg, prefix).at(Step::ValidateMessage)?;

    let fee = coin_from_config(&params.fee).at(Step::BuildMessage)?;
    let builder = TransferBuilder::new(&config.chain.chain_id, fee, params.gas_limit, params.memo.as_str())
        .at(Step::BuildMessage)?;

    // Checks the sender exists on chain and picks up its sequence.
    let account = node.account(wallet.address()).await.at(Step::PrepareTransaction)?;

    let signed = builder.sign(&msg, account, &wallet).at(Step::SignTransaction)?;
    let tx_bytes = signed.to_bytes().at(Step::EncodeTransaction)?;
    let local_hash = tx_hash(&tx_bytes);

    tracing::info!(
        sender = %wallet.address(),
        recipient = %recipient,
        amount = params.amount.amount,
        denom = %params.amount.denom,
        sequence = account.sequence,
        tx_hash = %local_hash,
        "Broadcasting transfer"
    );

    let outcome = node
        .broadcast_commit(tx_bytes)
        .await
        .at(Step::BroadcastTransaction)?;

    if outcome.hash != local_hash {
        tracing::warn!(
            local = %local_hash,
            reported = %outcome.hash,
            "Node reported a different transaction hash"
        );
    }

    tracing::info!(tx_hash = %outcome.hash, height = outcome.height, "Transfer committed");

    Ok(TransferReceipt {
        tx_hash: outcome.hash,
        height: outcome.height,
        sender: wallet.address().to_string(),
        recipient: recipient.to_string(),
    })
}
